use crate::sources::SearchParams;
use anyhow::{bail, Result};
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "qasa-scout")]
#[command(about = "Posts newly published Qasa rentals to a Discord channel")]
pub struct Args {
    /// Discord bot token
    #[arg(short = 't', long, env = "DISCORD_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Channel ID for apartment notifications
    #[arg(short = 'c', long = "channel", env = "DISCORD_CHANNEL_ID")]
    pub channel_id: Option<String>,

    /// Seconds between polls
    #[arg(long, default_value_t = 60)]
    pub interval_secs: u64,

    /// Milliseconds between messages of the initial scan
    #[arg(long, default_value_t = 1000)]
    pub pace_ms: u64,

    #[arg(long, default_value_t = 20_000)]
    pub max_monthly_cost: i64,

    #[arg(long, default_value = "NOK")]
    pub currency: String,

    /// Area identifier to search, repeatable (e.g. no/oslo)
    #[arg(long = "area", default_value = "no/oslo")]
    pub areas: Vec<String>,

    /// Listings per fetch
    #[arg(long, default_value_t = 60)]
    pub limit: u32,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    /// `None` disables posting; listings are still tracked
    pub channel_id: Option<String>,
    pub poll_interval: Duration,
    pub pace: Duration,
    pub search: SearchParams,
    pub log_level: String,
}

impl Config {
    /// Read `.env`, then the command line and environment
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_args(Args::parse())
    }

    pub fn from_args(args: Args) -> Result<Self> {
        let token = args.token.trim().to_string();
        if token.is_empty() {
            bail!("Discord bot token is required (-t or DISCORD_TOKEN)");
        }

        if args.interval_secs == 0 {
            bail!("--interval-secs must be greater than zero");
        }

        let channel_id = args
            .channel_id
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(Self {
            token,
            channel_id,
            poll_interval: Duration::from_secs(args.interval_secs),
            pace: Duration::from_millis(args.pace_ms),
            search: SearchParams {
                max_monthly_cost: args.max_monthly_cost,
                currency: args.currency,
                area_identifiers: args.areas,
                limit: args.limit,
                ..SearchParams::default()
            },
            log_level: args.log_level,
        })
    }
}
