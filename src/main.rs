mod config;
mod error;
mod models;
mod notify;
mod sources;
mod tracker;

use anyhow::Context;
use config::Config;
use notify::DiscordSink;
use sources::QasaSource;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracker::{IntervalTicker, Tracker};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🏠 Qasa Scout - Discord apartment notifier");

    let sink = Arc::new(
        DiscordSink::connect(&config.token)
            .await
            .context("Failed to open Discord session")?,
    );
    let source = QasaSource::with_params(config.search.clone())?;

    match &config.channel_id {
        Some(channel) => info!("Posting listings to channel {}", channel),
        None => warn!("No channel configured; listings will be tracked but not posted"),
    }

    let mut tracker = Tracker::new(source, sink.clone(), config.channel_id.clone(), config.pace);
    let ticker = IntervalTicker::new(config.poll_interval);
    let mut polling = tokio::spawn(async move { tracker.run(ticker).await });

    info!("Bot is now running. Press CTRL-C to exit.");

    tokio::select! {
        signal = shutdown_signal() => {
            signal?;
            info!("Shutdown signal received");
        }
        joined = &mut polling => {
            if let Err(e) = joined {
                error!("Polling task ended unexpectedly: {}", e);
            }
        }
    }

    polling.abort();
    sink.close();

    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate =
            signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;

        tokio::select! {
            ctrl_c = tokio::signal::ctrl_c() => ctrl_c.context("Failed to listen for Ctrl-C")?,
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    Ok(())
}
