pub mod seen;
pub mod ticker;

pub use seen::SeenSet;
pub use ticker::{IntervalTicker, Ticker};

use crate::models::Listing;
use crate::notify::{format_notification, NotificationSink};
use crate::sources::ListingSource;
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Outcome of handing one listing to the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// No destination channel configured
    Skipped,
    Failed,
}

/// Summary of one fetch-diff-notify pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub fetched: usize,
    /// Ids added to the seen set during this pass
    pub new: usize,
    pub delivered: usize,
    pub skipped: usize,
    pub failed: usize,
    pub fetch_failed: bool,
}

impl CycleReport {
    fn record(&mut self, delivery: Delivery) {
        match delivery {
            Delivery::Delivered => self.delivered += 1,
            Delivery::Skipped => self.skipped += 1,
            Delivery::Failed => self.failed += 1,
        }
    }
}

/// Polls a listing source and announces listings it has not seen before.
///
/// The tracker is the only writer of its seen set. Cycles run strictly one
/// after another, so an id can never be announced twice.
pub struct Tracker<S, N> {
    source: S,
    sink: N,
    channel_id: Option<String>,
    seen: SeenSet,
    pace: Duration,
}

impl<S, N> Tracker<S, N>
where
    S: ListingSource,
    N: NotificationSink,
{
    /// `pace` is the delay between consecutive messages of the initial scan
    pub fn new(source: S, sink: N, channel_id: Option<String>, pace: Duration) -> Self {
        Self {
            source,
            sink,
            channel_id,
            seen: SeenSet::new(),
            pace,
        }
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    /// Run the initial scan, then one polling cycle per tick until the ticker stops
    pub async fn run<T: Ticker>(&mut self, mut ticker: T) {
        self.bootstrap().await;

        let mut failed_fetches = 0;
        while ticker.tick().await {
            if self.poll_cycle().await.fetch_failed {
                failed_fetches += 1;
            }
        }

        info!(
            "Polling stopped. Tracked {} ads, {} failed fetches.",
            self.seen.len(),
            failed_fetches
        );
    }

    /// Seed the seen set and announce everything currently listed as existing ads
    pub async fn bootstrap(&mut self) -> CycleReport {
        let mut report = CycleReport::default();

        let listings = match self.source.fetch().await {
            Ok(listings) => listings,
            Err(e) => {
                error!(
                    "Error getting initial listings from {}: {}",
                    self.source.source_name(),
                    e
                );
                report.fetch_failed = true;
                return report;
            }
        };

        report.fetched = listings.len();
        info!("Initial scan found {} ads. Sending to channel...", listings.len());

        for listing in &listings {
            if !self.seen.insert(&listing.id) {
                continue;
            }
            report.new += 1;

            if self.channel_id.is_some() && report.delivered + report.failed > 0 {
                tokio::time::sleep(self.pace).await;
            }

            let delivery = self.dispatch(listing, false).await;
            report.record(delivery);
        }

        info!("Initial scan complete. Tracking {} ads.", self.seen.len());
        report
    }

    /// Fetch once and announce listings whose id has not been seen yet
    pub async fn poll_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();

        let listings = match self.source.fetch().await {
            Ok(listings) => listings,
            Err(e) => {
                error!("Error getting listings from {}: {}", self.source.source_name(), e);
                report.fetch_failed = true;
                return report;
            }
        };

        report.fetched = listings.len();

        for listing in &listings {
            if !self.seen.insert(&listing.id) {
                continue;
            }
            report.new += 1;
            info!("New ad found: ({}) {}", listing.id, listing.title);

            let delivery = self.dispatch(listing, true).await;
            report.record(delivery);
        }

        debug!(
            "Cycle complete: {} fetched, {} new ({} delivered, {} skipped, {} failed), tracking {}",
            report.fetched,
            report.new,
            report.delivered,
            report.skipped,
            report.failed,
            self.seen.len()
        );
        report
    }

    // The listing is already marked seen; a failed send is not retried.
    async fn dispatch(&self, listing: &Listing, is_new: bool) -> Delivery {
        let Some(channel_id) = self.channel_id.as_deref() else {
            warn!("Channel ID not set, skipping notification for {}", listing.id);
            return Delivery::Skipped;
        };

        debug!("Sending notification for listing ID {}", listing.id);
        let notification = format_notification(listing, is_new, Utc::now());

        match self.sink.send(channel_id, &notification).await {
            Ok(()) => Delivery::Delivered,
            Err(e) => {
                warn!("Error sending notification for {}: {}", listing.id, e);
                Delivery::Failed
            }
        }
    }
}
