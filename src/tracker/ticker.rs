use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Source of polling cycle starts
#[async_trait]
pub trait Ticker: Send {
    /// Wait for the next cycle. Returns `false` once no more cycles will come.
    async fn tick(&mut self) -> bool;
}

/// Fires every `period`, starting one full period after creation
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        // A slow cycle pushes the schedule back rather than triggering a burst
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) -> bool {
        self.interval.tick().await;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_one_period() {
        let start = Instant::now();
        let mut ticker = IntervalTicker::new(Duration::from_secs(60));

        assert!(ticker.tick().await);
        assert!(start.elapsed() >= Duration::from_secs(60));

        assert!(ticker.tick().await);
        assert!(start.elapsed() >= Duration::from_secs(120));
    }
}
