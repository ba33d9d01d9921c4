//! Background task that rotates the current batch on a fixed interval.
//!
//! The clock is spawned once, after the store is populated, and runs for the rest of the
//! process. It is started even when there is nothing to rotate: with zero or one batch every
//! tick is simply a no-op. On shutdown its token is cancelled and the task is abandoned; nothing
//! waits for it and it holds no resources that need releasing.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::store::BatchStore;

pub struct RotationClock {
    store: Arc<BatchStore>,
    interval: Duration,
}

impl RotationClock {
    pub fn new(store: Arc<BatchStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Spawn the clock onto the current runtime.
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    /// Sleep for one interval, advance, repeat until `shutdown` is cancelled.
    #[instrument(skip_all, fields(interval = ?self.interval, batches = self.store.len()))]
    pub async fn run(self, shutdown: CancellationToken) {
        info!("Starting rotation clock");

        // First advance happens one full interval after start, not immediately
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("Rotation clock stopped");
                    return;
                }
                _ = ticker.tick() => self.tick(),
            }
        }
    }

    fn tick(&self) {
        match self.store.advance() {
            Some(index) => {
                let device_ids = self.store.batches()[index].device_ids();
                info!("Rotated to batch {}: {:?}", index, device_ids);

                metrics::counter!("mockfeed_rotations_total").increment(1);
                metrics::gauge!("mockfeed_current_batch").set(index as f64);
            }
            None => debug!("Fewer than two batches loaded, nothing to rotate"),
        }
    }
}
