use std::{sync::Arc, time::Duration};

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use tokio::{sync::watch, time};
use tracing::{debug, error, info};

use super::client::{LevelSource, PollError};
use crate::{
    clock::{display_time, Clock},
    db::{models::Reading, ReadingStore},
};

/// Hourly ingestion of the upstream sensor level into the reading store.
pub struct Poller {
    source: Arc<dyn LevelSource>,
    store: Arc<dyn ReadingStore>,
    clock: Arc<dyn Clock>,
}

impl Poller {
    pub fn new(
        source: Arc<dyn LevelSource>,
        store: Arc<dyn ReadingStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { source, store, clock }
    }

    /// One fetch followed by one insert. No retries.
    pub async fn poll_once(&self) -> Result<Reading, PollError> {
        let level = self.source.fetch_level().await?;
        self.store
            .insert(level, self.clock.now())
            .await
            .map_err(PollError::Store)
    }

    /// Run a single poll and log the outcome. Failures end here.
    pub async fn tick(&self) -> Option<Reading> {
        match self.poll_once().await {
            Ok(reading) => {
                info!(
                    level = reading.level,
                    at = %display_time(reading.timestamp),
                    "Auto-logged sensor reading"
                );
                Some(reading)
            }
            Err(e) => {
                error!(url = %self.source.endpoint(), error = %e, "Sensor poll failed");
                None
            }
        }
    }

    /// Poll at the top of every hour until `shutdown` flips to `true` or its
    /// sender is dropped. Spawn this via `tokio::spawn`.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(url = %self.source.endpoint(), "Sensor polling loop started");
        let mut last = self.clock.now();

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            let now = self.clock.now();
            let target = next_tick_after(now.max(last));
            let wait = (target - now).to_std().unwrap_or(Duration::ZERO);
            debug!(next_tick = %target, wait_secs = wait.as_secs(), "Waiting for next poll");

            tokio::select! {
                _ = time::sleep(wait) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
            }

            self.tick().await;
            last = target;
        }

        info!("Sensor polling loop stopped");
    }
}

/// First top of the hour strictly after `t`.
pub fn next_tick_after(t: DateTime<Utc>) -> DateTime<Utc> {
    let hour = TimeDelta::hours(1);
    t.duration_trunc(hour)
        .map(|top| top + hour)
        .unwrap_or(t + hour)
}
