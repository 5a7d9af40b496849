use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::feed::{Clock, SimulatedFeed};
use crate::{LocationMetric, SharedDashboard};

pub const DEFAULT_TICK: Duration = Duration::from_secs(8);
pub const MAX_TICK: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Serialize)]
pub struct FeedUpdate {
    pub tick: u64,
    pub at: DateTime<Utc>,
    pub locations: Vec<LocationMetric>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Armed,
}

/// Repeating timer that applies a [`SimulatedFeed`] tick to the shared
/// dashboard. Dropping the timer cancels the task.
pub struct FeedTimer {
    interval: Duration,
    clock: Arc<dyn Clock>,
    updates: broadcast::Sender<FeedUpdate>,
    task: Option<AbortHandle>,
}

impl FeedTimer {
    pub fn new(interval: Duration, clock: Arc<dyn Clock>) -> Self {
        let (updates, _) = broadcast::channel(32);
        Self {
            interval: interval.clamp(Duration::from_millis(1), MAX_TICK),
            clock,
            updates,
            task: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn state(&self) -> TimerState {
        match &self.task {
            Some(task) if !task.is_finished() => TimerState::Armed,
            _ => TimerState::Idle,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FeedUpdate> {
        self.updates.subscribe()
    }

    pub fn sender(&self) -> broadcast::Sender<FeedUpdate> {
        self.updates.clone()
    }

    pub fn start(&mut self, dashboard: SharedDashboard, mut feed: SimulatedFeed) -> bool {
        if self.state() == TimerState::Armed {
            return false;
        }

        let interval = self.interval;
        let clock = self.clock.clone();
        let updates = self.updates.clone();

        let worker: JoinHandle<()> = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut tick = 0u64;

            loop {
                ticker.tick().await;
                tick += 1;
                let now = clock.now();

                let locations = {
                    let mut guard = dashboard.write().await;
                    let next = feed.tick(guard.locations(), now);
                    if let Err(err) = guard.apply_feed(next) {
                        warn!(tick, error = %err, "feed tick rejected");
                        continue;
                    }
                    guard.locations().to_vec()
                };

                debug!(tick, locations = locations.len(), "feed tick applied");
                let _ = updates.send(FeedUpdate {
                    tick,
                    at: now,
                    locations,
                });
            }
        });

        let task = worker.abort_handle();
        tokio::spawn(async move {
            match worker.await {
                Err(err) if err.is_panic() => error!(error = %err, "feed task panicked"),
                Err(_) => {}
                Ok(()) => warn!("feed task exited"),
            }
        });

        info!(interval_ms = interval.as_millis() as u64, "feed timer armed");
        self.task = Some(task);
        true
    }

    pub fn stop(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.abort();
                info!("feed timer stopped");
                true
            }
            None => false,
        }
    }
}

impl Drop for FeedTimer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
