//! Background sweep that evicts expired records.

use super::store::Store;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Periodic task calling [`Store::cleanup`].
///
/// The first pass runs one full period after [`CleanupScheduler::start`],
/// never immediately. Dropping the scheduler stops it.
///
/// # Example
///
/// ```no_run
/// use dictkv::daemon::services::kv::{CleanupScheduler, ExpirationPolicy, Store};
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() {
/// let store = Store::new(ExpirationPolicy::default());
/// let scheduler = CleanupScheduler::start(store, Duration::from_secs(30));
/// // ... serve requests ...
/// scheduler.stop();
/// # }
/// ```
#[derive(Debug)]
pub struct CleanupScheduler {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl CleanupScheduler {
    /// Spawns the sweep loop on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime or with a zero `period`.
    pub fn start(store: Store, period: Duration) -> Self {
        let (stop_tx, stop_rx) = watch::channel(false);
        let task = tokio::spawn(run_cleanup_loop(store, period, stop_rx));
        info!(period = ?period, "Cleanup scheduler started");
        Self { stop_tx, task }
    }

    /// Stops further passes. Idempotent.
    ///
    /// A pass already running finishes on its own; this does not wait for
    /// it.
    pub fn stop(&self) {
        let was_running = !self.stop_tx.send_replace(true);
        if was_running {
            info!("Cleanup scheduler stopped");
        }
    }

    /// Whether the sweep task is still alive.
    pub fn is_running(&self) -> bool {
        !*self.stop_tx.borrow() && !self.task.is_finished()
    }
}

impl Drop for CleanupScheduler {
    fn drop(&mut self) {
        self.stop_tx.send_replace(true);
    }
}

async fn run_cleanup_loop(store: Store, period: Duration, mut stop_rx: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                let evicted = store.cleanup();
                let remaining = store.len();
                crate::daemon::metrics::record_cleanup(evicted, remaining);
                debug!(evicted, remaining, "Cleanup pass finished");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daemon::services::kv::{Clock, ExpirationPolicy, ManualClock};
    use chrono::{TimeDelta, TimeZone, Utc};
    use serde_json::json;

    fn expired_store() -> Store {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2001, 2, 3, 4, 5, 6).unwrap());
        let store = Store::with_clock(ExpirationPolicy::new(10, 20), clock.clone());
        store.create("stale", vec![json!("x")], None);
        clock.advance(TimeDelta::days(1));
        assert!(store.peek("stale").unwrap().is_expired(clock.now()));
        store
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_pass_waits_one_period() {
        let store = expired_store();
        let scheduler = CleanupScheduler::start(store.clone(), Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert_eq!(store.len(), 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(store.len(), 0);

        scheduler.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_passes_repeat_every_period() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2001, 2, 3, 4, 5, 6).unwrap());
        let store = Store::with_clock(ExpirationPolicy::new(10, 20), clock.clone());
        let scheduler = CleanupScheduler::start(store.clone(), Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(31)).await;

        store.create("later", vec![json!(1)], None);
        clock.advance(TimeDelta::seconds(11));
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert!(store.is_empty());
        scheduler.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_prevents_further_passes() {
        let store = expired_store();
        let scheduler = CleanupScheduler::start(store.clone(), Duration::from_secs(30));

        scheduler.stop();
        scheduler.stop();
        tokio::time::sleep(Duration::from_secs(300)).await;

        assert_eq!(store.len(), 1);
        assert!(!scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_scheduler() {
        let store = expired_store();
        drop(CleanupScheduler::start(store.clone(), Duration::from_secs(30)));

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_records_survive_passes() {
        let store = Store::new(ExpirationPolicy::new(3600, 3600));
        store.create("fresh", vec![json!("y")], None);
        let scheduler = CleanupScheduler::start(store.clone(), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(store.get("fresh"), vec![json!("y")]);
        assert!(scheduler.is_running());
        scheduler.stop();
    }
}
