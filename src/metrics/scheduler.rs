//! Background metrics push while a job is running
//!
//! The decider pushes once on start and once on end; between the two this
//! task keeps the pushgateway fresh on a fixed interval. It only reads the
//! shared instruments, so it never blocks the decider.

use crate::core::collaborators::RunningJobTracker;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Spawns the periodic push task
///
/// The first push happens one `period` after spawning. The task exits once
/// `true` is sent on `stop` or the sender is dropped. A zero `period`
/// disables the periodic push; the task then only waits for `stop`.
pub fn spawn_periodic_push(
    tracker: Arc<dyn RunningJobTracker>,
    period: Duration,
    mut stop: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if period.is_zero() {
            tracing::warn!("Push interval is zero, periodic metrics push disabled");
            while stop.changed().await.is_ok() {
                if *stop.borrow() {
                    break;
                }
            }
            return;
        }

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = tracker.push_metrics().await {
                        tracing::warn!(error = %e, "Periodic metrics push failed");
                    }
                }
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        tracing::debug!("Stopping periodic metrics push");
                        break;
                    }
                }
            }
        }
    })
}
