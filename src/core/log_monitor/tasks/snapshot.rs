//! Snapshot task.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};

use crate::core::log_monitor::events::EventSender;
use crate::core::log_monitor::snapshot::{take_snapshot, MetricsSnapshot};
use crate::core::log_monitor::CounterStore;

/// Task that publishes one [`MetricsSnapshot`] per collection interval.
///
/// The first snapshot is taken one full period after start.
pub async fn snapshot_task(
    store: Arc<CounterStore>,
    period: Duration,
    snapshot_tx: EventSender<MetricsSnapshot>,
    mut shutdown: broadcast::Receiver<()>,
) {
    log::info!("Snapshot task started (every {}s)", period.as_secs());

    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let snapshot = take_snapshot(&store);
                log::debug!(
                    "Snapshot: {} hits, {} bytes, {} sections",
                    snapshot.total_hits,
                    snapshot.total_bytes,
                    snapshot.top_sections.len()
                );

                // No consumer right now is not fatal, the next tick tries again
                if let Err(e) = snapshot_tx.publish(snapshot) {
                    log::debug!("Snapshot not delivered: {}", e);
                }
            }
            _ = shutdown.recv() => {
                log::info!("Snapshot task shutting down");
                break;
            }
        }
    }
}
