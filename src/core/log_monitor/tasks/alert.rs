//! Alert evaluation task.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};

use crate::core::log_monitor::alerts::{AlertEvaluator, AlertEvent};
use crate::core::log_monitor::events::EventSender;
use crate::core::log_monitor::CounterStore;

/// Task that evaluates the high-traffic alert once per alert interval.
///
/// Reads cumulative hit totals only, so it never disturbs the snapshot
/// task's shadow counters.
pub async fn alert_task(
    store: Arc<CounterStore>,
    mut evaluator: AlertEvaluator,
    period: Duration,
    alert_tx: EventSender<AlertEvent>,
    mut shutdown: broadcast::Receiver<()>,
) {
    log::info!(
        "Alert task started (every {}s, threshold {:.2} hits/s)",
        period.as_secs(),
        evaluator.threshold()
    );

    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let total = store.hits.total();
                if let Some(event) = evaluator.evaluate(total, chrono::Local::now()) {
                    if event.is_triggered() {
                        log::warn!("{}", event);
                    } else {
                        log::info!("{}", event);
                    }

                    if let Err(e) = alert_tx.publish(event) {
                        log::debug!("Alert not delivered: {}", e);
                    }
                }
            }
            _ = shutdown.recv() => {
                log::info!("Alert task shutting down");
                break;
            }
        }
    }
}
