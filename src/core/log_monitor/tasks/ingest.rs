//! Log ingestion task.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::core::log_monitor::ingest::{ingest_line, IngestStats};
use crate::core::log_monitor::{CounterStore, LineSource};

/// Task that polls `source` and feeds every line into the store.
///
/// Each poll runs on the blocking pool so file I/O never holds a runtime
/// worker. Malformed lines are skipped. A source error ends this task only;
/// the periodic tasks keep reporting what was already counted.
pub async fn ingestion_task(
    mut source: Box<dyn LineSource>,
    store: Arc<CounterStore>,
    stats: Arc<IngestStats>,
    poll_interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    log::info!("Ingestion task started for {}", source.describe());

    let mut ticker = interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let poll = tokio::task::spawn_blocking(move || {
                    let result = source.poll_lines();
                    (source, result)
                });

                let result = match poll.await {
                    Ok((returned, result)) => {
                        source = returned;
                        result
                    }
                    Err(e) => {
                        log::error!("Ingestion stopped, poll failed: {}", e);
                        stats.set_source_error(format!("poll failed: {}", e));
                        break;
                    }
                };

                match result {
                    Ok(lines) => {
                        for line in &lines {
                            // Failures are already counted and logged
                            let _ = ingest_line(&store, &stats, line);
                        }
                    }
                    Err(e) => {
                        log::error!("Ingestion stopped: {}", e);
                        stats.set_source_error(e.to_string());
                        break;
                    }
                }
            }
            _ = shutdown.recv() => {
                log::info!("Ingestion task shutting down");
                break;
            }
        }
    }
}
