//! Tokio runtime and wiring for the monitor tasks.

use std::sync::Arc;

use tokio::sync::broadcast;

use super::alerts::{AlertEvaluator, AlertEvent};
use super::counters::CounterStore;
use super::events::{event_stream, EventReceiver, EventSender};
use super::ingest::IngestStats;
use super::snapshot::MetricsSnapshot;
use super::source::{FileTailer, LineSource};
use super::tasks::{alert_task, ingestion_task, snapshot_task};
use crate::core::config::MonitorConfig;
use crate::error::Result;

/// Shared state handed to every task
#[derive(Debug, Clone)]
pub struct MonitorShared {
    pub store: Arc<CounterStore>,
    pub stats: Arc<IngestStats>,
}

impl MonitorShared {
    pub fn new() -> Self {
        Self {
            store: Arc::new(CounterStore::new()),
            stats: Arc::new(IngestStats::new()),
        }
    }
}

impl Default for MonitorShared {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrapper around the Tokio runtime running the monitor.
///
/// Consumers read the two event streams; dropping or calling
/// [`MonitorRuntime::shutdown`] stops every task.
pub struct MonitorRuntime {
    /// One snapshot per collection interval
    pub snapshots: EventReceiver<MetricsSnapshot>,

    /// Alert transitions
    pub alerts: EventReceiver<AlertEvent>,

    pub shared: MonitorShared,

    source_name: String,

    /// Shutdown signal sender
    shutdown_tx: broadcast::Sender<()>,

    /// Handle to the runtime (for shutdown)
    _runtime_handle: tokio::runtime::Runtime,
}

impl MonitorRuntime {
    /// Start monitoring the file named in `config`.
    ///
    /// A missing or unreadable file does not prevent start-up: the error is
    /// recorded in the ingest stats and the periodic tasks keep running.
    pub fn new(config: &MonitorConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let shared = MonitorShared::new();
        let source: Option<Box<dyn LineSource>> =
            match FileTailer::open(&config.log_source, config.start_at_end) {
                Ok(tailer) => Some(Box::new(tailer)),
                Err(e) => {
                    log::error!("{}", e);
                    shared.stats.set_source_error(e.to_string());
                    None
                }
            };

        Self::start(config, shared, source)
    }

    /// Start monitoring with an arbitrary line source.
    pub fn with_source(config: &MonitorConfig, source: Box<dyn LineSource>) -> anyhow::Result<Self> {
        config.validate()?;
        Self::start(config, MonitorShared::new(), Some(source))
    }

    fn start(
        config: &MonitorConfig,
        shared: MonitorShared,
        source: Option<Box<dyn LineSource>>,
    ) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_time()
            .thread_name("logmon-worker")
            .build()?;

        let source_name = source
            .as_ref()
            .map(|s| s.describe())
            .unwrap_or_else(|| config.log_source.display().to_string());

        let (snapshot_tx, snapshots) = event_stream("snapshot", config.event_queue_capacity);
        let (alert_tx, alerts) = event_stream("alert", config.event_queue_capacity);
        let (shutdown_tx, _) = broadcast::channel::<()>(1);

        // Subscribe every task to shutdown before handing out the runtime
        {
            let _guard = runtime.enter();
            spawn_all_tasks(
                config,
                shared.clone(),
                source,
                snapshot_tx,
                alert_tx,
                &shutdown_tx,
            )?;
        }

        log::info!("MonitorRuntime initialized for {}", source_name);

        Ok(Self {
            snapshots,
            alerts,
            shared,
            source_name,
            shutdown_tx,
            _runtime_handle: runtime,
        })
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Shutdown the runtime gracefully.
    pub fn shutdown(self) {
        log::info!("Shutting down MonitorRuntime");
        let _ = self.shutdown_tx.send(());
        // Runtime will shutdown when dropped
    }
}

/// Spawn the ingestion, snapshot and alert tasks.
///
/// Must be called from inside a Tokio runtime. `shutdown` stops all of them.
/// Nothing is spawned when `config` does not validate.
pub fn spawn_all_tasks(
    config: &MonitorConfig,
    shared: MonitorShared,
    source: Option<Box<dyn LineSource>>,
    snapshot_tx: EventSender<MetricsSnapshot>,
    alert_tx: EventSender<AlertEvent>,
    shutdown: &broadcast::Sender<()>,
) -> Result<()> {
    config.validate()?;

    if let Some(source) = source {
        tokio::spawn(ingestion_task(
            source,
            Arc::clone(&shared.store),
            Arc::clone(&shared.stats),
            config.poll_interval(),
            shutdown.subscribe(),
        ));
    } else {
        log::warn!("No log source available, only periodic tasks will run");
    }

    tokio::spawn(snapshot_task(
        Arc::clone(&shared.store),
        config.collection_interval(),
        snapshot_tx,
        shutdown.subscribe(),
    ));

    let evaluator = AlertEvaluator::new(config.alert_threshold, config.alert_interval());
    tokio::spawn(alert_task(
        Arc::clone(&shared.store),
        evaluator,
        config.alert_interval(),
        alert_tx,
        shutdown.subscribe(),
    ));

    Ok(())
}
