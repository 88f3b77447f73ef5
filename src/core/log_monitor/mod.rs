//! Access-log monitoring core.
//!
//! This module tails an access log, keeps per-section counters and turns them
//! into periodic traffic snapshots and high-traffic alerts.

pub mod alerts;
mod counters;
pub mod events;
mod history;
mod ingest;
pub mod parser;
pub mod runtime;
mod snapshot;
pub mod source;
mod tasks;

pub use alerts::{AlertEvaluator, AlertEvent, AlertState};
pub use counters::{CounterFamily, CounterStore};
pub use events::{event_stream, EventReceiver, EventSender, DEFAULT_EVENT_CAPACITY};
pub use history::TrafficHistory;
pub use ingest::{ingest_line, IngestStats};
pub use parser::{extract_section, parse_line, AccessRecord, ParseError};
pub use runtime::{spawn_all_tasks, MonitorRuntime, MonitorShared};
pub use snapshot::{take_snapshot, MetricsSnapshot, Section, TOP_SECTIONS};
pub use source::{FileTailer, LineSource};
pub use tasks::{alert_task, ingestion_task, snapshot_task};
