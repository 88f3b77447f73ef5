//! Async tasks driving the monitor.
//!
//! Ingestion, snapshots and alert evaluation each run in their own task and
//! only meet through the shared counter store.

mod alert;
mod ingest;
mod snapshot;

pub use alert::alert_task;
pub use ingest::ingestion_task;
pub use snapshot::snapshot_task;
