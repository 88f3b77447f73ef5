//! Ingestion: raw line → parsed record → counter increments.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use super::counters::CounterStore;
use super::parser::{parse_line, ParseError};

/// Running totals for the ingestion task
#[derive(Debug, Default)]
pub struct IngestStats {
    parsed: AtomicU64,
    skipped: AtomicU64,
    source_error: Mutex<Option<String>>,
}

impl IngestStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parsed(&self) -> u64 {
        self.parsed.load(Ordering::Relaxed)
    }

    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    /// Last error that stopped ingestion, if any
    pub fn source_error(&self) -> Option<String> {
        self.source_error.lock().clone()
    }

    pub fn set_source_error(&self, message: impl Into<String>) {
        *self.source_error.lock() = Some(message.into());
    }
}

/// Parse one line and apply it to the store.
///
/// A malformed line is counted as skipped and reported back; it never
/// affects the counters.
pub fn ingest_line(
    store: &CounterStore,
    stats: &IngestStats,
    line: &str,
) -> Result<(), ParseError> {
    match parse_line(line) {
        Ok(record) => {
            store.record(&record);
            stats.parsed.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
        Err(e) => {
            stats.skipped.fetch_add(1, Ordering::Relaxed);
            log::debug!("Skipping line ({}): {}", e, line);
            Err(e)
        }
    }
}
