//! Windowed traffic snapshots built from counter deltas.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::counters::CounterStore;

/// Maximum number of sections reported per snapshot
pub const TOP_SECTIONS: usize = 5;

/// Hits for one section during one collection window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub hits: u64,
}

/// Traffic observed during one collection window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: i64, // Unix timestamp
    pub total_hits: u64,
    pub total_bytes: u64,
    /// At most [`TOP_SECTIONS`] entries, busiest first
    pub top_sections: Vec<Section>,
    pub return_codes: BTreeMap<u16, u64>,
}

/// Consume the deltas accumulated since the previous call and build a snapshot.
///
/// Sections are ordered by hits descending, then by name ascending so that
/// equal counts always come out in the same order.
pub fn take_snapshot(store: &CounterStore) -> MetricsSnapshot {
    let hit_deltas = store.hits.snapshot_and_reset();
    let byte_deltas = store.bytes.snapshot_and_reset();

    let total_hits = hit_deltas.iter().map(|(_, hits)| hits).sum();
    let total_bytes = byte_deltas.iter().map(|(_, bytes)| bytes).sum();

    let mut sections: Vec<Section> = hit_deltas
        .into_iter()
        .map(|(name, hits)| Section { name, hits })
        .collect();
    sections.sort_by(|a, b| b.hits.cmp(&a.hits).then_with(|| a.name.cmp(&b.name)));
    sections.truncate(TOP_SECTIONS);

    let return_codes = store.status.snapshot_and_reset().into_iter().collect();

    MetricsSnapshot {
        timestamp: chrono::Utc::now().timestamp(),
        total_hits,
        total_bytes,
        top_sections: sections,
        return_codes,
    }
}
