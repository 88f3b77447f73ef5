//! Line-oriented text output for non-interactive use.

use colored::*;

use super::formatters::{format_rate, format_size, format_time};
use crate::core::log_monitor::{AlertEvent, MetricsSnapshot};

/// One summary line per snapshot
pub fn format_snapshot(snapshot: &MetricsSnapshot, window_secs: u64) -> String {
    let sections = if snapshot.top_sections.is_empty() {
        "-".to_string()
    } else {
        snapshot
            .top_sections
            .iter()
            .map(|s| format!("{} ({})", s.name, s.hits))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let codes = snapshot
        .return_codes
        .iter()
        .filter(|&(_, &count)| count > 0)
        .map(|(code, count)| format!("{}:{}", code, count))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "[{}] hits={} ({}) bytes={} top=[{}] codes=[{}]",
        format_time(snapshot.timestamp),
        snapshot.total_hits,
        format_rate(snapshot.total_hits, window_secs),
        format_size(snapshot.total_bytes),
        sections,
        codes
    )
}

/// Alert line, red when triggered and green when recovered
pub fn format_alert(event: &AlertEvent) -> String {
    let text = event.to_string();
    if event.is_triggered() {
        text.red().bold().to_string()
    } else {
        text.green().to_string()
    }
}
