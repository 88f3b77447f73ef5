use chrono::{Local, TimeZone};
use humansize::{format_size as human_format_size, DECIMAL};

/// Format a byte count in human-readable form (kB, MB, GB)
pub fn format_size(bytes: u64) -> String {
    human_format_size(bytes, DECIMAL)
}

/// Format a unix timestamp in local time (HH:MM:SS)
pub fn format_time(timestamp: i64) -> String {
    match Local.timestamp_opt(timestamp, 0).single() {
        Some(datetime) => datetime.format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}

/// Average rate over a window, e.g. "12.30/s"
pub fn format_rate(count: u64, window_secs: u64) -> String {
    if window_secs == 0 {
        return "0.00/s".to_string();
    }
    format!("{:.2}/s", count as f64 / window_secs as f64)
}
