use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::log_monitor::DEFAULT_EVENT_CAPACITY;
use crate::error::LogmonError;

pub const DEFAULT_LOG_SOURCE: &str = "/tmp/access.log";
pub const DEFAULT_COLLECTION_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_ALERT_INTERVAL_SECS: u64 = 120;
pub const DEFAULT_ALERT_THRESHOLD: f64 = 10.0;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// Longest collection or alert interval accepted (one day)
pub const MAX_INTERVAL_SECS: u64 = 86_400;

/// Longest file poll interval accepted (one minute)
pub const MAX_POLL_INTERVAL_MS: u64 = 60_000;

/// Monitor configuration.
///
/// Every field is optional in the config file; missing ones take the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Access log to follow
    pub log_source: PathBuf,
    pub collection_interval_seconds: u64,
    pub alert_interval_seconds: u64,
    /// Average hits per second that raises the alert
    pub alert_threshold: f64,
    /// Unread events kept per consumer before the oldest are dropped
    pub event_queue_capacity: usize,
    /// How often the log file is checked for new lines
    pub poll_interval_ms: u64,
    /// Ignore lines already in the file when monitoring starts
    pub start_at_end: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            log_source: PathBuf::from(DEFAULT_LOG_SOURCE),
            collection_interval_seconds: DEFAULT_COLLECTION_INTERVAL_SECS,
            alert_interval_seconds: DEFAULT_ALERT_INTERVAL_SECS,
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
            event_queue_capacity: DEFAULT_EVENT_CAPACITY,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            start_at_end: true,
        }
    }
}

impl MonitorConfig {
    /// Load the user config file if it exists, defaults otherwise.
    pub fn load() -> Result<Self> {
        match Self::get_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load a JSON config file. Unknown fields are ignored.
    ///
    /// Values are not validated here: command-line flags may still override
    /// them, so callers run [`MonitorConfig::validate`] on the final result.
    pub fn load_from(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: MonitorConfig = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// `<config_dir>/logmon/config.json`
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("logmon").join("config.json"))
    }

    /// Reject settings the monitor cannot run with.
    pub fn validate(&self) -> std::result::Result<(), LogmonError> {
        check_interval(
            "collection_interval_seconds",
            self.collection_interval_seconds,
            MAX_INTERVAL_SECS,
        )?;
        check_interval(
            "alert_interval_seconds",
            self.alert_interval_seconds,
            MAX_INTERVAL_SECS,
        )?;
        if !self.alert_threshold.is_finite() || self.alert_threshold < 0.0 {
            return Err(LogmonError::config(format!(
                "alert_threshold must be a non-negative number, got {}",
                self.alert_threshold
            )));
        }
        if self.event_queue_capacity == 0 {
            return Err(LogmonError::config(
                "event_queue_capacity must be greater than zero",
            ));
        }
        check_interval("poll_interval_ms", self.poll_interval_ms, MAX_POLL_INTERVAL_MS)?;
        Ok(())
    }

    pub fn collection_interval(&self) -> Duration {
        Duration::from_secs(self.collection_interval_seconds)
    }

    pub fn alert_interval(&self) -> Duration {
        Duration::from_secs(self.alert_interval_seconds)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn check_interval(name: &str, value: u64, max: u64) -> std::result::Result<(), LogmonError> {
    if value == 0 || value > max {
        return Err(LogmonError::config(format!(
            "{} must be between 1 and {}, got {}",
            name, max, value
        )));
    }
    Ok(())
}
