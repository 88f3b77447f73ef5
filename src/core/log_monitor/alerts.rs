//! High-traffic alert state machine.
//!
//! The evaluator compares the average hit rate over the last window with a
//! threshold. It only emits on a crossing: once triggered it stays quiet until
//! the rate drops below the threshold, and vice versa.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// State carried from one evaluation to the next
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertState {
    pub previous_total_hits: u64,
    pub triggered: bool,
}

/// Alert transition published on the alert stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlertEvent {
    Triggered {
        rate: f64,
        timestamp: DateTime<Local>,
    },
    Recovered {
        timestamp: DateTime<Local>,
    },
}

impl AlertEvent {
    pub fn timestamp(&self) -> DateTime<Local> {
        match self {
            AlertEvent::Triggered { timestamp, .. } | AlertEvent::Recovered { timestamp } => {
                *timestamp
            }
        }
    }

    pub fn is_triggered(&self) -> bool {
        matches!(self, AlertEvent::Triggered { .. })
    }
}

impl fmt::Display for AlertEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertEvent::Triggered { rate, timestamp } => write!(
                f,
                "High traffic generated an alert - hits = {:.2}, triggered at {}",
                rate,
                timestamp.format(TIMESTAMP_FORMAT)
            ),
            AlertEvent::Recovered { timestamp } => {
                write!(f, "Alert recovered at {}", timestamp.format(TIMESTAMP_FORMAT))
            }
        }
    }
}

/// Two-state (normal/triggered) alert machine with recovery hysteresis
#[derive(Debug, Clone)]
pub struct AlertEvaluator {
    threshold: f64,
    window: Duration,
    state: AlertState,
}

impl AlertEvaluator {
    /// `threshold` is in hits per second, `window` is the evaluation period.
    pub fn new(threshold: f64, window: Duration) -> Self {
        Self::with_state(threshold, window, AlertState::default())
    }

    pub fn with_state(threshold: f64, window: Duration, state: AlertState) -> Self {
        Self {
            threshold,
            window,
            state,
        }
    }

    pub fn state(&self) -> AlertState {
        self.state
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Average hits per second between the previous evaluation and `total_hits`.
    ///
    /// Before any hits were seen the baseline is zero, so the first window
    /// after start covers everything since process start.
    pub fn rate(&self, total_hits: u64) -> f64 {
        let window_secs = self.window.as_secs_f64();
        if window_secs <= 0.0 {
            return 0.0;
        }

        let hits = if self.state.previous_total_hits > 0 {
            total_hits.saturating_sub(self.state.previous_total_hits)
        } else {
            total_hits
        };
        hits as f64 / window_secs
    }

    /// Run one evaluation tick against the cumulative hit count.
    pub fn evaluate(&mut self, total_hits: u64, now: DateTime<Local>) -> Option<AlertEvent> {
        let rate = self.rate(total_hits);

        let event = match (self.state.triggered, rate >= self.threshold) {
            (false, true) => {
                self.state.triggered = true;
                Some(AlertEvent::Triggered {
                    rate,
                    timestamp: now,
                })
            }
            (true, false) => {
                self.state.triggered = false;
                Some(AlertEvent::Recovered { timestamp: now })
            }
            _ => None,
        };

        self.state.previous_total_hits = total_hits;
        event
    }
}
