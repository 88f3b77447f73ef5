// Core business logic module

pub mod config;
pub mod log_monitor;

// Re-export commonly used items
pub use config::MonitorConfig;
pub use log_monitor::{CounterStore, MetricsSnapshot, MonitorRuntime};
