// logmon Library - Public API

use std::fs::OpenOptions;
use std::path::Path;

// Re-export error types
pub mod error;
pub use error::{LogmonError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod ui;

// Re-export commonly used types
pub use core::config::MonitorConfig;

// Initialize logging, optionally into a file so a full-screen UI stays clean
pub fn init_logging(log_file: Option<&Path>) {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(log::LevelFilter::Info);

    // RUST_LOG still wins over the default level
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    if let Some(path) = log_file {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("Cannot open log file {}: {}", path.display(), e),
        }
    }

    let _ = builder.try_init();
}
