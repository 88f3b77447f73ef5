use std::io;
use thiserror::Error;

/// Custom error type for logmon
#[derive(Error, Debug)]
pub enum LogmonError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Log source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Publish error: {0}")]
    Publish(String),
}

/// Result type alias for logmon
pub type Result<T> = std::result::Result<T, LogmonError>;

impl LogmonError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        LogmonError::Config(msg.into())
    }

    /// Create a source unavailable error
    pub fn source_unavailable<S: Into<String>>(msg: S) -> Self {
        LogmonError::SourceUnavailable(msg.into())
    }

    pub fn publish<S: Into<String>>(msg: S) -> Self {
        LogmonError::Publish(msg.into())
    }
}
