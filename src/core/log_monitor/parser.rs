//! Access-log line parser.
//!
//! Turns one raw line in common log format into an [`AccessRecord`]. The
//! parser is a pure function; ingestion decides what to do with failures.

use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// `host ident user [timestamp tz] "METHOD PATH PROTOCOL" status bytes`
static ACCESS_LOG_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(\S+) (\S+) (\S+) \[([\w:/]+\s[+\-]\d{4})\] "(\S+) (\S+)\s*(\S+)?\s*" (\d{3}) (\S+)"#,
    )
    .expect("access log regex is valid")
});

const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Section used for requests whose path has no first segment (`/`, `/?q=1`).
pub const ROOT_SECTION: &str = "/";

/// Reasons a single line could not be turned into a record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line does not match the access log format")]
    Malformed,

    #[error("invalid request path: {0}")]
    InvalidPath(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("invalid status code: {0}")]
    InvalidStatus(String),

    #[error("invalid byte count: {0}")]
    InvalidBytes(String),
}

/// One parsed access-log line
#[derive(Debug, Clone, PartialEq)]
pub struct AccessRecord {
    pub remote_host: String,
    pub ident: String,
    pub user: String,
    pub timestamp: DateTime<FixedOffset>,
    pub method: String,
    pub path: String,
    pub protocol: Option<String>,
    pub status: u16,
    pub bytes: u64,
    /// First path segment, e.g. `/api` for `/api/users/1`
    pub section: String,
}

/// Parse one access-log line.
pub fn parse_line(line: &str) -> Result<AccessRecord, ParseError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let caps = ACCESS_LOG_LINE
        .captures(line)
        .ok_or(ParseError::Malformed)?;

    let raw_timestamp = &caps[4];
    let timestamp = DateTime::parse_from_str(raw_timestamp, TIMESTAMP_FORMAT)
        .map_err(|_| ParseError::InvalidTimestamp(raw_timestamp.to_string()))?;

    let path = caps[6].to_string();
    let section = extract_section(&path)?;

    let raw_status = &caps[8];
    let status = raw_status
        .parse::<u16>()
        .map_err(|_| ParseError::InvalidStatus(raw_status.to_string()))?;

    let bytes = parse_bytes(&caps[9])?;

    Ok(AccessRecord {
        remote_host: caps[1].to_string(),
        ident: caps[2].to_string(),
        user: caps[3].to_string(),
        timestamp,
        method: caps[5].to_string(),
        path,
        protocol: caps.get(7).map(|m| m.as_str().to_string()),
        status,
        bytes,
        section,
    })
}

/// Extract the section (first path segment) from a request path.
///
/// Query strings and fragments are ignored. A path whose first segment is
/// empty maps to [`ROOT_SECTION`]. Paths that do not start with `/` (absolute
/// URLs, `*`) are rejected.
pub fn extract_section(path: &str) -> Result<String, ParseError> {
    let path_only = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    let rest = path_only
        .strip_prefix('/')
        .ok_or_else(|| ParseError::InvalidPath(path.to_string()))?;

    match rest.split('/').next() {
        Some(segment) if !segment.is_empty() => Ok(format!("/{}", segment)),
        _ => Ok(ROOT_SECTION.to_string()),
    }
}

fn parse_bytes(raw: &str) -> Result<u64, ParseError> {
    // Common log format writes "-" when no body was sent
    if raw == "-" {
        return Ok(0);
    }
    raw.parse::<u64>()
        .map_err(|_| ParseError::InvalidBytes(raw.to_string()))
}
