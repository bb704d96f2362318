//! The `YYYY-MM-DD HH:MM:SS` timestamp shape shared by the log format and
//! the notification output.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use thiserror::Error;

/// Fixed timestamp layout used by the database log and the Slack output.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum TimeError {
    #[error("timestamp does not match YYYY-MM-DD HH:MM:SS: {0:?}")]
    Format(String),
}

pub(crate) fn timestamp_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}").expect("valid timestamp pattern")
    })
}

/// Returns the first timestamp-shaped substring of `text`, if any.
pub fn first_timestamp(text: &str) -> Option<&str> {
    timestamp_pattern().find(text).map(|found| found.as_str())
}

/// Parses a full timestamp string as UTC. The whole input must match the
/// fixed layout; trailing text is rejected.
pub(crate) fn parse_utc(value: &str) -> Result<DateTime<Utc>, TimeError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|parsed| parsed.and_utc())
        .map_err(|_| TimeError::Format(value.to_string()))
}
