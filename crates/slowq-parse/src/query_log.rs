//! Parsing of query-record lines into structured notification material.
//!
//! A query-record line is the auto-explain output of the database engine:
//! a prefix with timestamp, client address, and severity, then `duration:
//! NNN.NNN ms plan:`, then `Query Text:` followed by the statement, then the
//! execution plan whose first line carries a `(cost=..)` annotation.

use std::sync::OnceLock;

use chrono_tz::Tz;
use regex::Regex;
use sqlformat::{FormatOptions, QueryParams};
use thiserror::Error;

use slowq_core::{first_timestamp, localize, TimeError};

use crate::fence::fence;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("log line has no {0} field")]
    MissingField(&'static str),
    #[error("duration is not a number: {0:?}")]
    InvalidDuration(String),
    #[error("parameter index is not a number: {0:?}")]
    InvalidParameterIndex(String),
    #[error(transparent)]
    Time(#[from] TimeError),
}

/// Statement kind, detected by priority-ordered substring checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Select,
    Insert,
    Update,
    Delete,
    Unknown,
}

impl QueryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// One query-record line, parsed and formatted for notification.
///
/// `query_text` and `explain_text` are already fenced; `query_text` is
/// rewritten once more if a matching parameter record exists.
#[derive(Debug, Clone)]
pub struct ParsedQuery {
    pub executed_at: String,
    pub client_ip: String,
    pub duration_seconds: f64,
    pub query_type: QueryType,
    pub explain_cost: String,
    pub query_text: String,
    pub explain_text: String,
}

fn client_ip_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+\.\d+\.\d+\.\d+").expect("valid ip pattern"))
}

fn duration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+\.\d+) ms").expect("valid duration pattern"))
}

// The statement ends where the first plan line begins: the first line whose
// text reaches a `(cost=` annotation without crossing a newline or tab.
fn query_text_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)Query Text: (.*?)[^\n\t]*?\(cost=").expect("valid query pattern")
    })
}

fn explain_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)Query Text: .*?([^\n\t]*?\(cost=.*)").expect("valid explain pattern")
    })
}

fn cost_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"cost=(\S+)").expect("valid cost pattern"))
}

fn identify_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(.*):LOG").expect("valid identify pattern"))
}

fn extract_client_ip(line: &str) -> Result<&str, ParseError> {
    client_ip_pattern()
        .find(line)
        .map(|found| found.as_str())
        .ok_or(ParseError::MissingField("client ip"))
}

/// Milliseconds before the literal ` ms` unit, converted to seconds and
/// rounded to two decimals (half away from zero).
fn extract_duration_seconds(line: &str) -> Result<f64, ParseError> {
    let captured = duration_pattern()
        .captures(line)
        .ok_or(ParseError::MissingField("duration"))?;
    let milliseconds: f64 = captured[1]
        .parse()
        .map_err(|_| ParseError::InvalidDuration(captured[1].to_string()))?;
    Ok(round_to_hundredths(milliseconds / 1000.0))
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn extract_query_text(line: &str) -> Result<&str, ParseError> {
    query_text_pattern()
        .captures(line)
        .and_then(|captured| captured.get(1))
        .map(|group| group.as_str())
        .ok_or(ParseError::MissingField("query text"))
}

fn extract_explain_text(line: &str) -> Result<&str, ParseError> {
    explain_pattern()
        .captures(line)
        .and_then(|captured| captured.get(1))
        .map(|group| group.as_str())
        .ok_or(ParseError::MissingField("execution plan"))
}

fn extract_explain_cost(explain: &str) -> Result<&str, ParseError> {
    cost_pattern()
        .captures(explain)
        .and_then(|captured| captured.get(1))
        .map(|group| group.as_str())
        .ok_or(ParseError::MissingField("plan cost"))
}

/// The line prefix before `:LOG`, shared verbatim by the companion
/// parameter-record line (where it precedes `:DETAIL`).
fn extract_identify_info(line: &str) -> Result<&str, ParseError> {
    identify_pattern()
        .captures(line)
        .and_then(|captured| captured.get(1))
        .map(|group| group.as_str())
        .ok_or(ParseError::MissingField("identify info"))
}

/// Priority-ordered substring check. Deliberately not keyword-boundary
/// aware: a keyword inside an identifier still counts, matching the log
/// producer's classification.
pub(crate) fn detect_query_type(query: &str) -> QueryType {
    const CANDIDATES: [QueryType; 4] = [
        QueryType::Select,
        QueryType::Insert,
        QueryType::Update,
        QueryType::Delete,
    ];
    for candidate in CANDIDATES {
        if query.contains(candidate.as_str()) {
            return candidate;
        }
    }
    QueryType::Unknown
}

/// Uppercases keywords and reindents the statement for display.
fn reformat_sql(query: &str) -> String {
    let options = FormatOptions {
        uppercase: true,
        ..Default::default()
    };
    sqlformat::format(query, &QueryParams::None, options)
}

/// Parses one query-record line. Returns the structured record plus its
/// `identify_info` correlation key. Any missing field aborts the line with a
/// [`ParseError`]; nothing is skipped silently.
pub fn parse_query_log(line: &str, zone: Tz) -> Result<(ParsedQuery, String), ParseError> {
    let executed_at_utc = first_timestamp(line).ok_or(ParseError::MissingField("timestamp"))?;
    let query = extract_query_text(line)?;
    let explain = extract_explain_text(line)?;

    let record = ParsedQuery {
        executed_at: localize(executed_at_utc, zone)?,
        client_ip: extract_client_ip(line)?.to_string(),
        duration_seconds: extract_duration_seconds(line)?,
        query_type: detect_query_type(query),
        explain_cost: extract_explain_cost(explain)?.to_string(),
        query_text: fence(&reformat_sql(query)),
        explain_text: fence(explain),
    };
    let identify_info = extract_identify_info(line)?.to_string();
    Ok((record, identify_info))
}

#[cfg(test)]
mod tests;
