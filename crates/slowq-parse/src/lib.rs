//! Decoding and parsing of slow-query log material.
//!
//! Covers the CloudWatch subscription envelope, the auto-explain
//! query-record lines, and the companion parameter-record lines.

pub mod envelope;
pub mod fence;
pub mod parameters;
pub mod query_log;

pub use envelope::{decode_envelope, EnvelopeError, EnvelopeLogEvent, LogEnvelope};
pub use fence::{fence, unfence};
pub use parameters::substitute_parameters;
pub use query_log::{parse_query_log, ParseError, ParsedQuery, QueryType};

/// Whether a fetched log line documents a query execution.
pub fn is_query_record(message: &str) -> bool {
    message.contains("Query Text")
}

/// Whether a fetched log line lists bound parameter values.
pub fn is_parameter_record(message: &str) -> bool {
    message.contains("parameters")
}
