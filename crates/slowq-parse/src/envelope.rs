//! Decoding of the CloudWatch Logs subscription-filter envelope.

use std::io::Read;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use flate2::read::GzDecoder;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("envelope payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("envelope payload is not valid gzip: {0}")]
    Gzip(#[from] std::io::Error),
    #[error("envelope payload is not the expected JSON shape: {0}")]
    Json(#[from] serde_json::Error),
    #[error("envelope is missing a log group name")]
    EmptyLogGroup,
    #[error("envelope carries no log events")]
    NoEvents,
}

/// Decoded subscription envelope. Immutable once decoded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEnvelope {
    #[serde(default)]
    pub log_group: String,
    #[serde(default)]
    pub log_stream: String,
    #[serde(default)]
    pub log_events: Vec<EnvelopeLogEvent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeLogEvent {
    #[serde(default)]
    pub timestamp: i64,
    pub message: String,
}

/// Decodes the base64+gzip subscription payload and validates the invariants
/// the rest of the pipeline relies on: a non-empty log group and at least
/// one event to source the window timestamp from.
pub fn decode_envelope(data: &str) -> Result<LogEnvelope, EnvelopeError> {
    let compressed = BASE64_STANDARD.decode(data.trim())?;
    let mut raw = String::new();
    GzDecoder::new(compressed.as_slice()).read_to_string(&mut raw)?;
    let envelope: LogEnvelope = serde_json::from_str(&raw)?;
    if envelope.log_group.trim().is_empty() {
        return Err(EnvelopeError::EmptyLogGroup);
    }
    if envelope.log_events.is_empty() {
        return Err(EnvelopeError::NoEvents);
    }
    Ok(envelope)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    use super::*;

    fn encode(json: &str) -> String {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(json.as_bytes()).expect("gzip write");
        BASE64_STANDARD.encode(encoder.finish().expect("gzip finish"))
    }

    #[test]
    fn decode_envelope_round_trips_subscription_payload() {
        let payload = encode(
            r#"{
                "messageType": "DATA_MESSAGE",
                "logGroup": "/aws/rds/instance/db/postgresql",
                "logStream": "db.0",
                "logEvents": [
                    {"id": "1", "timestamp": 1577880000000, "message": "2020-01-01 12:00:00 UTC: line"}
                ]
            }"#,
        );

        let envelope = decode_envelope(&payload).expect("decode");
        assert_eq!(envelope.log_group, "/aws/rds/instance/db/postgresql");
        assert_eq!(envelope.log_stream, "db.0");
        assert_eq!(envelope.log_events.len(), 1);
        assert_eq!(envelope.log_events[0].timestamp, 1_577_880_000_000);
    }

    #[test]
    fn decode_envelope_rejects_empty_log_group() {
        let payload = encode(r#"{"logGroup": "", "logStream": "s", "logEvents": [{"message": "m"}]}"#);
        assert!(matches!(
            decode_envelope(&payload),
            Err(EnvelopeError::EmptyLogGroup)
        ));
    }

    #[test]
    fn decode_envelope_rejects_event_free_payload() {
        let payload = encode(r#"{"logGroup": "g", "logStream": "s", "logEvents": []}"#);
        assert!(matches!(
            decode_envelope(&payload),
            Err(EnvelopeError::NoEvents)
        ));
    }

    #[test]
    fn decode_envelope_rejects_garbage_base64() {
        assert!(matches!(
            decode_envelope("not base64 at all!"),
            Err(EnvelopeError::Base64(_))
        ));
    }

    #[test]
    fn decode_envelope_rejects_uncompressed_payload() {
        let payload = BASE64_STANDARD.encode(r#"{"logGroup": "g"}"#);
        assert!(matches!(
            decode_envelope(&payload),
            Err(EnvelopeError::Gzip(_))
        ));
    }
}
