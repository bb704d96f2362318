//! Conversion of UTC log timestamps into the configured display zone.

use chrono_tz::Tz;

use crate::timestamp::{parse_utc, TimeError, TIMESTAMP_FORMAT};

/// Converts a UTC `YYYY-MM-DD HH:MM:SS` string into `zone` and renders it as
/// `YYYY-MM-DD HH:MM:SS  (<zone-name>)`.
///
/// A malformed timestamp is a hard [`TimeError`]; the caller treats it as
/// fatal for the whole log line rather than rendering a placeholder.
pub fn localize(utc_timestamp: &str, zone: Tz) -> Result<String, TimeError> {
    let local = parse_utc(utc_timestamp)?.with_timezone(&zone);
    Ok(format!(
        "{}  ({})",
        local.format(TIMESTAMP_FORMAT),
        zone.name()
    ))
}
