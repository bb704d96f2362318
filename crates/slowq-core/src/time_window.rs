//! Symmetric extraction window around a slow-query timestamp.

use chrono::Duration;

use crate::timestamp::{parse_utc, TimeError};

/// Millisecond-epoch window handed to the log-store range query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

/// Computes the window `timestamp ± half_width_seconds` in millisecond epoch.
///
/// The timestamp is interpreted as UTC in the fixed `YYYY-MM-DD HH:MM:SS`
/// layout; anything else is a [`TimeError`].
pub fn extraction_window(timestamp: &str, half_width_seconds: i64) -> Result<TimeWindow, TimeError> {
    let center = parse_utc(timestamp)?;
    let half = Duration::seconds(half_width_seconds);
    Ok(TimeWindow {
        start_ms: (center - half).timestamp_millis(),
        end_ms: (center + half).timestamp_millis(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_symmetric_in_millis() {
        let window = extraction_window("2020-01-01 12:00:00", 300).expect("window");
        // 2020-01-01 11:55:00 UTC and 2020-01-01 12:05:00 UTC.
        assert_eq!(window.start_ms, 1_577_879_700_000);
        assert_eq!(window.end_ms, 1_577_880_300_000);
    }

    #[test]
    fn window_rejects_malformed_timestamp() {
        assert!(extraction_window("2020/01/01 12:00:00", 300).is_err());
    }
}
