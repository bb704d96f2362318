//! Environment-sourced runtime configuration validated once at startup.

use std::env;
use std::str::FromStr;

use chrono_tz::Tz;
use thiserror::Error;

/// Slack Web API base; overridable so tests can point at a mock server.
pub const DEFAULT_SLACK_API_BASE: &str = "https://slack.com/api";

const REQUIRED_VARIABLES: [&str; 8] = [
    "TZ",
    "CLOUDWATCH_REGION",
    "SLACK_API_TOKEN",
    "SLACK_CHANNEL_ID",
    "POSTPONEMENT_BEFORE_LOG_EXTRACTION",
    "MAX_RETRY_COUNT_GET_LOG",
    "PERIOD_LOG_EXTRACTION",
    "NOTIFICATION_COLOR_STANDARD",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingVariables(Vec<String>),
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Runtime configuration, constructed once and passed by reference.
#[derive(Debug, Clone)]
pub struct Config {
    /// Display zone for executed-at timestamps.
    pub timezone: Tz,
    /// Region hosting the log group, also used for console links.
    pub cloudwatch_region: String,
    pub slack_api_token: String,
    pub slack_channel_id: String,
    pub slack_api_base: String,
    /// Fixed delay between log-fetch attempts, seconds.
    pub retry_delay_seconds: u64,
    /// Total fetch attempts before giving up quietly.
    pub max_retry_attempts: u32,
    /// Half-width of the log extraction window, seconds.
    pub window_half_width_seconds: i64,
    /// Queries slower than this many seconds are colored "danger".
    pub duration_threshold_seconds: f64,
}

impl Config {
    /// Reads and validates every required variable. All missing names are
    /// collected into a single error so operators see the full list at once.
    pub fn from_env() -> Result<Self, ConfigError> {
        let missing: Vec<String> = REQUIRED_VARIABLES
            .iter()
            .filter(|name| {
                env::var(name)
                    .map(|value| value.trim().is_empty())
                    .unwrap_or(true)
            })
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingVariables(missing));
        }

        Ok(Self {
            timezone: parsed("TZ")?,
            cloudwatch_region: raw("CLOUDWATCH_REGION"),
            slack_api_token: raw("SLACK_API_TOKEN"),
            slack_channel_id: raw("SLACK_CHANNEL_ID"),
            slack_api_base: DEFAULT_SLACK_API_BASE.to_string(),
            retry_delay_seconds: parsed("POSTPONEMENT_BEFORE_LOG_EXTRACTION")?,
            max_retry_attempts: parsed("MAX_RETRY_COUNT_GET_LOG")?,
            window_half_width_seconds: parsed("PERIOD_LOG_EXTRACTION")?,
            duration_threshold_seconds: parsed("NOTIFICATION_COLOR_STANDARD")?,
        })
    }
}

fn raw(name: &'static str) -> String {
    env::var(name).unwrap_or_default()
}

fn parsed<T>(name: &'static str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw(name)
        .trim()
        .parse()
        .map_err(|error: T::Err| ConfigError::InvalidValue {
            name,
            reason: error.to_string(),
        })
}
