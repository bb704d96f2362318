//! Shared configuration and time primitives for the slow-query notifier.
//!
//! Provides the environment-sourced runtime configuration plus the timestamp
//! helpers used by envelope inspection, window calculation, and notification
//! rendering.

pub mod config;
pub mod local_time;
pub mod time_window;
pub mod timestamp;

pub use config::{Config, ConfigError, DEFAULT_SLACK_API_BASE};
pub use local_time::localize;
pub use time_window::{extraction_window, TimeWindow};
pub use timestamp::{first_timestamp, TimeError, TIMESTAMP_FORMAT};
