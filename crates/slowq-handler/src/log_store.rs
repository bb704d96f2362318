//! Log-store access behind a seam, plus the bounded fixed-delay retry loop.
//!
//! The database log often lands in CloudWatch a little after the
//! subscription event fires, so an empty range query is retried on a fixed
//! delay up to a configured attempt ceiling. Exhausting the budget is a
//! normal, quiet end of the invocation, not an error.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use slowq_core::TimeWindow;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("cloudwatch get-log-events failed: {0}")]
    CloudWatch(String),
}

/// One log line fetched from the store.
#[derive(Debug, Clone)]
pub struct StoredLogEvent {
    pub timestamp: i64,
    pub message: String,
}

/// Range-query seam over the external log store.
#[async_trait]
pub trait LogStore {
    async fn events(
        &self,
        log_group: &str,
        log_stream: &str,
        window: &TimeWindow,
    ) -> Result<Vec<StoredLogEvent>, FetchError>;
}

pub struct CloudWatchLogStore {
    client: aws_sdk_cloudwatchlogs::Client,
}

impl CloudWatchLogStore {
    pub fn new(client: aws_sdk_cloudwatchlogs::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LogStore for CloudWatchLogStore {
    async fn events(
        &self,
        log_group: &str,
        log_stream: &str,
        window: &TimeWindow,
    ) -> Result<Vec<StoredLogEvent>, FetchError> {
        let response = self
            .client
            .get_log_events()
            .log_group_name(log_group)
            .log_stream_name(log_stream)
            .start_time(window.start_ms)
            .end_time(window.end_ms)
            .send()
            .await
            .map_err(|error| FetchError::CloudWatch(error.to_string()))?;

        Ok(response
            .events()
            .iter()
            .filter_map(|event| {
                event.message().map(|message| StoredLogEvent {
                    timestamp: event.timestamp().unwrap_or_default(),
                    message: message.to_string(),
                })
            })
            .collect())
    }
}

/// Fixed-delay retry budget for the fetch loop. No backoff curve.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

/// Polls the store until it returns data or the attempt budget runs out.
/// `Ok(None)` means the budget was consumed with no data.
pub async fn fetch_with_retry<S: LogStore + ?Sized>(
    store: &S,
    log_group: &str,
    log_stream: &str,
    window: &TimeWindow,
    policy: &RetryPolicy,
) -> Result<Option<Vec<StoredLogEvent>>, FetchError> {
    let mut attempt = 0_u32;
    loop {
        let events = store.events(log_group, log_stream, window).await?;
        if !events.is_empty() {
            info!(
                count = events.len(),
                first_timestamp_ms = events[0].timestamp,
                "log data returned"
            );
            return Ok(Some(events));
        }

        attempt += 1;
        if attempt >= policy.max_attempts {
            warn!(attempts = attempt, "no log data returned, giving up");
            return Ok(None);
        }
        info!(
            attempt,
            delay_seconds = policy.delay.as_secs(),
            "no log data yet, retrying"
        );
        tokio::time::sleep(policy.delay).await;
    }
}
