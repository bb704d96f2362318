//! End-to-end orchestration for one subscription event.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use slowq_core::{extraction_window, first_timestamp, Config};
use slowq_parse::{
    decode_envelope, is_parameter_record, is_query_record, parse_query_log,
    substitute_parameters,
};
use slowq_slack::{detail_message, logs_url, summary_message, SlackApiClient};

use crate::log_store::{fetch_with_retry, LogStore, RetryPolicy, StoredLogEvent};

/// Runs the whole pipeline for one envelope: decode, window, fetch with
/// retry, parse and substitute, then post one summary plus one threaded
/// detail per parsed query. Strictly sequential; the first fatal error
/// aborts the invocation.
pub async fn handle_event<S: LogStore + ?Sized>(
    config: &Config,
    store: &S,
    slack: &SlackApiClient,
    envelope_data: &str,
) -> Result<()> {
    let envelope = decode_envelope(envelope_data)?;
    let executed_at = first_timestamp(&envelope.log_events[0].message)
        .context("first log event carries no timestamp")?
        .to_string();
    let window = extraction_window(&executed_at, config.window_half_width_seconds)?;

    let policy = RetryPolicy {
        max_attempts: config.max_retry_attempts,
        delay: Duration::from_secs(config.retry_delay_seconds),
    };
    let fetched = fetch_with_retry(
        store,
        &envelope.log_group,
        &envelope.log_stream,
        &window,
        &policy,
    )
    .await?;
    let Some(events) = fetched else {
        // Give-up is a normal end: no notification is sent.
        return Ok(());
    };

    let parameter_records: Vec<&StoredLogEvent> = events
        .iter()
        .filter(|event| is_parameter_record(&event.message))
        .collect();

    let mut parsed = Vec::new();
    for event in events.iter().filter(|event| is_query_record(&event.message)) {
        let (mut record, identify_info) = parse_query_log(&event.message, config.timezone)?;
        if let Some(parameter_record) = parameter_records
            .iter()
            .find(|candidate| candidate.message.contains(&identify_info))
        {
            record.query_text =
                substitute_parameters(&parameter_record.message, &record.query_text)?;
        }
        parsed.push(record);
    }
    info!(count = parsed.len(), "parsed slow query records");

    let url = logs_url(
        &config.cloudwatch_region,
        &envelope.log_group,
        &envelope.log_stream,
        &executed_at,
    );
    for record in &parsed {
        let summary = slack
            .post_message(&summary_message(record, config.duration_threshold_seconds))
            .await?;
        slack
            .post_message(&detail_message(
                record,
                config.duration_threshold_seconds,
                &url,
                &summary.ts,
            ))
            .await?;
    }

    Ok(())
}
