//! Rendering of the summary and threaded detail notifications.

use slowq_parse::{ParsedQuery, QueryType};

use crate::api_client::{MessageAttachment, MessageField, OutgoingMessage};

pub const NOTIFIER_USERNAME: &str = "Slow Query Notification";

pub fn icon_for_query_type(query_type: QueryType) -> &'static str {
    match query_type {
        QueryType::Select => ":mag:",
        QueryType::Insert => ":inbox_tray:",
        QueryType::Update => ":recycle:",
        QueryType::Delete => ":wave:",
        QueryType::Unknown => ":bento:",
    }
}

/// Queries slower than the threshold are "danger", everything else
/// "warning". At-threshold stays "warning".
pub fn color_for_duration(duration_seconds: f64, threshold_seconds: f64) -> &'static str {
    if duration_seconds > threshold_seconds {
        "danger"
    } else {
        "warning"
    }
}

fn duration_with_cost(record: &ParsedQuery) -> String {
    format!(
        "{:.2} s  (cost: {})",
        record.duration_seconds, record.explain_cost
    )
}

fn attachment(record: &ParsedQuery, threshold_seconds: f64, fields: Vec<MessageField>) -> MessageAttachment {
    MessageAttachment {
        color: color_for_duration(record.duration_seconds, threshold_seconds).to_string(),
        mrkdwn_in: vec!["text".to_string(), "pretext".to_string()],
        fields,
    }
}

/// The one-line summary message posted to the channel.
pub fn summary_message(record: &ParsedQuery, threshold_seconds: f64) -> OutgoingMessage {
    let fields = vec![MessageField::bare(format!(
        "{}: {}",
        record.query_type.as_str(),
        duration_with_cost(record)
    ))];
    OutgoingMessage {
        username: NOTIFIER_USERNAME.to_string(),
        icon_emoji: icon_for_query_type(record.query_type).to_string(),
        attachment: attachment(record, threshold_seconds, fields),
        thread_ts: None,
    }
}

/// The detail message threaded under the summary: seven fields covering the
/// parsed record plus the console deep link.
pub fn detail_message(
    record: &ParsedQuery,
    threshold_seconds: f64,
    logs_url: &str,
    thread_ts: &str,
) -> OutgoingMessage {
    let fields = vec![
        MessageField::titled("Query Type", record.query_type.as_str(), true),
        MessageField::titled("Actual Duration", duration_with_cost(record), true),
        MessageField::titled("Executed At", record.executed_at.clone(), true),
        MessageField::titled("IP", record.client_ip.clone(), true),
        MessageField::titled("Query Text", record.query_text.clone(), false),
        MessageField::titled("Explain", record.explain_text.clone(), false),
        MessageField::bare(format!("<{logs_url} | go to Cloud Watch Logs>")),
    ];
    OutgoingMessage {
        username: NOTIFIER_USERNAME.to_string(),
        icon_emoji: icon_for_query_type(record.query_type).to_string(),
        attachment: attachment(record, threshold_seconds, fields),
        thread_ts: Some(thread_ts.to_string()),
    }
}
