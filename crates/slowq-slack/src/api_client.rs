//! Slack Web API client used to post the summary and threaded detail
//! messages.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

const REQUEST_TIMEOUT_MS: u64 = 10_000;

/// One attachment field. `title`/`short` are omitted from the wire format
/// when unset.
#[derive(Debug, Clone, Serialize)]
pub struct MessageField {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<bool>,
}

impl MessageField {
    pub fn bare(value: impl Into<String>) -> Self {
        Self {
            title: None,
            value: value.into(),
            short: None,
        }
    }

    pub fn titled(title: &str, value: impl Into<String>, short: bool) -> Self {
        Self {
            title: Some(title.to_string()),
            value: value.into(),
            short: Some(short),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageAttachment {
    pub color: String,
    pub mrkdwn_in: Vec<String>,
    pub fields: Vec<MessageField>,
}

/// A rendered notification, ready to post. `thread_ts` turns it into a
/// threaded reply.
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    pub username: String,
    pub icon_emoji: String,
    pub attachment: MessageAttachment,
    pub thread_ts: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct SlackChatMessageResponse {
    ok: bool,
    ts: Option<String>,
    error: Option<String>,
}

/// Identifier of a posted message, used to thread the detail reply.
#[derive(Debug, Clone)]
pub struct PostedMessage {
    pub ts: String,
}

#[derive(Clone)]
pub struct SlackApiClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
    channel: String,
}

impl SlackApiClient {
    pub fn new(api_base: &str, token: &str, channel: &str) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(REQUEST_TIMEOUT_MS))
            .build()
            .context("failed to create slack api client")?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.trim().to_string(),
            channel: channel.to_string(),
        })
    }

    /// Posts one message via `chat.postMessage` and returns its `ts`.
    pub async fn post_message(&self, message: &OutgoingMessage) -> Result<PostedMessage> {
        let mut payload = json!({
            "channel": self.channel,
            "username": message.username,
            "icon_emoji": message.icon_emoji,
            "attachments": [&message.attachment],
        });
        if let Some(thread_ts) = &message.thread_ts {
            payload["thread_ts"] = Value::String(thread_ts.clone());
        }

        let response = self
            .http
            .post(format!("{}/chat.postMessage", self.api_base))
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .context("slack chat.postMessage request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!(
                "slack chat.postMessage failed with status {}",
                status.as_u16()
            );
        }
        let parsed: SlackChatMessageResponse = response
            .json()
            .await
            .context("failed to decode slack chat.postMessage response")?;
        if !parsed.ok {
            bail!(
                "slack chat.postMessage failed: {}",
                parsed.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }

        let posted = parsed
            .ts
            .map(|ts| PostedMessage { ts })
            .ok_or_else(|| anyhow!("slack chat.postMessage response missing ts"))?;
        debug!(ts = %posted.ts, threaded = message.thread_ts.is_some(), "posted slack message");
        Ok(posted)
    }
}
