//! Slack notification layer: Web API client, message rendering, and the
//! CloudWatch console deep link embedded in the detail message.

pub mod api_client;
pub mod logs_url;
pub mod message;

pub use api_client::{
    MessageAttachment, MessageField, OutgoingMessage, PostedMessage, SlackApiClient,
};
pub use logs_url::logs_url;
pub use message::{
    color_for_duration, detail_message, icon_for_query_type, summary_message, NOTIFIER_USERNAME,
};
