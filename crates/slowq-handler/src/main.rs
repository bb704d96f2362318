//! Lambda entry point for the slow-query notification utility.
//!
//! Triggered by a CloudWatch Logs subscription filter; posts the parsed
//! slow-query records to Slack.

mod handler;
mod log_store;

use aws_config::{BehaviorVersion, Region};
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use slowq_core::Config;
use slowq_slack::SlackApiClient;

use crate::log_store::CloudWatchLogStore;

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

async fn function_handler(event: LambdaEvent<Value>) -> Result<(), lambda_runtime::Error> {
    let config = Config::from_env()?;

    let envelope_data = event
        .payload
        .get("awslogs")
        .and_then(|awslogs| awslogs.get("data"))
        .and_then(|data| data.as_str())
        .ok_or_else(|| lambda_runtime::Error::from("event payload has no awslogs.data"))?;

    let aws_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.cloudwatch_region.clone()))
        .load()
        .await;
    let store = CloudWatchLogStore::new(aws_sdk_cloudwatchlogs::Client::new(&aws_config));
    let slack = SlackApiClient::new(
        &config.slack_api_base,
        &config.slack_api_token,
        &config.slack_channel_id,
    )?;

    handler::handle_event(&config, &store, &slack, envelope_data)
        .await
        .map_err(Into::into)
}

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    init_tracing();
    lambda_runtime::run(service_fn(function_handler)).await
}
