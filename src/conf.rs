//! Defines configuration as read from the environment.

use anyhow::{Context, Result};
use aws_config::{from_env, SdkConfig};
use serde::Deserialize;
use std::env;

/// Key prefix under which exports are written in the target bucket.
pub const DESTINATION_PREFIX: &str = "processed_data/";

/// Subject attached to every completion notification.
pub const NOTIFICATION_SUBJECT: &str = "Delivery Data Processed";

/// Default `target_bucket` value.
fn default_target_bucket() -> String {
    String::from("doordash-target-zn-gds-assign3")
}

/// Default `sns_topic_arn` value.
fn default_sns_topic_arn() -> String {
    String::from("arn:aws:sns:ap-south-1:058264464054:s3-info")
}

/// The export is configured with two identifiers only, both given
/// as environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Defines the bucket receiving the CSV exports.
    #[serde(default = "default_target_bucket")]
    pub target_bucket: String,

    /// Defines the topic that gets notified after each export.
    #[serde(default = "default_sns_topic_arn")]
    pub sns_topic_arn: String,
}

impl Settings {
    /// Read settings from `TARGET_BUCKET` and `SNS_TOPIC_ARN`.
    pub fn from_env() -> Result<Self> {
        envy::from_env().context("Failed to read settings from the environment")
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            target_bucket: default_target_bucket(),
            sns_topic_arn: default_sns_topic_arn(),
        }
    }
}

/// Load the shared AWS configuration used by every service client.
/// `AWS_ENDPOINT_URL` redirects all services to a single endpoint,
/// which is how local emulators are reached.
pub async fn aws_service_config() -> SdkConfig {
    if let Ok(endpoint_url) = env::var("AWS_ENDPOINT_URL") {
        from_env()
            .endpoint_url(
                if endpoint_url.starts_with("http://") || endpoint_url.starts_with("https://") {
                    endpoint_url
                } else {
                    format!("https://{}", endpoint_url)
                },
            )
            .region("us-east-1") // should be OK since the endpoint was overridden
            .load()
            .await
    } else {
        from_env().load().await
    }
}
