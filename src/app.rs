//! Defines the handler: the application state shared across
//! invocations and the single pass from a trigger event to an
//! exported CSV file.

use crate::client::{Notifier, ObjectStorage};
use crate::clock::Clock;
use crate::conf::{Settings, DESTINATION_PREFIX, NOTIFICATION_SUBJECT};
use crate::error::HandlerError;
use crate::export;
use crate::records;
use crate::trigger::Locator;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// The result of a completed pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing in the file was delivered, so nothing was written.
    NoDeliveredItems,

    /// `count` delivered records were written to `key`.
    Exported { count: usize, key: String },
}

/// What the function returns to its invoker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    /// Informational result when nothing was exported.
    Skipped {
        message: String,
    },

    /// Status code and JSON-encoded text body.
    Reply {
        #[serde(rename = "statusCode")]
        status_code: u16,
        body: String,
    },
}

impl Response {
    fn reply(status_code: u16, text: String) -> Self {
        Response::Reply {
            status_code,
            // the body is the JSON encoding of the text
            body: Value::String(text).to_string(),
        }
    }

    pub fn no_delivered_items() -> Self {
        Response::Skipped {
            message: String::from("No delivered items found."),
        }
    }

    pub fn processed(count: usize) -> Self {
        Self::reply(200, format!("Processed {} delivered items.", count))
    }

    pub fn failed(error: &HandlerError) -> Self {
        Self::reply(500, format!("Error processing S3 file: {}", error))
    }
}

impl From<Outcome> for Response {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::NoDeliveredItems => Response::no_delivered_items(),
            Outcome::Exported { count, .. } => Response::processed(count),
        }
    }
}

/// An App holds the settings and the service handles, built once per
/// process and reused by every invocation.
pub struct App {
    pub settings: Settings,
    storage: Arc<dyn ObjectStorage>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl App {
    pub fn new(
        settings: Settings,
        storage: Arc<dyn ObjectStorage>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        App {
            settings,
            storage,
            notifier,
            clock,
        }
    }

    /// Handle an invocation. Every failure is logged and turned into
    /// a failure response.
    pub async fn handle(&self, event: Value) -> Response {
        match self.process(event).await {
            Ok(outcome) => outcome.into(),
            Err(e) => {
                error!("Error: {}", e);
                Response::failed(&e)
            }
        }
    }

    /// Read the triggering object, filter it, and export the
    /// delivered records. Nothing is retried; a notification failure
    /// leaves the export in place.
    #[instrument(skip(self, event))]
    pub async fn process(&self, event: Value) -> Result<Outcome, HandlerError> {
        let Locator { bucket, key } = Locator::from_event(event)?;
        info!("Processing s3://{}/{}", bucket, key);

        let content = self
            .storage
            .get(&bucket, &key)
            .await
            .map_err(|e| HandlerError::SourceRead {
                bucket: bucket.clone(),
                key: key.clone(),
                reason: format!("{:#}", e),
            })?;
        let text = String::from_utf8(content).map_err(|e| HandlerError::SourceRead {
            bucket: bucket.clone(),
            key: key.clone(),
            reason: e.to_string(),
        })?;

        let delivered = records::delivered(records::parse_lines(&text)?);
        if delivered.is_empty() {
            info!("No delivered items in s3://{}/{}", bucket, key);
            return Ok(Outcome::NoDeliveredItems);
        }

        let csv = export::to_csv(&delivered)?;
        let file_name = export::file_name(&self.clock.now());
        let target_key = export::destination_key(&file_name);
        let target_bucket = &self.settings.target_bucket;
        self.storage
            .put(target_bucket, &target_key, csv, "text/csv")
            .await
            .map_err(|e| HandlerError::DestinationWrite {
                bucket: target_bucket.clone(),
                key: target_key.clone(),
                reason: format!("{:#}", e),
            })?;

        let message = format!(
            "CSV file {} with delivered items uploaded to {}/{}",
            file_name, target_bucket, DESTINATION_PREFIX
        );
        self.notifier
            .publish(&self.settings.sns_topic_arn, NOTIFICATION_SUBJECT, &message)
            .await
            .map_err(|e| HandlerError::Notify {
                topic: self.settings.sns_topic_arn.clone(),
                reason: format!("{:#}", e),
            })?;

        info!(
            "Exported {} delivered items to s3://{}/{}",
            delivered.len(),
            target_bucket,
            target_key
        );
        Ok(Outcome::Exported {
            count: delivered.len(),
            key: target_key,
        })
    }
}
