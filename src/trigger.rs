//! Defines a _trigger_, the location of the object that caused the
//! invocation. The trigger is extracted from the S3 event.

use crate::error::HandlerError;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

/// The S3 notification, reduced to the fields that are read.
#[derive(Debug, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records")]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Deserialize)]
pub struct S3EventRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct S3Object {
    pub key: String,
}

/// The bucket and key of the object to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub bucket: String,
    pub key: String,
}

impl Locator {
    /// Extracts the locator from the first record of a raw event.
    /// Any other record is ignored.
    #[instrument(skip(event))]
    pub fn from_event(event: Value) -> Result<Self, HandlerError> {
        let event: S3Event = serde_json::from_value(event)
            .map_err(|e| HandlerError::MalformedEvent(e.to_string()))?;
        let record = event
            .records
            .into_iter()
            .next()
            .ok_or_else(|| HandlerError::MalformedEvent(String::from("no records in event")))?;
        if record.s3.bucket.name.is_empty() {
            return Err(HandlerError::MalformedEvent(String::from(
                "empty bucket name",
            )));
        }
        if record.s3.object.key.is_empty() {
            return Err(HandlerError::MalformedEvent(String::from("empty object key")));
        }
        Ok(Locator {
            bucket: record.s3.bucket.name,
            key: record.s3.object.key,
        })
    }

    /// Builds a minimal event pointing at the given object.
    pub fn to_event(&self) -> Value {
        serde_json::json!({
            "Records": [{
                "s3": {
                    "bucket": { "name": self.bucket },
                    "object": { "key": self.key }
                }
            }]
        })
    }
}
