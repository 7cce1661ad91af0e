//! Defines the external services the handler talks to, and their AWS
//! implementations.

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::primitives::ByteStream;
use tracing::{debug, info};

/// Object storage, read and write.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Fetch the full contents of an object.
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    /// Store bytes as an object, replacing any previous one.
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>, content_type: &str)
        -> Result<()>;
}

/// Fire-and-forget notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, topic: &str, subject: &str, message: &str) -> Result<()>;
}

/// S3-backed object storage.
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: aws_sdk_s3::Client,
}

impl S3Storage {
    pub fn new(config: &SdkConfig) -> Self {
        S3Storage {
            client: aws_sdk_s3::Client::new(config),
        }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        debug!("Downloading s3://{}/{}", bucket, key);
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .with_context(|| {
                format!(
                    "Failed to download object {:?} from bucket {:?}",
                    key, bucket
                )
            })?;
        let data = response
            .body
            .collect()
            .await
            .with_context(|| {
                format!(
                    "Failed to read the contents of object {:?} from bucket {:?}",
                    key, bucket
                )
            })?
            .into_bytes();
        Ok(data.to_vec())
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .with_context(|| {
                format!(
                    "Failed to upload remote object {:?} in bucket {:?}",
                    key, bucket
                )
            })?;
        info!("Uploaded {} bytes to s3://{}/{}", size, bucket, key);
        Ok(())
    }
}

/// SNS-backed notifier.
#[derive(Debug, Clone)]
pub struct SnsNotifier {
    client: aws_sdk_sns::Client,
}

impl SnsNotifier {
    pub fn new(config: &SdkConfig) -> Self {
        SnsNotifier {
            client: aws_sdk_sns::Client::new(config),
        }
    }
}

#[async_trait]
impl Notifier for SnsNotifier {
    async fn publish(&self, topic: &str, subject: &str, message: &str) -> Result<()> {
        let response = self
            .client
            .publish()
            .topic_arn(topic)
            .subject(subject)
            .message(message)
            .send()
            .await
            .with_context(|| format!("Failed to publish notification to topic {:?}", topic))?;
        debug!("Published message {:?}", response.message_id());
        Ok(())
    }
}
