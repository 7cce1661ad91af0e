//! In-memory stand-ins for the external services.

use crate::client::{Notifier, ObjectStorage};
use crate::clock::Clock;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Objects kept in a map keyed by `(bucket, key)`.
#[derive(Default)]
pub struct MemoryStorage {
    pub objects: Mutex<BTreeMap<(String, String), Vec<u8>>>,
    pub content_types: Mutex<BTreeMap<(String, String), String>>,
    pub fail_puts: bool,
}

impl MemoryStorage {
    pub fn with_object(bucket: &str, key: &str, body: &str) -> Self {
        let storage = MemoryStorage::default();
        storage.insert(bucket, key, body.as_bytes().to_vec());
        storage
    }

    pub fn insert(&self, bucket: &str, key: &str, body: Vec<u8>) {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), body);
    }

    /// Keys currently stored in the given bucket.
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect()
    }

    pub fn content_type(&self, bucket: &str, key: &str) -> Option<String> {
        self.content_types
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn text(&self, bucket: &str, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .map(|body| String::from_utf8_lossy(body).into_owned())
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| anyhow!("NoSuchKey: {}/{}", bucket, key))
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        if self.fail_puts {
            return Err(anyhow!("AccessDenied: {}/{}", bucket, key));
        }
        self.insert(bucket, key, body);
        self.content_types
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), content_type.to_string());
        Ok(())
    }
}

/// A published notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub topic: String,
    pub subject: String,
    pub message: String,
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub published: Mutex<Vec<Published>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        RecordingNotifier {
            fail: true,
            ..Default::default()
        }
    }

    pub fn messages(&self) -> Vec<Published> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn publish(&self, topic: &str, subject: &str, message: &str) -> Result<()> {
        if self.fail {
            return Err(anyhow!("NotFound: topic {} does not exist", topic));
        }
        self.published.lock().unwrap().push(Published {
            topic: topic.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }
}

/// A clock that starts at a fixed instant and moves one second
/// forward on every reading.
pub struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        SteppingClock {
            next: Mutex::new(start),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().unwrap();
        let now = *next;
        *next = now + Duration::seconds(1);
        now
    }
}
