//! Event publisher trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by event publishing.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The broker session could not be established.
    #[error("event bus connection failed: {0}")]
    Connection(String),

    /// The broker rejected or never acknowledged the send.
    #[error("publish to {topic} failed: {reason}")]
    Delivery { topic: String, reason: String },
}

/// At-least-once publisher of domain events to a topic-addressed bus.
///
/// A send failure surfaces synchronously with no internal retry; retry
/// policy belongs to the caller. The key only affects partitioning
/// within the broker — correlation travels in the payload.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes one message.
    async fn publish(
        &self,
        topic: &str,
        key: &str,
        payload: &[u8],
        headers: &[(&str, &str)],
    ) -> Result<(), PublishError>;
}

/// A message recorded by [`InMemoryEventPublisher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub topic: String,
    pub key: String,
    pub payload: Vec<u8>,
    pub headers: Vec<(String, String)>,
}

#[derive(Debug, Default)]
struct InMemoryPublisherState {
    published: Vec<PublishedMessage>,
    fail: bool,
}

/// In-memory event publisher for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventPublisher {
    state: Arc<RwLock<InMemoryPublisherState>>,
}

impl InMemoryEventPublisher {
    /// Creates a new in-memory publisher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the publisher to fail on the next publish.
    pub fn set_fail(&self, fail: bool) {
        self.state.write().unwrap().fail = fail;
    }

    /// Returns all messages published so far.
    pub fn published(&self) -> Vec<PublishedMessage> {
        self.state.read().unwrap().published.clone()
    }

    /// Returns the number of messages published so far.
    pub fn published_count(&self) -> usize {
        self.state.read().unwrap().published.len()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(
        &self,
        topic: &str,
        key: &str,
        payload: &[u8],
        headers: &[(&str, &str)],
    ) -> Result<(), PublishError> {
        let mut state = self.state.write().unwrap();

        if state.fail {
            return Err(PublishError::Delivery {
                topic: topic.to_string(),
                reason: "broker unreachable".to_string(),
            });
        }

        state.published.push(PublishedMessage {
            topic: topic.to_string(),
            key: key.to_string(),
            payload: payload.to_vec(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_records_message() {
        let publisher = InMemoryEventPublisher::new();

        publisher
            .publish("topic-a", "key-1", b"payload", &[("eventType", "Test")])
            .await
            .unwrap();

        let published = publisher.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].topic, "topic-a");
        assert_eq!(published[0].key, "key-1");
        assert_eq!(published[0].payload, b"payload");
        assert_eq!(
            published[0].headers,
            vec![("eventType".to_string(), "Test".to_string())]
        );
    }

    #[tokio::test]
    async fn test_fail_flag_surfaces_delivery_error() {
        let publisher = InMemoryEventPublisher::new();
        publisher.set_fail(true);

        let result = publisher.publish("topic-a", "key-1", b"payload", &[]).await;
        assert!(matches!(result, Err(PublishError::Delivery { .. })));
        assert_eq!(publisher.published_count(), 0);
    }
}
