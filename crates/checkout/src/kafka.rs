//! Kafka-backed event publisher.
//!
//! The producer is a process-scoped session: created once at startup,
//! shared by every publish call, and flushed on shutdown. It is exposed
//! to the rest of the system only through the [`EventPublisher`] trait.

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::message::{Header, OwnedHeaders};
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;

use crate::publisher::{EventPublisher, PublishError};

/// Event publisher backed by a Kafka-compatible broker.
pub struct KafkaEventPublisher {
    producer: FutureProducer,
    timeout: Duration,
}

impl KafkaEventPublisher {
    /// Creates a publisher with default settings for the given brokers.
    pub fn new(brokers: impl Into<String>) -> Result<Self, PublishError> {
        Self::builder().brokers(brokers).build()
    }

    /// Returns a builder for custom configuration.
    pub fn builder() -> KafkaEventPublisherBuilder {
        KafkaEventPublisherBuilder::default()
    }

    /// Waits for in-flight messages to be delivered, up to `timeout`.
    ///
    /// Called once on process shutdown.
    pub fn flush(&self, timeout: Duration) -> Result<(), PublishError> {
        self.producer
            .flush(Timeout::After(timeout))
            .map_err(|e| PublishError::Connection(e.to_string()))
    }
}

/// Builder for [`KafkaEventPublisher`].
#[derive(Debug, Default)]
pub struct KafkaEventPublisherBuilder {
    brokers: Option<String>,
    client_id: Option<String>,
    acks: Option<String>,
    timeout: Option<Duration>,
}

impl KafkaEventPublisherBuilder {
    /// Sets the comma-separated broker addresses (required).
    pub fn brokers(mut self, brokers: impl Into<String>) -> Self {
        self.brokers = Some(brokers.into());
        self
    }

    /// Sets the Kafka client ID.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets the producer acknowledgment mode ("0", "1", or "all").
    pub fn acks(mut self, acks: impl Into<String>) -> Self {
        self.acks = Some(acks.into());
        self
    }

    /// Sets the per-send timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Creates the producer session.
    pub fn build(self) -> Result<KafkaEventPublisher, PublishError> {
        let brokers = self
            .brokers
            .ok_or_else(|| PublishError::Connection("brokers not configured".to_string()))?;

        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", &brokers)
            .set("client.id", self.client_id.as_deref().unwrap_or("cart-gateway"))
            .set("message.timeout.ms", "5000")
            .set("acks", self.acks.as_deref().unwrap_or("all"));

        let producer: FutureProducer = config
            .create()
            .map_err(|e| PublishError::Connection(e.to_string()))?;

        tracing::info!(
            brokers = %brokers,
            acks = self.acks.as_deref().unwrap_or("all"),
            "Kafka producer created"
        );

        Ok(KafkaEventPublisher {
            producer,
            timeout: self.timeout.unwrap_or(Duration::from_secs(5)),
        })
    }
}

#[async_trait]
impl EventPublisher for KafkaEventPublisher {
    async fn publish(
        &self,
        topic: &str,
        key: &str,
        payload: &[u8],
        headers: &[(&str, &str)],
    ) -> Result<(), PublishError> {
        let mut kafka_headers = OwnedHeaders::new();
        for &(name, value) in headers {
            kafka_headers = kafka_headers.insert(Header {
                key: name,
                value: Some(value),
            });
        }

        let record = FutureRecord::to(topic)
            .key(key)
            .payload(payload)
            .headers(kafka_headers);

        match self.producer.send(record, Timeout::After(self.timeout)).await {
            Ok((partition, offset)) => {
                tracing::debug!(topic, partition, offset, "event published");
                Ok(())
            }
            Err((kafka_error, _)) => {
                tracing::error!(topic, error = %kafka_error, "failed to publish event");
                Err(PublishError::Delivery {
                    topic: topic.to_string(),
                    reason: kafka_error.to_string(),
                })
            }
        }
    }
}
