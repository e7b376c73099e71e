//! Message bus abstraction
//!
//! Publishing goes through the `Bus` trait. Inbound traffic arrives as
//! `BusEvent`s on a single `mpsc` receiver, which the runtime drains one
//! event at a time.

mod mqtt;

pub use mqtt::MqttBus;

use crate::config::Topic;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Depth of the inbound event queue between transport and runtime
pub const EVENT_QUEUE_DEPTH: usize = 64;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("could not connect to broker at {host}:{port}: {reason}")]
    Connection {
        host: String,
        port: u16,
        reason: String,
    },
    #[error("failed to publish to {topic}: {reason}")]
    Publish { topic: String, reason: String },
    #[error("failed to subscribe to {topic}: {reason}")]
    Subscribe { topic: String, reason: String },
    #[error("bus event stream closed")]
    Closed,
}

/// Something that happened on the bus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEvent {
    /// (Re)connected to the broker; subscriptions must be (re)established
    Connected,
    MessageReceived { topic: String, payload: String },
}

impl BusEvent {
    #[allow(dead_code)] // Used in tests
    pub fn message(topic: &Topic, payload: impl Into<String>) -> Self {
        Self::MessageReceived {
            topic: topic.as_str().to_string(),
            payload: payload.into(),
        }
    }
}

/// Outbound side of the bus
#[async_trait]
pub trait Bus: Send + Sync {
    /// Subscribe to a topic. Subscribing twice is harmless.
    async fn subscribe(&self, topic: &Topic) -> Result<(), BusError>;

    /// Fire-and-forget publish of a UTF-8 payload
    async fn publish(&self, topic: &Topic, payload: &str) -> Result<(), BusError>;
}

#[async_trait]
impl<T: Bus + ?Sized> Bus for Arc<T> {
    async fn subscribe(&self, topic: &Topic) -> Result<(), BusError> {
        (**self).subscribe(topic).await
    }

    async fn publish(&self, topic: &Topic, payload: &str) -> Result<(), BusError> {
        (**self).publish(topic, payload).await
    }
}
