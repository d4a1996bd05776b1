//! Message bus for request/reply delivery.
//!
//! This module contains:
//! - `MessageBus` trait: correlated request/reply plus subscriptions
//! - `IncomingRequest`: one delivered request and its way back to the caller
//! - Bus configuration factory
//! - Implementations: in-process channel, NATS
//!
//! Correlation is the transport's job: a reply sent through
//! [`IncomingRequest::respond`] reaches exactly the caller whose
//! [`MessageBus::request`] produced it. Payloads carry no correlation ID.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use tracing::info;

use crate::config::{MessagingConfig, MessagingType};

// Implementation modules
pub mod channel;
#[cfg(feature = "nats")]
pub mod nats;

// Re-exports
pub use channel::ChannelBus;
#[cfg(feature = "nats")]
pub use nats::NatsBus;

// ============================================================================
// Traits
// ============================================================================

/// Result type for bus operations.
pub type Result<T> = std::result::Result<T, BusError>;

/// Errors that can occur during bus operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BusError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Subscribe failed: {0}")]
    Subscribe(String),

    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request timed out")]
    Timeout,

    #[error("No responders for subject")]
    NoResponders,

    #[error("Bus closed")]
    Closed,
}

/// Sends a reply back to the requester of one message.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Deliver the reply payload.
    ///
    /// A requester that has already given up is not an error; the reply is
    /// simply dropped. Errors mean the bus itself could not send.
    async fn respond(&self, payload: Bytes) -> Result<()>;
}

/// A request delivered to a subscriber.
pub struct IncomingRequest {
    /// Subject the request arrived on.
    pub subject: String,
    /// Encoded request body.
    pub payload: Bytes,
    responder: Box<dyn Responder>,
}

impl IncomingRequest {
    pub fn new(subject: impl Into<String>, payload: Bytes, responder: Box<dyn Responder>) -> Self {
        Self {
            subject: subject.into(),
            payload,
            responder,
        }
    }

    /// Reply to whoever issued this request.
    pub async fn respond(self, payload: Bytes) -> Result<()> {
        self.responder.respond(payload).await
    }
}

impl fmt::Debug for IncomingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncomingRequest")
            .field("subject", &self.subject)
            .field("payload_len", &self.payload.len())
            .finish_non_exhaustive()
    }
}

/// Stream of requests delivered to one subscriber.
///
/// The stream ends when the subscription or its connection goes away.
pub type Subscription = BoxStream<'static, IncomingRequest>;

/// Interface for request/reply messaging.
///
/// Implementations:
/// - `ChannelBus`: In-process channels (standalone mode, tests)
/// - `NatsBus`: NATS core request/reply
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Send a request and wait for its correlated reply.
    ///
    /// Implementations may apply their own request timeout; callers apply
    /// their deadline on top.
    async fn request(&self, subject: &str, payload: Bytes) -> Result<Bytes>;

    /// Subscribe to requests on a subject.
    async fn subscribe(&self, subject: &str) -> Result<Subscription>;
}

// ============================================================================
// Factory
// ============================================================================

/// Initialize the message bus based on configuration.
///
/// Requires the corresponding feature to be enabled:
/// - Channel: always available
/// - NATS: `--features nats`
pub async fn init_message_bus(
    config: &MessagingConfig,
) -> std::result::Result<Arc<dyn MessageBus>, Box<dyn std::error::Error + Send + Sync>> {
    match config.messaging_type {
        MessagingType::Channel => {
            info!(messaging_type = "channel", "Message bus initialized");
            Ok(Arc::new(ChannelBus::new()))
        }
        MessagingType::Nats => {
            #[cfg(feature = "nats")]
            {
                let bus = NatsBus::connect(&config.nats.url, config.request_timeout()).await?;
                info!(messaging_type = "nats", url = %config.nats.url, "Message bus initialized");
                Ok(Arc::new(bus))
            }

            #[cfg(not(feature = "nats"))]
            {
                Err("NATS support requires the 'nats' feature. Rebuild with --features nats".into())
            }
        }
    }
}
