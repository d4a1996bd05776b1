//! NATS message bus implementation.
//!
//! Uses NATS core request/reply: `request` publishes with a private inbox as
//! reply subject and waits on it; subscribers answer by publishing to the
//! message's reply subject. Plain (non-queue) subscriptions, so one worker
//! per subject is the expected deployment.
//!
//! # Configuration
//!
//! ```yaml
//! messaging:
//!   type: nats
//!   subject: news_items
//!   request_timeout_ms: 1000
//!   nats:
//!     url: "nats://localhost:4222"
//! ```

use std::time::Duration;

use async_nats::{Client, RequestErrorKind, Subject};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use tracing::{debug, info};

use super::{BusError, IncomingRequest, MessageBus, Responder, Result, Subscription};

/// NATS-backed request/reply bus.
#[derive(Clone)]
pub struct NatsBus {
    client: Client,
}

impl NatsBus {
    /// Wrap an existing client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect to a NATS server.
    ///
    /// `request_timeout` bounds every round trip made through [`MessageBus::request`].
    pub async fn connect(url: &str, request_timeout: Duration) -> Result<Self> {
        let client = async_nats::ConnectOptions::new()
            .request_timeout(Some(request_timeout))
            .connect(url)
            .await
            .map_err(|e| BusError::Connection(e.to_string()))?;

        info!(url = %url, "Connected to NATS");

        Ok(Self::new(client))
    }

    /// Flush pending publishes, so replies already handed to the client go out.
    pub async fn flush(&self) -> Result<()> {
        self.client
            .flush()
            .await
            .map_err(|e| BusError::Publish(e.to_string()))
    }
}

/// Publishes the reply to the request's inbox.
struct NatsResponder {
    client: Client,
    reply: Option<Subject>,
}

#[async_trait]
impl Responder for NatsResponder {
    async fn respond(&self, payload: Bytes) -> Result<()> {
        let Some(reply) = self.reply.clone() else {
            return Err(BusError::Publish("message has no reply subject".to_string()));
        };

        self.client
            .publish(reply, payload)
            .await
            .map_err(|e| BusError::Publish(e.to_string()))
    }
}

#[async_trait]
impl MessageBus for NatsBus {
    #[tracing::instrument(name = "bus.request", skip_all, fields(subject = %subject))]
    async fn request(&self, subject: &str, payload: Bytes) -> Result<Bytes> {
        let message = self
            .client
            .request(subject.to_string(), payload)
            .await
            .map_err(|e| match e.kind() {
                RequestErrorKind::TimedOut => BusError::Timeout,
                RequestErrorKind::NoResponders => BusError::NoResponders,
                _ => BusError::Request(e.to_string()),
            })?;

        debug!(bytes = message.payload.len(), "Received reply");

        Ok(message.payload)
    }

    async fn subscribe(&self, subject: &str) -> Result<Subscription> {
        let subscriber = self
            .client
            .subscribe(subject.to_string())
            .await
            .map_err(|e| BusError::Subscribe(e.to_string()))?;

        info!(subject = %subject, "Subscribed to NATS subject");

        let client = self.client.clone();
        let requests = subscriber.map(move |message| {
            let responder = NatsResponder {
                client: client.clone(),
                reply: message.reply,
            };
            IncomingRequest::new(
                message.subject.to_string(),
                message.payload,
                Box::new(responder),
            )
        });

        Ok(Box::pin(requests))
    }
}
