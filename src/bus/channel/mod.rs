//! In-memory channel-based message bus for standalone mode.
//!
//! Each subject has at most one subscriber, fed through a tokio mpsc channel.
//! Every request carries its own oneshot sender, which is how the reply
//! finds its way back without a correlation ID.
//! Ideal for local development and testing without external dependencies.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::{mpsc, oneshot, Mutex, RwLock};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};

use super::{BusError, IncomingRequest, MessageBus, Responder, Result, Subscription};

/// Channel capacity per subject.
const CHANNEL_CAPACITY: usize = 1024;

/// In-memory request/reply bus.
///
/// Clones share the same subject table, so a clone handed to the gateway
/// reaches subscribers registered through another clone.
#[derive(Clone, Default)]
pub struct ChannelBus {
    subjects: Arc<RwLock<HashMap<String, mpsc::Sender<IncomingRequest>>>>,
}

impl ChannelBus {
    /// Create a new channel bus.
    pub fn new() -> Self {
        Self::default()
    }

    async fn sender_for(&self, subject: &str) -> Option<mpsc::Sender<IncomingRequest>> {
        self.subjects.read().await.get(subject).cloned()
    }
}

/// Replies through the requester's oneshot.
struct ChannelResponder {
    reply: Mutex<Option<oneshot::Sender<Bytes>>>,
}

#[async_trait]
impl Responder for ChannelResponder {
    async fn respond(&self, payload: Bytes) -> Result<()> {
        let Some(reply) = self.reply.lock().await.take() else {
            return Err(BusError::Publish("request already answered".to_string()));
        };

        if reply.send(payload).is_err() {
            // Requester gave up; same as publishing to an inbox nobody reads.
            debug!("Requester gone, reply dropped");
        }

        Ok(())
    }
}

#[async_trait]
impl MessageBus for ChannelBus {
    #[tracing::instrument(name = "bus.request", skip_all, fields(subject = %subject))]
    async fn request(&self, subject: &str, payload: Bytes) -> Result<Bytes> {
        let sender = self.sender_for(subject).await.ok_or(BusError::NoResponders)?;

        let (reply_tx, reply_rx) = oneshot::channel();
        let responder = ChannelResponder {
            reply: Mutex::new(Some(reply_tx)),
        };
        let request = IncomingRequest::new(subject, payload, Box::new(responder));

        if sender.send(request).await.is_err() {
            // Subscription dropped; forget it so later requests fail fast.
            let mut subjects = self.subjects.write().await;
            if subjects.get(subject).is_some_and(|s| s.is_closed()) {
                subjects.remove(subject);
            }
            return Err(BusError::NoResponders);
        }

        reply_rx
            .await
            .map_err(|_| BusError::Request("request dropped without a reply".to_string()))
    }

    async fn subscribe(&self, subject: &str) -> Result<Subscription> {
        let mut subjects = self.subjects.write().await;

        if let Some(existing) = subjects.get(subject) {
            if !existing.is_closed() {
                return Err(BusError::Subscribe(format!(
                    "subject '{}' already has a subscriber",
                    subject
                )));
            }
        }

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        subjects.insert(subject.to_string(), tx);

        info!(subject = %subject, "Subscribed to channel bus");

        Ok(Box::pin(ReceiverStream::new(rx)))
    }
}
