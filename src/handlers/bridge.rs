//! Gateway-side bridge onto the bus.
//!
//! Encodes a lookup request, waits for the correlated reply no longer than
//! the configured request timeout or the caller's deadline, whichever comes
//! first, and maps the reply to a [`LookupOutcome`].

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::bus::{BusError, MessageBus};
use crate::codec::{self, Reply};
use crate::proto::NewsItem;
use crate::termination::{FatalError, Termination};

/// Caller-facing result of one lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(NewsItem),
    NotFound,
    /// The storage tier failed, or its reply was unreadable. The message
    /// is for logs only.
    ServerError(String),
    /// Timeout, no responder, or connection loss.
    TransportError(BusError),
}

/// Issues lookups over a [`MessageBus`].
pub struct Bridge {
    bus: Arc<dyn MessageBus>,
    subject: String,
    request_timeout: Duration,
    termination: Termination,
}

impl Bridge {
    pub fn new(
        bus: Arc<dyn MessageBus>,
        subject: impl Into<String>,
        request_timeout: Duration,
        termination: Termination,
    ) -> Self {
        Self {
            bus,
            subject: subject.into(),
            request_timeout,
            termination,
        }
    }

    /// Time left for a round trip started now.
    fn wait_budget(&self, deadline: Option<Instant>) -> Duration {
        match deadline {
            Some(deadline) => self
                .request_timeout
                .min(deadline.saturating_duration_since(Instant::now())),
            None => self.request_timeout,
        }
    }

    /// Look up one news item.
    #[tracing::instrument(name = "bridge.lookup", skip(self, deadline))]
    pub async fn lookup(&self, id: i64, deadline: Option<Instant>) -> LookupOutcome {
        let budget = self.wait_budget(deadline);
        let payload = codec::encode_request(id);

        let raw = match tokio::time::timeout(budget, self.bus.request(&self.subject, payload)).await
        {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                warn!(error = %e, "Lookup request failed");
                return LookupOutcome::TransportError(e);
            }
            Err(_) => {
                warn!(budget_ms = budget.as_millis() as u64, "Lookup request timed out");
                return LookupOutcome::TransportError(BusError::Timeout);
            }
        };

        match codec::decode_reply(&raw) {
            Ok(Reply::Found(item)) => {
                debug!("News item found");
                LookupOutcome::Found(item)
            }
            Ok(Reply::NotFound) => LookupOutcome::NotFound,
            Ok(Reply::Internal(message)) => LookupOutcome::ServerError(message),
            Err(e) => {
                let message = e.to_string();
                self.termination.terminate(FatalError::Decode(e));
                LookupOutcome::ServerError(message)
            }
        }
    }
}
