//! Storage-tier lookup handler.
//!
//! Bound to the lookup subject. Each delivered request walks
//! `Received -> Decoding -> Querying -> Encoding -> Replying -> Done`.
//! A malformed request or a reply that cannot be sent ends in
//! `EscalatedFailure` instead: the request is abandoned and the process
//! termination context is signalled. Neither is retried.

use std::sync::Arc;

use futures::StreamExt;
use tracing::{debug, error, info, warn};

use crate::bus::{BusError, IncomingRequest, Subscription};
use crate::codec::{self, Reply};
use crate::storage::{NewsStore, StoreError};
use crate::termination::{FatalError, Termination};

/// Final state of one handled request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerState {
    /// A reply was sent.
    Done,
    /// The request was abandoned and termination signalled.
    EscalatedFailure,
}

/// Answers lookup requests from a [`NewsStore`].
pub struct LookupHandler {
    store: Arc<dyn NewsStore>,
    termination: Termination,
}

impl LookupHandler {
    pub fn new(store: Arc<dyn NewsStore>, termination: Termination) -> Self {
        Self { store, termination }
    }

    /// Handle one request end to end.
    #[tracing::instrument(name = "handler.lookup", skip_all, fields(subject = %request.subject))]
    pub async fn handle(&self, request: IncomingRequest) -> HandlerState {
        let id = match codec::decode_request(&request.payload) {
            Ok(id) => id,
            Err(e) => {
                self.termination.terminate(FatalError::Decode(e));
                return HandlerState::EscalatedFailure;
            }
        };

        let reply = self.query(id).await;

        if let Err(e) = request.respond(codec::encode_reply(&reply)).await {
            self.termination.terminate(FatalError::Bus(e));
            return HandlerState::EscalatedFailure;
        }

        debug!(id, "Reply sent");
        HandlerState::Done
    }

    async fn query(&self, id: i64) -> Reply {
        match self.store.lookup(&self.termination, id).await {
            Ok(item) => Reply::Found(item),
            Err(StoreError::NotFound(_)) => {
                debug!(id, "News item not found");
                Reply::NotFound
            }
            Err(e @ StoreError::Cancelled) => {
                warn!(id, "Lookup cancelled by shutdown");
                Reply::Internal(e.to_string())
            }
            Err(e) => {
                error!(id, error = ?e, "News item lookup failed");
                Reply::Internal(e.to_string())
            }
        }
    }

    /// Serve requests one at a time until termination.
    ///
    /// A subscription that ends while the process is still live means the
    /// bus connection went away, which terminates the process.
    pub async fn run(&self, mut requests: Subscription) {
        info!("Lookup handler started");

        loop {
            tokio::select! {
                biased;
                _ = self.termination.cancelled() => break,
                next = requests.next() => match next {
                    Some(request) => {
                        self.handle(request).await;
                    }
                    None => {
                        if !self.termination.is_cancelled() {
                            self.termination.terminate(FatalError::Bus(BusError::Closed));
                        }
                        break;
                    }
                },
            }
        }

        info!("Lookup handler stopped");
    }
}
