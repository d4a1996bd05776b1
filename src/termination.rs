//! Process termination context.
//!
//! One [`Termination`] is built per process and handed to everything that
//! can end it: the signal listener, the lookup handler, the store and the
//! gateway. It couples a broadcast cancellation token with a small error
//! slot, so that shutdown triggered from any of those places unwinds the
//! others and the exit path can tell a requested stop from a failure.
//!
//! ```text
//! [ctrl-c] --cancel()------------+
//! [handler] --terminate(err)-----+--> token cancelled --> store/bus/server unwind
//! [bus]    --terminate(err)------+
//!                                +--> error slot --> drain_error() --> exit code
//! ```

use std::fmt;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use crate::bus::BusError;
use crate::codec::CodecError;

/// Number of termination errors held without blocking.
///
/// The store and the bus may fail together; neither producer may block.
pub const ERROR_SLOT_CAPACITY: usize = 2;

/// Reasons a process terminates.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FatalError {
    /// Requested shutdown. Not a failure.
    #[error("operation cancelled")]
    Cancelled,

    #[error("decoding received message: {0}")]
    Decode(#[from] CodecError),

    #[error("message bus: {0}")]
    Bus(#[from] BusError),

    #[error("{0}")]
    Other(String),
}

impl FatalError {
    /// Whether this reason is a legal, requested cancellation.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, FatalError::Cancelled)
    }
}

/// Shared cancellation signal plus first-error capture.
///
/// Cloning is cheap; every clone refers to the same token and slot.
#[derive(Clone)]
pub struct Termination {
    token: CancellationToken,
    errors: mpsc::Sender<Option<FatalError>>,
    pending: Arc<Mutex<mpsc::Receiver<Option<FatalError>>>>,
}

impl Default for Termination {
    fn default() -> Self {
        Self::new()
    }
}

impl Termination {
    pub fn new() -> Self {
        let (errors, pending) = mpsc::channel(ERROR_SLOT_CAPACITY);
        Self {
            token: CancellationToken::new(),
            errors,
            pending: Arc::new(Mutex::new(pending)),
        }
    }

    /// Terminate with the given reason.
    ///
    /// A cancellation records "no error" and leaves the token alone. Any
    /// other reason is recorded and cancels the token, unblocking every
    /// operation waiting on it.
    pub fn terminate(&self, err: FatalError) {
        if err.is_cancellation() {
            self.push(None);
            return;
        }

        error!(error = %err, "Terminating");
        self.push(Some(err));
        self.token.cancel();
    }

    /// Terminate with a formatted error.
    ///
    /// ```
    /// # use newsbus::termination::Termination;
    /// let termination = Termination::new();
    /// termination.terminatef(format_args!("some error {}", 1));
    /// assert_eq!(termination.drain_error().unwrap().to_string(), "some error 1");
    /// ```
    pub fn terminatef(&self, args: fmt::Arguments<'_>) {
        self.terminate(FatalError::Other(args.to_string()));
    }

    /// Take at most one pending error without blocking.
    ///
    /// Returns `None` when nothing is pending or when the pending entry was
    /// a legal cancellation. Only the first call after a termination sees
    /// its error.
    pub fn drain_error(&self) -> Option<FatalError> {
        let mut pending = match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        pending.try_recv().ok().flatten()
    }

    /// Legal shutdown, e.g. on an OS signal. Records no error.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether shutdown has been signalled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once shutdown has been signalled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// The underlying token, for `select!` loops and graceful shutdown hooks.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    fn push(&self, entry: Option<FatalError>) {
        if let Err(e) = self.errors.try_send(entry) {
            // Slot full: the shutdown path only reports the first error anyway.
            let dropped = match e {
                mpsc::error::TrySendError::Full(entry) | mpsc::error::TrySendError::Closed(entry) => {
                    entry
                }
            };
            warn!(
                error = ?dropped.map(|e| e.to_string()),
                "Termination error slot full, dropping"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_new_is_live() {
        let termination = Termination::new();
        assert!(!termination.is_cancelled());
        assert!(termination.drain_error().is_none());
    }

    #[test]
    fn test_terminate_cancelled_is_not_a_failure() {
        let termination = Termination::new();

        termination.terminate(FatalError::Cancelled);

        assert!(termination.drain_error().is_none());
        assert!(!termination.is_cancelled());
    }

    #[test]
    fn test_terminate_error_reported_once() {
        let termination = Termination::new();

        termination.terminate(FatalError::Other("test error".to_string()));

        let err = termination.drain_error().expect("missing error");
        assert_eq!(err.to_string(), "test error");
        assert!(termination.drain_error().is_none());
        assert!(termination.is_cancelled());
    }

    #[test]
    fn test_terminatef_formats() {
        let termination = Termination::new();

        termination.terminatef(format_args!("some error {}", 1));

        let err = termination.drain_error().expect("missing error");
        assert_eq!(err.to_string(), "some error 1");
        assert!(termination.is_cancelled());
    }

    #[test]
    fn test_drain_in_order() {
        let termination = Termination::new();

        termination.terminatef(format_args!("one"));
        termination.terminatef(format_args!("two"));

        assert_eq!(termination.drain_error().unwrap().to_string(), "one");
        assert_eq!(termination.drain_error().unwrap().to_string(), "two");
        assert!(termination.drain_error().is_none());
    }

    #[test]
    fn test_full_slot_does_not_block() {
        let termination = Termination::new();

        for i in 0..ERROR_SLOT_CAPACITY + 3 {
            termination.terminatef(format_args!("error {}", i));
        }

        assert_eq!(termination.drain_error().unwrap().to_string(), "error 0");
        assert_eq!(termination.drain_error().unwrap().to_string(), "error 1");
        assert!(termination.drain_error().is_none());
    }

    #[test]
    fn test_cancel_records_no_error() {
        let termination = Termination::new();

        termination.cancel();
        termination.cancel();

        assert!(termination.is_cancelled());
        assert!(termination.drain_error().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let termination = Termination::new();
        let clone = termination.clone();

        clone.terminate(FatalError::Bus(BusError::Closed));

        assert!(termination.is_cancelled());
        assert!(matches!(
            termination.drain_error(),
            Some(FatalError::Bus(BusError::Closed))
        ));
    }

    #[tokio::test]
    async fn test_terminate_wakes_waiters() {
        let termination = Termination::new();
        let waiter = {
            let termination = termination.clone();
            tokio::spawn(async move { termination.cancelled().await })
        };

        termination.terminatef(format_args!("boom"));

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter not woken")
            .unwrap();
    }
}
