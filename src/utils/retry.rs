//! Retry utilities for startup connections.
//!
//! Uses `backon` for exponential backoff with jitter.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use tracing::warn;

/// Backoff for store and bus connection retries at startup.
///
/// - Min delay: 100ms
/// - Max delay: 5s
/// - Max attempts: 30
/// - Jitter enabled
pub fn connection_backoff() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(100))
        .with_max_delay(Duration::from_secs(5))
        .with_max_times(30)
        .with_jitter()
}

/// Run `connect` until it succeeds or `backoff` gives up.
///
/// Every failed attempt is logged with the delay before the next one.
pub async fn connect_with_retry<T, E, F, Fut>(
    service: &str,
    backoff: ExponentialBuilder,
    connect: F,
) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    connect
        .retry(backoff)
        .notify(|err: &E, dur: Duration| {
            warn!(service = %service, error = %err, delay = ?dur, "Connection failed, retrying");
        })
        .await
}
