//! Bootstrap utilities for newsbus binaries.
//!
//! Shared initialization and shutdown code for the storage worker, the
//! gateway and the standalone binary.

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, LOG_ENV_VAR};
use crate::termination::{FatalError, Termination};

/// Initialize tracing with the NEWSBUS_LOG environment variable.
///
/// Defaults to "info" level if NEWSBUS_LOG is not set.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Load configuration, taking an explicit file path from the first
/// command line argument.
pub fn load_config() -> Result<Config, ::config::ConfigError> {
    let path = std::env::args().nth(1);
    Config::load(path.as_deref())
}

/// Block until Ctrl+C or a fatal termination.
///
/// Ctrl+C is a requested stop: it cancels without recording an error.
pub async fn wait_for_shutdown(termination: &Termination) {
    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => warn!(error = %e, "Failed to listen for Ctrl+C, shutting down"),
            }
            termination.cancel();
        }
        _ = termination.cancelled() => {}
    }
}

/// Error the process should exit with, if any.
pub fn shutdown_result(termination: &Termination) -> Result<(), FatalError> {
    match termination.drain_error() {
        Some(err) => Err(err),
        None => {
            info!("Shut down cleanly");
            Ok(())
        }
    }
}
