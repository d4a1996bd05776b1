//! newsbus-storage: storage-tier worker
//!
//! Subscribes to the lookup subject on NATS and answers each request from
//! the SQL store.
//!
//! ```text
//! [newsbus-gateway] --request--> [NATS: news_items] --> [newsbus-storage] --> [SQL]
//!        ^                                                     |
//!        +---------------------- reply ------------------------+
//! ```
//!
//! ## Configuration
//! - First argument: optional YAML config file
//! - NEWSBUS_CONFIG: optional YAML config file
//! - NEWSBUS__STORAGE__TYPE: postgres or sqlite
//! - NEWSBUS__MESSAGING__NATS__URL: NATS server URL
//! - NEWSBUS_LOG: log filter (default: info)

use tracing::{error, info, warn};

use newsbus::bus::{MessageBus, NatsBus};
use newsbus::handlers::LookupHandler;
use newsbus::storage::init_store;
use newsbus::termination::Termination;
use newsbus::utils::bootstrap::{init_tracing, load_config, shutdown_result, wait_for_shutdown};
use newsbus::utils::retry::{connect_with_retry, connection_backoff};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting newsbus-storage worker");

    let config = load_config().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    let termination = Termination::new();

    let store = connect_with_retry("storage", connection_backoff(), || {
        init_store(&config.storage)
    })
    .await
    .map_err(|e| -> Box<dyn std::error::Error> { e })?;
    store.init(&termination).await?;

    let messaging = &config.messaging;
    let bus = connect_with_retry("nats", connection_backoff(), || {
        NatsBus::connect(&messaging.nats.url, messaging.request_timeout())
    })
    .await?;
    let subscription = bus.subscribe(&messaging.subject).await?;

    let handler = LookupHandler::new(store, termination.clone());
    let worker = tokio::spawn(async move { handler.run(subscription).await });

    info!(subject = %messaging.subject, "Storage worker running, press Ctrl+C to exit");

    wait_for_shutdown(&termination).await;

    if let Err(e) = worker.await {
        warn!(error = %e, "Lookup handler task failed");
    }
    if let Err(e) = bus.flush().await {
        warn!(error = %e, "Failed to flush pending replies");
    }

    shutdown_result(&termination)?;

    Ok(())
}
