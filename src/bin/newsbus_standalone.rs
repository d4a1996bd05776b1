//! newsbus-standalone: gateway and storage worker in one process
//!
//! Both tiers share an in-process channel bus and an SQLite database, for
//! local development without NATS or PostgreSQL.
//!
//! ```text
//! [HTTP] -> [gateway] -> [bridge] -> [ChannelBus] -> [lookup handler] -> [SQLite]
//! ```
//!
//! ## Configuration
//! Same sources as the split binaries. `messaging.type` and `storage.type`
//! are ignored: the bus is always in-process and storage always SQLite.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info, warn};

use newsbus::bus::{ChannelBus, MessageBus};
use newsbus::config::{Config, StorageType};
use newsbus::handlers::gateway::{router, serve};
use newsbus::handlers::{Bridge, LookupHandler};
use newsbus::storage::init_store;
use newsbus::termination::Termination;
use newsbus::utils::bootstrap::{init_tracing, load_config, shutdown_result, wait_for_shutdown};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting newsbus-standalone");

    let mut config: Config = load_config().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;
    config.storage.storage_type = StorageType::Sqlite;

    let termination = Termination::new();

    let store = init_store(&config.storage)
        .await
        .map_err(|e| -> Box<dyn std::error::Error> { e })?;
    store.init(&termination).await?;

    let bus = ChannelBus::new();
    let subscription = bus.subscribe(&config.messaging.subject).await?;

    let handler = LookupHandler::new(store, termination.clone());
    let worker = tokio::spawn(async move { handler.run(subscription).await });

    let bridge = Arc::new(Bridge::new(
        Arc::new(bus),
        config.messaging.subject.clone(),
        config.messaging.request_timeout(),
        termination.clone(),
    ));

    let listener = TcpListener::bind(&config.gateway.addr).await?;
    let server = tokio::spawn(serve(
        listener,
        router(bridge, config.gateway.timeout()),
        termination.clone(),
    ));

    wait_for_shutdown(&termination).await;

    server.await??;
    if let Err(e) = worker.await {
        warn!(error = %e, "Lookup handler task failed");
    }

    shutdown_result(&termination)?;

    Ok(())
}
