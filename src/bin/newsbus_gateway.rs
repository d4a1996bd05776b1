//! newsbus-gateway: HTTP gateway
//!
//! Serves `GET /news/{id}` by forwarding each lookup over NATS to the
//! storage worker.
//!
//! ## Configuration
//! - First argument: optional YAML config file
//! - NEWSBUS_CONFIG: optional YAML config file
//! - NEWSBUS__GATEWAY__ADDR: listen address (default: 127.0.0.1:3000)
//! - NEWSBUS__GATEWAY__TIMEOUT_MS: per-request deadline (default: 1000)
//! - NEWSBUS__MESSAGING__NATS__URL: NATS server URL
//! - NEWSBUS_LOG: log filter (default: info)

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use newsbus::bus::NatsBus;
use newsbus::handlers::gateway::{router, serve};
use newsbus::handlers::Bridge;
use newsbus::termination::Termination;
use newsbus::utils::bootstrap::{init_tracing, load_config, shutdown_result, wait_for_shutdown};
use newsbus::utils::retry::{connect_with_retry, connection_backoff};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting newsbus-gateway");

    let config = load_config().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    let termination = Termination::new();

    let messaging = &config.messaging;
    let bus = connect_with_retry("nats", connection_backoff(), || {
        NatsBus::connect(&messaging.nats.url, messaging.request_timeout())
    })
    .await?;

    let bridge = Arc::new(Bridge::new(
        Arc::new(bus),
        messaging.subject.clone(),
        messaging.request_timeout(),
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
    shutdown_result(&termination)?;

    Ok(())
}
