//! NATS request/reply integration tests using testcontainers.
//!
//! Run with: cargo test --test bus_nats --features nats -- --nocapture
//!
//! These tests spin up a NATS server in a container and run the lookup
//! handler and the bridge against it.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::StreamExt;
use newsbus::bus::{BusError, MessageBus, NatsBus};
use newsbus::handlers::{Bridge, LookupHandler, LookupOutcome};
use newsbus::proto::NewsItem;
use newsbus::storage::MockNewsStore;
use newsbus::termination::Termination;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    GenericImage, ImageExt,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Start NATS container.
async fn start_nats() -> (testcontainers::ContainerAsync<GenericImage>, String) {
    let image = GenericImage::new("nats", "2.10")
        .with_exposed_port(4222.tcp())
        .with_wait_for(WaitFor::message_on_stderr(
            "Listening for client connections",
        ));

    let container = image
        .with_startup_timeout(Duration::from_secs(60))
        .start()
        .await
        .expect("Failed to start NATS container");

    let host_port = container
        .get_host_port_ipv4(4222)
        .await
        .expect("Failed to get mapped port");

    let host = container
        .get_host()
        .await
        .expect("Failed to get container host");

    let url = format!("nats://{}:{}", host, host_port);
    println!("NATS available at: {}", url);

    (container, url)
}

fn test_subject() -> String {
    format!(
        "news_items_{}",
        &uuid::Uuid::new_v4().simple().to_string()[..8]
    )
}

fn item(id: i64, header: &str) -> NewsItem {
    NewsItem {
        id,
        header: header.to_string(),
        data: format!("{}-data", header),
    }
}

#[tokio::test]
async fn test_nats_request_reply() {
    let (_container, url) = start_nats().await;
    let subject = test_subject();

    let server = NatsBus::connect(&url, REQUEST_TIMEOUT).await.unwrap();
    let client = NatsBus::connect(&url, REQUEST_TIMEOUT).await.unwrap();

    let mut subscription = server.subscribe(&subject).await.unwrap();
    tokio::spawn(async move {
        while let Some(request) = subscription.next().await {
            let mut reversed = request.payload.to_vec();
            reversed.reverse();
            request.respond(Bytes::from(reversed)).await.unwrap();
        }
    });
    server.flush().await.unwrap();

    let reply = client
        .request(&subject, Bytes::from_static(b"abc"))
        .await
        .unwrap();
    assert_eq!(&reply[..], b"cba");
}

#[tokio::test]
async fn test_nats_no_responders() {
    let (_container, url) = start_nats().await;
    let client = NatsBus::connect(&url, REQUEST_TIMEOUT).await.unwrap();

    let result = client
        .request(&test_subject(), Bytes::from_static(b"x"))
        .await;

    assert_eq!(result, Err(BusError::NoResponders));
}

#[tokio::test]
async fn test_nats_request_timeout() {
    let (_container, url) = start_nats().await;
    let subject = test_subject();

    let server = NatsBus::connect(&url, REQUEST_TIMEOUT).await.unwrap();
    let client = NatsBus::connect(&url, Duration::from_millis(200))
        .await
        .unwrap();

    // Subscribed, never answers.
    let _subscription = server.subscribe(&subject).await.unwrap();
    server.flush().await.unwrap();

    let result = client.request(&subject, Bytes::from_static(b"x")).await;
    assert_eq!(result, Err(BusError::Timeout));
}

#[tokio::test]
async fn test_nats_lookup_through_handler() {
    let (_container, url) = start_nats().await;
    let subject = test_subject();

    let store = MockNewsStore::with_items([item(1, "one")]).await;
    store.set_failing(5, "some error").await;

    let worker_termination = Termination::new();
    let worker_bus = NatsBus::connect(&url, REQUEST_TIMEOUT).await.unwrap();
    let subscription = worker_bus.subscribe(&subject).await.unwrap();
    worker_bus.flush().await.unwrap();
    let handler = LookupHandler::new(Arc::new(store), worker_termination.clone());
    let worker = tokio::spawn(async move { handler.run(subscription).await });

    let gateway_termination = Termination::new();
    let gateway_bus = NatsBus::connect(&url, REQUEST_TIMEOUT).await.unwrap();
    let bridge = Bridge::new(
        Arc::new(gateway_bus),
        subject.clone(),
        REQUEST_TIMEOUT,
        gateway_termination.clone(),
    );

    assert_eq!(
        bridge.lookup(1, None).await,
        LookupOutcome::Found(item(1, "one"))
    );
    assert_eq!(bridge.lookup(4, None).await, LookupOutcome::NotFound);
    assert_eq!(
        bridge.lookup(5, None).await,
        LookupOutcome::ServerError("some error".to_string())
    );

    worker_termination.cancel();
    tokio::time::timeout(Duration::from_secs(5), worker)
        .await
        .expect("handler did not stop")
        .unwrap();

    assert!(worker_termination.drain_error().is_none());
    assert!(gateway_termination.drain_error().is_none());
}
