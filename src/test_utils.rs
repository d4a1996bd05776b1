//! Shared fixtures for unit tests.

use std::sync::Arc;
use std::time::Duration;

use crate::bus::{ChannelBus, MessageBus};
use crate::handlers::{Bridge, LookupHandler};
use crate::proto::NewsItem;
use crate::storage::MockNewsStore;
use crate::termination::Termination;

pub(crate) const SUBJECT: &str = "news_items";

/// News item whose data is derived from its header.
pub(crate) fn news_item(id: i64, header: &str) -> NewsItem {
    NewsItem {
        id,
        header: header.to_string(),
        data: format!("{}-data", header),
    }
}

/// Storage tier wired to an in-process bus.
pub(crate) struct Worker {
    pub bus: ChannelBus,
    pub termination: Termination,
}

/// Start a lookup handler over `store` on a fresh channel bus.
pub(crate) async fn spawn_worker(store: impl Into<Arc<MockNewsStore>>) -> Worker {
    let bus = ChannelBus::new();
    let termination = Termination::new();
    let store: Arc<MockNewsStore> = store.into();
    let handler = LookupHandler::new(store, termination.clone());

    let subscription = bus.subscribe(SUBJECT).await.unwrap();
    tokio::spawn(async move { handler.run(subscription).await });

    Worker { bus, termination }
}

/// Bridge on `bus` with its own termination context.
pub(crate) fn bridge(bus: &ChannelBus, request_timeout: Duration) -> (Arc<Bridge>, Termination) {
    let termination = Termination::new();
    let bridge = Bridge::new(
        Arc::new(bus.clone()),
        SUBJECT,
        request_timeout,
        termination.clone(),
    );
    (Arc::new(bridge), termination)
}
