//! Mock storage implementation for testing.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{until_cancelled, NewsStore, Result, StoreError};
use crate::proto::NewsItem;
use crate::termination::Termination;

/// Mock news store that keeps items in memory.
///
/// Failures are injected per identifier: a failing id returns
/// [`StoreError::Other`] with the configured message, a blocking id hangs
/// until termination fires.
#[derive(Default)]
pub struct MockNewsStore {
    items: RwLock<HashMap<i64, NewsItem>>,
    failing: RwLock<HashMap<i64, String>>,
    blocking: RwLock<HashSet<i64>>,
    fail_on_init: RwLock<bool>,
    lookups: AtomicUsize,
}

impl MockNewsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding the given items.
    pub async fn with_items(items: impl IntoIterator<Item = NewsItem>) -> Self {
        let store = Self::new();
        for item in items {
            store.insert(item).await;
        }
        store
    }

    pub async fn insert(&self, item: NewsItem) {
        self.items.write().await.insert(item.id, item);
    }

    pub async fn set_failing(&self, id: i64, message: impl Into<String>) {
        self.failing.write().await.insert(id, message.into());
    }

    pub async fn set_blocking(&self, id: i64) {
        self.blocking.write().await.insert(id);
    }

    pub async fn set_fail_on_init(&self, fail: bool) {
        *self.fail_on_init.write().await = fail;
    }

    /// Number of lookups served so far, including failed ones.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NewsStore for MockNewsStore {
    async fn init(&self, termination: &Termination) -> Result<()> {
        if termination.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        if *self.fail_on_init.read().await {
            return Err(StoreError::Other("mock init failure".to_string()));
        }
        Ok(())
    }

    async fn lookup(&self, termination: &Termination, id: i64) -> Result<NewsItem> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        if self.blocking.read().await.contains(&id) {
            return until_cancelled(termination, futures::future::pending()).await;
        }

        until_cancelled(termination, async {
            if let Some(message) = self.failing.read().await.get(&id) {
                return Err(StoreError::Other(message.clone()));
            }

            self.items
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or(StoreError::NotFound(id))
        })
        .await
    }
}

#[cfg(test)]
mod tests;
