//! NewsStore interface tests.
//!
//! The store under test must be initialized and seeded with [`SEED_SQL`].

use std::sync::Arc;
use std::time::Duration;

use newsbus::proto::NewsItem;
use newsbus::storage::{NewsStore, StoreError};
use newsbus::termination::Termination;

/// Rows every backend is seeded with. Plain SQL valid for all backends.
pub const SEED_SQL: &[&str] = &[
    "INSERT INTO news_items (id, header, data) VALUES (1, 'one', 'one-data')",
    "INSERT INTO news_items (id, header, data) VALUES (2, 'two', 'two-data')",
    "INSERT INTO news_items (id, header, data) VALUES (3, NULL, NULL)",
];

pub async fn test_lookup_found<S: NewsStore>(store: &S) {
    let termination = Termination::new();

    let item = store
        .lookup(&termination, 1)
        .await
        .expect("lookup should succeed");

    assert_eq!(
        item,
        NewsItem {
            id: 1,
            header: "one".to_string(),
            data: "one-data".to_string(),
        }
    );
}

pub async fn test_lookup_not_found<S: NewsStore>(store: &S) {
    let termination = Termination::new();

    let result = store.lookup(&termination, 4).await;

    assert!(
        matches!(result, Err(StoreError::NotFound(4))),
        "expected NotFound(4), got {:?}",
        result
    );
}

pub async fn test_lookup_negative_id<S: NewsStore>(store: &S) {
    let termination = Termination::new();

    let result = store.lookup(&termination, -200).await;
    assert!(matches!(result, Err(StoreError::NotFound(-200))));
}

pub async fn test_lookup_null_columns<S: NewsStore>(store: &S) {
    let termination = Termination::new();

    let item = store
        .lookup(&termination, 3)
        .await
        .expect("lookup should succeed");

    assert_eq!(item.id, 3);
    assert!(item.header.is_empty());
    assert!(item.data.is_empty());
}

pub async fn test_init_idempotent<S: NewsStore>(store: &S) {
    let termination = Termination::new();

    store.init(&termination).await.expect("second init should succeed");

    // Existing rows survive.
    assert!(store.lookup(&termination, 1).await.is_ok());
}

pub async fn test_lookup_after_termination<S: NewsStore>(store: &S) {
    let termination = Termination::new();
    termination.terminatef(format_args!("shutting down"));

    let result = store.lookup(&termination, 1).await;
    assert!(matches!(result, Err(StoreError::Cancelled)));
}

pub async fn test_concurrent_lookups<S: NewsStore + 'static>(store: Arc<S>) {
    let termination = Termination::new();

    let lookups: Vec<_> = (0..16)
        .map(|i| {
            let store = store.clone();
            let termination = termination.clone();
            tokio::spawn(async move { store.lookup(&termination, 1 + i % 2).await })
        })
        .collect();

    for (i, lookup) in lookups.into_iter().enumerate() {
        let item = tokio::time::timeout(Duration::from_secs(10), lookup)
            .await
            .expect("lookup timed out")
            .unwrap()
            .expect("lookup should succeed");
        assert_eq!(item.id, 1 + (i as i64) % 2);
    }
}

/// Run all NewsStore tests against an initialized, seeded store.
#[macro_export]
macro_rules! run_news_store_tests {
    ($store:expr) => {
        use $crate::storage::news_store_tests::*;

        test_lookup_found(&*$store).await;
        println!("  test_lookup_found: PASSED");

        test_lookup_not_found(&*$store).await;
        println!("  test_lookup_not_found: PASSED");

        test_lookup_negative_id(&*$store).await;
        println!("  test_lookup_negative_id: PASSED");

        test_lookup_null_columns(&*$store).await;
        println!("  test_lookup_null_columns: PASSED");

        test_init_idempotent(&*$store).await;
        println!("  test_init_idempotent: PASSED");

        test_lookup_after_termination(&*$store).await;
        println!("  test_lookup_after_termination: PASSED");

        test_concurrent_lookups($store.clone()).await;
        println!("  test_concurrent_lookups: PASSED");
    };
}
