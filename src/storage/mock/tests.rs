use std::time::Duration;

use super::*;

fn item(id: i64, header: &str) -> NewsItem {
    NewsItem {
        id,
        header: header.to_string(),
        data: format!("{}-data", header),
    }
}

#[tokio::test]
async fn test_mock_lookup_found() {
    let store = MockNewsStore::with_items([item(1, "one"), item(2, "two")]).await;
    let termination = Termination::new();

    let found = store.lookup(&termination, 2).await.unwrap();
    assert_eq!(found, item(2, "two"));
    assert_eq!(store.lookup_count(), 1);
}

#[tokio::test]
async fn test_mock_lookup_not_found() {
    let store = MockNewsStore::new();
    let termination = Termination::new();

    let result = store.lookup(&termination, 4).await;
    assert!(matches!(result, Err(StoreError::NotFound(4))));
}

#[tokio::test]
async fn test_mock_failing_id() {
    let store = MockNewsStore::with_items([item(5, "five")]).await;
    store.set_failing(5, "some error").await;
    let termination = Termination::new();

    match store.lookup(&termination, 5).await {
        Err(StoreError::Other(message)) => assert_eq!(message, "some error"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_mock_blocking_id_unwinds_on_terminate() {
    let store = std::sync::Arc::new(MockNewsStore::new());
    store.set_blocking(9).await;
    let termination = Termination::new();

    let pending = {
        let store = store.clone();
        let termination = termination.clone();
        tokio::spawn(async move { store.lookup(&termination, 9).await })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!pending.is_finished());

    termination.terminatef(format_args!("stop"));

    let result = tokio::time::timeout(Duration::from_secs(1), pending)
        .await
        .expect("blocked lookup did not unwind")
        .unwrap();
    assert!(matches!(result, Err(StoreError::Cancelled)));
}

#[tokio::test]
async fn test_mock_init() {
    let store = MockNewsStore::new();
    let termination = Termination::new();

    store.init(&termination).await.unwrap();

    store.set_fail_on_init(true).await;
    assert!(matches!(
        store.init(&termination).await,
        Err(StoreError::Other(_))
    ));

    termination.cancel();
    assert!(matches!(
        store.init(&termination).await,
        Err(StoreError::Cancelled)
    ));
}
