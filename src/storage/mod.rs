//! Storage for news items.
//!
//! This module contains:
//! - `NewsStore` trait: lookup by identifier
//! - `StoreError`: not-found versus real failures
//! - Implementations: PostgreSQL/CockroachDB, SQLite, Mock

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{StorageConfig, StorageType};
use crate::proto::NewsItem;
use crate::termination::Termination;

pub mod mock;
pub mod schema;
pub mod sql;

pub use mock::MockNewsStore;
#[cfg(feature = "postgres")]
pub use sql::postgres::PostgresNewsStore;
#[cfg(feature = "sqlite")]
pub use sql::sqlite::SqliteNewsStore;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Expected business outcome, not a failure of the store.
    #[error("News item not found: id={0}")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store operation cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

/// Interface for news item lookups.
///
/// Implementations must be safe under concurrent calls and must return
/// [`StoreError::Cancelled`] promptly once `termination` fires.
#[async_trait]
pub trait NewsStore: Send + Sync {
    /// Create the backing table if it does not exist.
    async fn init(&self, termination: &Termination) -> Result<()>;

    /// Fetch one news item.
    ///
    /// Returns [`StoreError::NotFound`] when no row has this identifier.
    async fn lookup(&self, termination: &Termination, id: i64) -> Result<NewsItem>;
}

/// Run a store operation, abandoning it once termination is signalled.
pub(crate) async fn until_cancelled<T>(
    termination: &Termination,
    operation: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = termination.cancelled() => Err(StoreError::Cancelled),
        result = operation => result,
    }
}

/// Initialize storage based on configuration.
///
/// Connects the pool only; call [`NewsStore::init`] to create the table.
pub async fn init_store(
    config: &StorageConfig,
) -> std::result::Result<Arc<dyn NewsStore>, Box<dyn std::error::Error + Send + Sync>> {
    match config.storage_type {
        StorageType::Postgres => {
            #[cfg(feature = "postgres")]
            {
                tracing::info!(
                    storage_type = "postgres",
                    host = %config.postgres.host,
                    port = config.postgres.port,
                    database = %config.postgres.database,
                    "Connecting storage"
                );
                let pool = sqlx::PgPool::connect(&config.postgres.url()).await?;
                Ok(Arc::new(PostgresNewsStore::new(pool)))
            }

            #[cfg(not(feature = "postgres"))]
            {
                tracing::error!("Postgres storage requested but 'postgres' feature is not enabled");
                Err("Postgres support requires the 'postgres' feature. Rebuild with --features postgres".into())
            }
        }
        StorageType::Sqlite => {
            #[cfg(feature = "sqlite")]
            {
                tracing::info!(storage_type = "sqlite", path = %config.sqlite.path, "Connecting storage");

                if config.sqlite.path != ":memory:" {
                    if let Some(parent) = std::path::Path::new(&config.sqlite.path).parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                }

                let pool = if config.sqlite.path == ":memory:" {
                    // Every pooled connection would open its own empty database.
                    sqlx::sqlite::SqlitePoolOptions::new()
                        .max_connections(1)
                        .connect(&config.sqlite.url())
                        .await?
                } else {
                    sqlx::SqlitePool::connect(&config.sqlite.url()).await?
                };
                Ok(Arc::new(SqliteNewsStore::new(pool)))
            }

            #[cfg(not(feature = "sqlite"))]
            {
                tracing::error!("SQLite storage requested but 'sqlite' feature is not enabled");
                Err("SQLite support requires the 'sqlite' feature. Rebuild with --features sqlite".into())
            }
        }
    }
}
