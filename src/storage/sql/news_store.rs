//! Unified SQL NewsStore implementation.
//!
//! Uses a macro to generate implementations for each SQL backend,
//! eliminating code duplication while maintaining type safety.

use std::marker::PhantomData;

use sea_query::{Expr, Query, SelectStatement};

use super::SqlDatabase;
use crate::storage::schema::NewsItems;

/// SQL-based implementation of NewsStore.
///
/// This generic implementation works with any SQL database that implements
/// the `SqlDatabase` trait (PostgreSQL, SQLite). The pool handles
/// concurrent lookups.
pub struct SqlNewsStore<DB: SqlDatabase> {
    pool: DB::Pool,
    _marker: PhantomData<DB>,
}

impl<DB: SqlDatabase> SqlNewsStore<DB> {
    /// Create a new SQL news store with the given pool.
    pub fn new(pool: DB::Pool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    /// Get the underlying pool.
    pub fn pool(&self) -> &DB::Pool {
        &self.pool
    }
}

/// SELECT id, header, data FROM news_items WHERE id = ?
fn select_by_id(id: i64) -> SelectStatement {
    Query::select()
        .columns([NewsItems::Id, NewsItems::Header, NewsItems::Data])
        .from(NewsItems::Table)
        .and_where(Expr::col(NewsItems::Id).eq(id))
        .to_owned()
}

/// Macro to implement NewsStore for a specific SQL backend.
macro_rules! impl_news_store {
    ($db_type:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl crate::storage::NewsStore for SqlNewsStore<$db_type> {
            async fn init(
                &self,
                termination: &crate::termination::Termination,
            ) -> crate::storage::Result<()> {
                crate::storage::until_cancelled(termination, async {
                    sqlx::raw_sql(<$db_type as SqlDatabase>::CREATE_TABLE)
                        .execute(&self.pool)
                        .await?;
                    tracing::info!(
                        backend = <$db_type as SqlDatabase>::NAME,
                        "News items table ready"
                    );
                    Ok::<_, crate::storage::StoreError>(())
                })
                .await
            }

            #[tracing::instrument(name = "store.lookup", skip(self, termination))]
            async fn lookup(
                &self,
                termination: &crate::termination::Termination,
                id: i64,
            ) -> crate::storage::Result<crate::proto::NewsItem> {
                use sqlx::Row;

                let sql = <$db_type>::build_select(select_by_id(id));

                crate::storage::until_cancelled(termination, async {
                    let row = sqlx::query(&sql)
                        .fetch_optional(&self.pool)
                        .await?
                        .ok_or(crate::storage::StoreError::NotFound(id))?;

                    let header: Option<String> = row.try_get("header")?;
                    let data: Option<String> = row.try_get("data")?;

                    Ok::<_, crate::storage::StoreError>(crate::proto::NewsItem {
                        id: row.try_get("id")?,
                        header: header.unwrap_or_default(),
                        data: data.unwrap_or_default(),
                    })
                })
                .await
            }
        }
    };
}

#[cfg(feature = "postgres")]
impl_news_store!(super::postgres::Postgres, "postgres");

#[cfg(feature = "sqlite")]
impl_news_store!(super::sqlite::Sqlite, "sqlite");
