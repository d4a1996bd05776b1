//! Unified SQL storage implementations.
//!
//! This module provides a shared implementation for SQL-based storage
//! backends (PostgreSQL, SQLite). The implementation is parameterized by
//! database type using the `SqlDatabase` trait.

mod news_store;
mod query;

pub use news_store::SqlNewsStore;
pub use query::SqlDatabase;

#[cfg(feature = "postgres")]
pub mod postgres {
    //! PostgreSQL database backend. Also serves CockroachDB.

    use sea_query::PostgresQueryBuilder;
    use sqlx::PgPool;

    use crate::storage::schema::CREATE_NEWS_ITEMS_TABLE_POSTGRES;

    /// PostgreSQL database marker type.
    pub struct Postgres;

    impl super::SqlDatabase for Postgres {
        type Pool = PgPool;

        const NAME: &'static str = "postgres";
        const CREATE_TABLE: &'static str = CREATE_NEWS_ITEMS_TABLE_POSTGRES;

        fn build_select(stmt: sea_query::SelectStatement) -> String {
            stmt.to_string(PostgresQueryBuilder)
        }
    }

    /// PostgreSQL news store.
    pub type PostgresNewsStore = super::SqlNewsStore<Postgres>;
}

#[cfg(feature = "sqlite")]
pub mod sqlite {
    //! SQLite database backend.

    use sea_query::SqliteQueryBuilder;
    use sqlx::SqlitePool;

    use crate::storage::schema::CREATE_NEWS_ITEMS_TABLE_SQLITE;

    /// SQLite database marker type.
    pub struct Sqlite;

    impl super::SqlDatabase for Sqlite {
        type Pool = SqlitePool;

        const NAME: &'static str = "sqlite";
        const CREATE_TABLE: &'static str = CREATE_NEWS_ITEMS_TABLE_SQLITE;

        fn build_select(stmt: sea_query::SelectStatement) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }
    }

    /// SQLite news store.
    pub type SqliteNewsStore = super::SqlNewsStore<Sqlite>;
}
