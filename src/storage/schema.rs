//! Database schema definitions using sea-query.
//!
//! These define the table and column identifiers for type-safe query building.

use sea_query::Iden;

/// News items table schema.
#[derive(Iden)]
pub enum NewsItems {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "header"]
    Header,
    #[iden = "data"]
    Data,
}

/// SQL for creating the news items table (PostgreSQL, CockroachDB).
pub const CREATE_NEWS_ITEMS_TABLE_POSTGRES: &str = r#"
CREATE TABLE IF NOT EXISTS news_items (
    id     BIGSERIAL PRIMARY KEY,
    header VARCHAR(255),
    data   TEXT
)
"#;

/// SQL for creating the news items table (SQLite).
pub const CREATE_NEWS_ITEMS_TABLE_SQLITE: &str = r#"
CREATE TABLE IF NOT EXISTS news_items (
    id     INTEGER PRIMARY KEY AUTOINCREMENT,
    header VARCHAR(255),
    data   TEXT
)
"#;
