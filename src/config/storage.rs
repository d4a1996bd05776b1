//! Storage configuration types.

use serde::Deserialize;

/// Default database and user name.
pub const DEFAULT_DATABASE: &str = "news_items";

/// Storage type discriminator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// PostgreSQL wire protocol (PostgreSQL, CockroachDB).
    #[default]
    Postgres,
    Sqlite,
}

/// Storage configuration (discriminated union).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage type discriminator.
    #[serde(rename = "type")]
    pub storage_type: StorageType,
    /// PostgreSQL-specific configuration.
    pub postgres: PostgresConfig,
    /// SQLite-specific configuration.
    pub sqlite: SqliteConfig,
}

/// PostgreSQL-specific configuration.
///
/// Defaults target a local insecure CockroachDB node.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 26257,
            database: DEFAULT_DATABASE.to_string(),
            user: DEFAULT_DATABASE.to_string(),
        }
    }
}

impl PostgresConfig {
    /// Connection URL for this configuration.
    pub fn url(&self) -> String {
        format!(
            "postgresql://{}@{}:{}/{}?sslmode=disable",
            self.user, self.host, self.port, self.database
        )
    }
}

/// SQLite-specific configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// Database file path, or `:memory:`.
    pub path: String,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: "data/news_items.db".to_string(),
        }
    }
}

impl SqliteConfig {
    /// Connection URL, creating the file if missing.
    pub fn url(&self) -> String {
        if self.path == ":memory:" {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite:{}?mode=rwc", self.path)
        }
    }
}
