//! # SQLite Key-Value Store
//!
//! Durable `KeyValueStore` backed by a local SQLite file.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SQLite Key-Value Store                             │
//! │                                                                         │
//! │  SqliteConfig::new(path) ← Configure pool settings                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqliteStore::open(config).await ← Create pool + run migrations        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │  kv_store                               │                           │
//! │  │  key (PK) │ value (TEXT) │ updated_at   │                           │
//! │  │  ─────────┼──────────────┼────────────  │                           │
//! │  │  @GoMarket:products │ [{...}] │ ...     │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! File databases run in WAL mode so a read during hydrate never blocks the
//! background writer, and a crash mid-write leaves the previous snapshot.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::migrations;
use super::KeyValueStore;
use crate::error::{StorageError, StorageResult};

const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// SQLite store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = SqliteConfig::new("/path/to/gomarket.db").max_connections(2);
/// ```
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 2 (one reader during hydrate, one writer)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,
}

impl SqliteConfig {
    /// Creates a configuration for the database file at `path`.
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SqliteConfig {
            database_path: path.into(),
            max_connections: 2,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// The database lives as long as its single pooled connection.
    pub fn in_memory() -> Self {
        SqliteConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
        }
    }

    /// Returns true if this configuration points at an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(IN_MEMORY_PATH)
    }
}

// =============================================================================
// Store
// =============================================================================

/// Key-value store on top of a SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens the database, creating the file and schema when needed.
    pub async fn open(config: SqliteConfig) -> StorageResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening cart storage"
        );

        let connect_options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?
        } else {
            if let Some(parent) = config.database_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;
                }
            }

            SqliteConnectOptions::new()
                .filename(&config.database_path)
                .create_if_missing(true)
                // Readers don't block the writer and vice versa
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
        };

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout));

        // An in-memory database disappears with its last connection.
        if config.is_in_memory() {
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Storage pool created"
        );

        migrations::run_migrations(&pool).await?;

        Ok(SqliteStore { pool })
    }

    /// Closes the connection pool. Later reads and writes fail.
    pub async fn close(&self) {
        info!("Closing storage pool");
        self.pool.close().await;
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        debug!(key = %key, found = value.is_some(), "Storage read");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = value.len(), "Storage write");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = SqliteStore::open(SqliteConfig::in_memory()).await.unwrap();

        // Schema exists, and migrating again is a no-op.
        migrations::run_migrations(&store.pool).await.unwrap();
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = SqliteStore::open(SqliteConfig::in_memory()).await.unwrap();
        assert_eq!(store.get("@GoMarket:products").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = SqliteStore::open(SqliteConfig::in_memory()).await.unwrap();

        store.set("k", "[]").await.unwrap();
        store.set("k", r#"[{"id":"a"}]"#).await.unwrap();

        assert_eq!(
            store.get("k").await.unwrap().as_deref(),
            Some(r#"[{"id":"a"}]"#)
        );
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("cart.db");

        let store = SqliteStore::open(SqliteConfig::new(&path)).await.unwrap();
        store.set("k", "persisted").await.unwrap();
        store.close().await;

        let reopened = SqliteStore::open(SqliteConfig::new(&path)).await.unwrap();
        assert_eq!(reopened.get("k").await.unwrap().as_deref(), Some("persisted"));
    }

    #[tokio::test]
    async fn test_closed_pool_fails() {
        let store = SqliteStore::open(SqliteConfig::in_memory()).await.unwrap();
        store.close().await;

        assert!(store.get("k").await.is_err());
        assert!(store.set("k", "v").await.is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = SqliteConfig::new("/tmp/test.db").max_connections(4);

        assert_eq!(config.max_connections, 4);
        assert!(!config.is_in_memory());
        assert!(SqliteConfig::in_memory().is_in_memory());
    }
}
