//! # Store Error Types
//!
//! Error types for storage access and cart store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StorageError ← Adds context and categorization                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CartError::Storage ◄── CoreError (bad snapshot) → Deserialization     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CartStore / use_cart() callers                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use gomarket_core::CoreError;
use thiserror::Error;

// =============================================================================
// Storage Error
// =============================================================================

/// Key-value backend errors.
///
/// These wrap sqlx errors (or test-injected failures) and keep enough
/// context to log.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend could not be opened.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Pool is closed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Read or write query failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// The background writer could not store a cart snapshot.
    #[error("Snapshot {generation} was not written: {reason}")]
    WriteFailed { generation: u64, reason: String },

    /// Internal storage error.
    #[error("Internal storage error: {0}")]
    Internal(String),
}

/// Convert sqlx errors to StorageError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → StorageError::QueryFailed
/// sqlx::Error::PoolTimedOut   → StorageError::PoolExhausted
/// sqlx::Error::PoolClosed     → StorageError::ConnectionFailed
/// Other                       → StorageError::Internal
/// ```
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => StorageError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => StorageError::PoolExhausted,
            sqlx::Error::PoolClosed => StorageError::ConnectionFailed("Pool is closed".to_string()),
            _ => StorageError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StorageError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StorageError::MigrationFailed(err.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Cart Error
// =============================================================================

/// Errors surfaced by `CartStore`, `CartProvider` and `use_cart()`.
#[derive(Debug, Error)]
pub enum CartError {
    /// Reading or writing the key-value store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The stored snapshot is not valid line-item data.
    #[error("Malformed cart snapshot: {0}")]
    Deserialization(String),

    /// The cart was requested outside a provider scope.
    #[error("useCart must be used within a CartProvider")]
    Scope,

    /// Invalid configuration.
    #[error("Invalid cart configuration: {0}")]
    Config(String),

    /// The background writer has stopped.
    #[error("Snapshot writer is not running")]
    WriterClosed,
}

impl From<CoreError> for CartError {
    fn from(err: CoreError) -> Self {
        CartError::Deserialization(err.to_string())
    }
}

impl From<std::io::Error> for CartError {
    fn from(err: std::io::Error) -> Self {
        CartError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for CartError {
    fn from(err: toml::de::Error) -> Self {
        CartError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for CartError {
    fn from(err: toml::ser::Error) -> Self {
        CartError::Config(err.to_string())
    }
}

/// Result type for cart store operations.
pub type CartResult<T> = Result<T, CartError>;
