//! # Key-Value Storage
//!
//! The cart persists into a single slot of a string key-value store.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    KeyValueStore implementations                        │
//! │                                                                         │
//! │  ┌──────────────────────────┐      ┌──────────────────────────┐        │
//! │  │  SqliteStore             │      │  MemoryStore             │        │
//! │  │  (sqlite.rs)             │      │  (memory.rs)             │        │
//! │  │                          │      │                          │        │
//! │  │  kv_store table, WAL     │      │  HashMap behind RwLock   │        │
//! │  │  survives restarts       │      │  failure injection       │        │
//! │  └──────────────────────────┘      └──────────────────────────┘        │
//! │                                                                         │
//! │  get(key) -> Option<String>        set(key, value)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;

use crate::error::StorageResult;

pub mod memory;
pub mod migrations;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{SqliteConfig, SqliteStore};

/// Asynchronous string key-value store.
///
/// Implementations must be safe to share between the cart store and its
/// background writer.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored at `key`, if any.
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` at `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}
