//! # In-Memory Store
//!
//! A `KeyValueStore` that lives in process memory. Used by tests and by
//! callers that do not need the cart to survive a restart.
//!
//! Reads and writes can be made to fail on demand, and writes can be
//! slowed down, so the store's error and ordering paths can be exercised
//! without a real disk.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use super::KeyValueStore;
use crate::error::{StorageError, StorageResult};

#[derive(Debug, Default)]
struct MemoryInner {
    entries: RwLock<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicU64,
    write_delay_ms: AtomicU64,
}

/// In-process key-value store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryInner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with one entry already present.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.inner.entries.write() {
            entries.insert(key.into(), value.into());
        }
        store
    }

    /// Makes every subsequent `get` fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent `set` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Delays every subsequent `set` by `delay` before it lands.
    pub fn set_write_delay(&self, delay: Duration) {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.inner.write_delay_ms.store(millis, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> u64 {
        self.inner.writes.load(Ordering::SeqCst)
    }

    /// Reads a value without going through the async trait.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.inner
            .entries
            .read()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        if self.inner.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::QueryFailed(format!("read of '{}' failed", key)));
        }

        let entries = self
            .inner
            .entries
            .read()
            .map_err(|_| StorageError::Internal("memory store lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let delay = self.inner.write_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::QueryFailed(format!("write of '{}' failed", key)));
        }

        let mut entries = self
            .inner
            .entries
            .write()
            .map_err(|_| StorageError::Internal("memory store lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
