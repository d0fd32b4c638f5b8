//! # Snapshot Writer
//!
//! One background task owns every write of the cart snapshot.
//!
//! ## Write Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Snapshot Writer                                      │
//! │                                                                         │
//! │  CartStore mutation (under the state lock)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  submit(payload) ── generation = N ──► pending slot (watch)            │
//! │                                        holds ONLY the newest snapshot  │
//! │                                              │                          │
//! │                                              ▼                          │
//! │                                  ┌───────────────────────┐             │
//! │                                  │  writer task          │             │
//! │                                  │  1. take newest       │             │
//! │                                  │  2. kv.set(key, ..)   │             │
//! │                                  │  3. publish status    │             │
//! │                                  └───────────┬───────────┘             │
//! │                                              ▼                          │
//! │                               status (watch): Written{N} / Failed{N}   │
//! │                                              │                          │
//! │  flush() ── waits for status.generation >= last submitted ◄┘           │
//! │                                                                         │
//! │  GUARANTEES:                                                           │
//! │  • Writes never overlap and never go backwards in generation           │
//! │  • Snapshots submitted while a write is in flight coalesce             │
//! │  • The last submitted snapshot is always the last one written          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::error::{CartError, CartResult, StorageError};
use crate::storage::KeyValueStore;

// =============================================================================
// Types
// =============================================================================

/// A serialized cart waiting to be written.
#[derive(Debug)]
struct Snapshot {
    generation: u64,
    payload: String,
}

/// Outcome of the most recent write attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteStatus {
    /// Nothing has been written yet.
    Idle,
    /// Snapshot `generation` is in storage.
    Written { generation: u64 },
    /// Writing snapshot `generation` failed.
    Failed { generation: u64, error: String },
}

impl WriteStatus {
    /// Generation of the last attempted write (0 when idle).
    pub fn generation(&self) -> u64 {
        match self {
            WriteStatus::Idle => 0,
            WriteStatus::Written { generation } | WriteStatus::Failed { generation, .. } => {
                *generation
            }
        }
    }
}

// =============================================================================
// Writer
// =============================================================================

/// Ordered, coalescing writer for one storage key.
pub struct SnapshotWriter {
    key: String,
    /// `None` once shutdown has begun.
    pending_tx: Mutex<Option<watch::Sender<Option<Arc<Snapshot>>>>>,
    status_rx: watch::Receiver<WriteStatus>,
    submitted: AtomicU64,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SnapshotWriter {
    /// Starts the writer task for `key`. Must be called inside a Tokio runtime.
    pub fn spawn(key: impl Into<String>, store: Arc<dyn KeyValueStore>) -> Self {
        let key = key.into();
        let (pending_tx, pending_rx) = watch::channel(None);
        let (status_tx, status_rx) = watch::channel(WriteStatus::Idle);

        let task = tokio::spawn(run(key.clone(), store, pending_rx, status_tx));

        SnapshotWriter {
            key,
            pending_tx: Mutex::new(Some(pending_tx)),
            status_rx,
            submitted: AtomicU64::new(0),
            task: Mutex::new(Some(task)),
        }
    }

    /// Queues `payload` for writing and returns its generation.
    ///
    /// Never waits. Returns `None` once shutdown has begun; the payload is
    /// dropped. Callers that need ordering between concurrent submits must
    /// serialize them (CartStore submits under its state lock).
    pub fn submit(&self, payload: String) -> Option<u64> {
        let pending_tx = self.pending_tx.lock().unwrap_or_else(PoisonError::into_inner);

        let Some(pending_tx) = pending_tx.as_ref() else {
            warn!(key = %self.key, "Snapshot submitted after shutdown; it will not be written");
            return None;
        };

        let generation = self.submitted.fetch_add(1, Ordering::SeqCst) + 1;
        pending_tx.send_replace(Some(Arc::new(Snapshot { generation, payload })));
        Some(generation)
    }

    /// Generation of the newest submitted snapshot (0 if none).
    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::SeqCst)
    }

    /// Outcome of the most recent write attempt.
    pub fn status(&self) -> WriteStatus {
        self.status_rx.borrow().clone()
    }

    /// Waits until the newest submitted snapshot has been attempted.
    ///
    /// ## Returns
    /// - `Ok(())` if it is in storage (or nothing was ever submitted)
    /// - `Err(CartError::Storage)` if that write failed
    /// - `Err(CartError::WriterClosed)` if the writer stopped first
    pub async fn flush(&self) -> CartResult<()> {
        self.wait_for_generation(self.submitted()).await
    }

    /// Stops accepting snapshots, writes the last one, then stops the task.
    ///
    /// Every snapshot accepted by `submit` before this call is covered by
    /// the returned result.
    pub async fn shutdown(&self) -> CartResult<()> {
        // Dropping the sender ends the writer loop after its final write.
        let pending_tx = self
            .pending_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(pending_tx);
        let target = self.submitted();

        let task = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                error!(key = %self.key, error = %e, "Snapshot writer task failed");
            }
            debug!(key = %self.key, "Snapshot writer stopped");
        }

        self.wait_for_generation(target).await
    }

    async fn wait_for_generation(&self, target: u64) -> CartResult<()> {
        if target == 0 {
            return Ok(());
        }

        let mut status_rx = self.status_rx.clone();
        let status = status_rx
            .wait_for(|status| status.generation() >= target)
            .await
            .map_err(|_| CartError::WriterClosed)?
            .clone();

        match status {
            WriteStatus::Failed { generation, error } => {
                Err(StorageError::WriteFailed { generation, reason: error }.into())
            }
            _ => Ok(()),
        }
    }
}

/// Writer loop: write the newest pending snapshot, publish the outcome.
async fn run(
    key: String,
    store: Arc<dyn KeyValueStore>,
    mut pending_rx: watch::Receiver<Option<Arc<Snapshot>>>,
    status_tx: watch::Sender<WriteStatus>,
) {
    debug!(key = %key, "Snapshot writer started");

    while pending_rx.changed().await.is_ok() {
        let snapshot = pending_rx.borrow_and_update().clone();
        let Some(snapshot) = snapshot else {
            continue;
        };

        match store.set(&key, &snapshot.payload).await {
            Ok(()) => {
                debug!(key = %key, generation = snapshot.generation, "Cart snapshot written");
                status_tx.send_replace(WriteStatus::Written {
                    generation: snapshot.generation,
                });
            }
            Err(e) => {
                error!(
                    key = %key,
                    generation = snapshot.generation,
                    error = %e,
                    "Cart snapshot write failed"
                );
                status_tx.send_replace(WriteStatus::Failed {
                    generation: snapshot.generation,
                    error: e.to_string(),
                });
            }
        }
    }

    debug!(key = %key, "Snapshot writer exiting");
}
