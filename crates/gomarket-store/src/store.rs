//! # Cart Store
//!
//! The live cart: in-memory state plus persistence to one storage key.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CartStore Mutation                                   │
//! │                                                                         │
//! │  add_to_cart / increment / decrement                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  state.send_if_modified(|cart| ...)   ← one lock, latest state         │
//! │       │                                                                 │
//! │       ├── cart.apply(action) ──► Unchanged? return, nothing written    │
//! │       │                                                                 │
//! │       ├── encode_snapshot(cart) ──► writer.submit(payload)             │
//! │       │                             (still under the lock)             │
//! │       ▼                                                                 │
//! │  subscribers notified, caller gets the new list right away             │
//! │                                                                         │
//! │  The writer persists in the background; see `SnapshotWriter`.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Hydration
//! `hydrate()` reads the key once. Missing means an empty cart; anything
//! stored must decode to a valid cart or the call fails.

use std::sync::Arc;

use gomarket_core::validation::validate_product;
use gomarket_core::{
    decode_snapshot, encode_snapshot, Cart, CartAction, CartLineItem, ProductInput,
};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::config::CartConfig;
use crate::error::CartResult;
use crate::storage::KeyValueStore;
use crate::writer::{SnapshotWriter, WriteStatus};

/// Shopping cart backed by a key-value store.
///
/// Share it behind an `Arc`; every method takes `&self`.
pub struct CartStore {
    key: String,
    kv: Arc<dyn KeyValueStore>,
    state: watch::Sender<Cart>,
    writer: SnapshotWriter,
}

impl CartStore {
    /// Creates an empty store persisting under `key`.
    ///
    /// Starts the background writer, so it must run inside a Tokio runtime.
    pub fn new(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let (state, _) = watch::channel(Cart::new());
        let writer = SnapshotWriter::spawn(key.clone(), Arc::clone(&kv));

        CartStore {
            key,
            kv,
            state,
            writer,
        }
    }

    /// Creates an empty store using the configured key.
    pub fn from_config(kv: Arc<dyn KeyValueStore>, config: &CartConfig) -> Self {
        Self::new(kv, config.key())
    }

    /// Loads the persisted cart, replacing the in-memory state.
    ///
    /// ## Returns
    /// - `Ok(n)` with the number of line items loaded (0 when nothing is stored)
    /// - `Err(CartError::Storage)` if the read fails
    /// - `Err(CartError::Deserialization)` if the stored value is not a cart
    pub async fn hydrate(&self) -> CartResult<usize> {
        let Some(payload) = self.kv.get(&self.key).await? else {
            info!(key = %self.key, "No stored cart, starting empty");
            return Ok(0);
        };

        let items = decode_snapshot(&payload)?;
        let count = items.len();
        self.state.send_replace(Cart::from_items(items));

        info!(key = %self.key, items = count, "Cart hydrated");
        Ok(count)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one unit of `product` and returns the updated list.
    ///
    /// A product with an empty id or a non-finite price is ignored.
    pub fn add_to_cart(&self, product: ProductInput) -> Vec<CartLineItem> {
        self.apply(CartAction::Add(product))
    }

    /// Adds one unit of the item `id` and returns the updated list.
    pub fn increment(&self, id: &str) -> Vec<CartLineItem> {
        self.apply(CartAction::Increment(id.to_string()))
    }

    /// Removes one unit of the item `id` and returns the updated list.
    pub fn decrement(&self, id: &str) -> Vec<CartLineItem> {
        self.apply(CartAction::Decrement(id.to_string()))
    }

    /// Applies `action` to the current cart.
    ///
    /// An `Add` whose product fails validation is ignored. The snapshot is
    /// submitted while the state lock is held, so the writer sees snapshots
    /// in the same order the cart changed.
    pub fn apply(&self, action: CartAction) -> Vec<CartLineItem> {
        if let CartAction::Add(product) = &action {
            if let Err(e) = validate_product(product) {
                warn!(id = %product.id, error = %e, "Rejected product");
                return self.products();
            }
        }

        let mut items = Vec::new();

        self.state.send_if_modified(|cart| {
            let change = cart.apply(action);
            items = cart.items().to_vec();

            if !change.is_change() {
                debug!(key = %self.key, "Cart action changed nothing");
                return false;
            }

            debug!(key = %self.key, ?change, lines = cart.len(), "Cart updated");

            match encode_snapshot(cart.items()) {
                Ok(payload) => {
                    self.writer.submit(payload);
                }
                Err(e) => error!(key = %self.key, error = %e, "Failed to encode cart"),
            }
            true
        });

        items
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns the current line items.
    pub fn products(&self) -> Vec<CartLineItem> {
        self.state.borrow().items().to_vec()
    }

    /// Returns a copy of the current cart.
    pub fn cart(&self) -> Cart {
        self.state.borrow().clone()
    }

    /// Returns a receiver notified on every cart change.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.state.subscribe()
    }

    /// Storage key of this cart.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Outcome of the most recent snapshot write.
    pub fn write_status(&self) -> WriteStatus {
        self.writer.status()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Waits until the latest change is in storage.
    pub async fn flush(&self) -> CartResult<()> {
        self.writer.flush().await
    }

    /// Writes any pending change, then stops the writer.
    ///
    /// Changes made once this call has started stay in memory only.
    pub async fn shutdown(&self) -> CartResult<()> {
        info!(key = %self.key, "Shutting down cart store");
        self.writer.shutdown().await
    }
}
