//! # Cart Provider
//!
//! Makes one `CartStore` available to everything running inside a scope.
//!
//! ## Scope Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Provider Scope                                       │
//! │                                                                         │
//! │  CartProvider::mount(kv, &config).await   ← build store + hydrate      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  provider.scope(async {                                                │
//! │      let cart = use_cart()?;              ← Ok(CartHandle)             │
//! │      cart.add_to_cart(product);                                        │
//! │  }).await                                                              │
//! │                                                                         │
//! │  use_cart() anywhere else                 ← Err(CartError::Scope)      │
//! │                                                                         │
//! │  provider.unmount().await                 ← flush + stop writer        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The scope is task-local. A task spawned from inside a scope does not
//! inherit it; pass it a `CartHandle` or wrap it in its own scope.

use std::future::Future;
use std::sync::Arc;

use gomarket_core::{Cart, CartLineItem, ProductInput};
use tokio::sync::watch;
use tracing::info;

use crate::config::CartConfig;
use crate::error::{CartError, CartResult};
use crate::storage::{KeyValueStore, SqliteStore};
use crate::store::CartStore;

tokio::task_local! {
    static CURRENT_CART: CartHandle;
}

// =============================================================================
// Handle
// =============================================================================

/// What cart consumers can do. Cheap to clone.
#[derive(Clone)]
pub struct CartHandle {
    store: Arc<CartStore>,
}

impl CartHandle {
    /// Current line items.
    pub fn products(&self) -> Vec<CartLineItem> {
        self.store.products()
    }

    /// Adds one unit of `product`.
    pub fn add_to_cart(&self, product: ProductInput) -> Vec<CartLineItem> {
        self.store.add_to_cart(product)
    }

    /// Adds one unit of the item `id`.
    pub fn increment(&self, id: &str) -> Vec<CartLineItem> {
        self.store.increment(id)
    }

    /// Removes one unit of the item `id`.
    pub fn decrement(&self, id: &str) -> Vec<CartLineItem> {
        self.store.decrement(id)
    }

    /// Change notifications for re-rendering.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.store.subscribe()
    }

    /// Waits until the latest change is persisted.
    pub async fn flush(&self) -> CartResult<()> {
        self.store.flush().await
    }
}

// =============================================================================
// Provider
// =============================================================================

/// Owner of a cart scope.
pub struct CartProvider {
    handle: CartHandle,
}

impl CartProvider {
    /// Wraps an existing store. The store is used as is; call
    /// `hydrate()` first if it should start from storage.
    pub fn new(store: Arc<CartStore>) -> Self {
        CartProvider {
            handle: CartHandle { store },
        }
    }

    /// Builds a store on `kv` and hydrates it.
    ///
    /// Fails if the stored cart can't be read or decoded; no scope is
    /// created in that case.
    pub async fn mount(kv: Arc<dyn KeyValueStore>, config: &CartConfig) -> CartResult<Self> {
        let store = CartStore::from_config(kv, config);
        let items = store.hydrate().await?;

        info!(key = %store.key(), items, "Cart provider mounted");
        Ok(Self::new(Arc::new(store)))
    }

    /// Opens the configured SQLite database and mounts on it.
    pub async fn open(config: &CartConfig) -> CartResult<Self> {
        let kv = SqliteStore::open(config.sqlite_config()).await?;
        Self::mount(Arc::new(kv), config).await
    }

    /// A handle usable outside any scope.
    pub fn handle(&self) -> CartHandle {
        self.handle.clone()
    }

    /// Runs `future` with this cart available through `use_cart()`.
    pub async fn scope<F>(&self, future: F) -> F::Output
    where
        F: Future,
    {
        CURRENT_CART.scope(self.handle.clone(), future).await
    }

    /// Runs `f` with this cart available through `use_cart()`.
    pub fn sync_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        CURRENT_CART.sync_scope(self.handle.clone(), f)
    }

    /// Persists pending changes and stops the writer.
    pub async fn unmount(self) -> CartResult<()> {
        info!(key = %self.handle.store.key(), "Cart provider unmounted");
        self.handle.store.shutdown().await
    }
}

/// Returns the cart of the enclosing provider scope.
///
/// ## Errors
/// `CartError::Scope` when called outside `CartProvider::scope`.
pub fn use_cart() -> CartResult<CartHandle> {
    CURRENT_CART
        .try_with(CartHandle::clone)
        .map_err(|_| CartError::Scope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use gomarket_core::CART_STORAGE_KEY;

    fn product(id: &str) -> ProductInput {
        ProductInput::new(id, "Title", "https://img/x.png", 4.0)
    }

    async fn provider(kv: &MemoryStore) -> CartProvider {
        CartProvider::mount(Arc::new(kv.clone()), &CartConfig::default())
            .await
            .unwrap()
    }

    #[test]
    fn test_use_cart_outside_scope() {
        let err = use_cart().err().unwrap();
        assert!(matches!(err, CartError::Scope));
        assert_eq!(err.to_string(), "useCart must be used within a CartProvider");
    }

    #[tokio::test]
    async fn test_use_cart_inside_scope() {
        let kv = MemoryStore::new();
        let provider = provider(&kv).await;

        let items = provider
            .scope(async {
                let cart = use_cart().unwrap();
                cart.add_to_cart(product("a"));
                cart.increment("a");
                cart.flush().await.unwrap();
                cart.products()
            })
            .await;

        assert_eq!(items[0].quantity, 2);
        assert!(kv.peek(CART_STORAGE_KEY).is_some());
        assert!(use_cart().is_err());
    }

    #[tokio::test]
    async fn test_sync_scope() {
        let provider = provider(&MemoryStore::new()).await;

        let len = provider.sync_scope(|| {
            let cart = use_cart().unwrap();
            cart.add_to_cart(product("a")).len()
        });

        assert_eq!(len, 1);
        assert_eq!(provider.handle().products().len(), 1);
    }

    #[tokio::test]
    async fn test_spawned_task_needs_own_scope() {
        let provider = provider(&MemoryStore::new()).await;

        let inherited = provider
            .scope(async { tokio::spawn(async { use_cart().is_ok() }).await.unwrap() })
            .await;
        assert!(!inherited);

        let handle = provider.handle();
        let len = tokio::spawn(async move { handle.add_to_cart(product("a")).len() })
            .await
            .unwrap();
        assert_eq!(len, 1);
    }

    #[tokio::test]
    async fn test_nested_scope_shadows_outer() {
        let outer = provider(&MemoryStore::new()).await;
        let inner = provider(&MemoryStore::new()).await;

        outer
            .scope(async {
                inner
                    .scope(async {
                        use_cart().unwrap().add_to_cart(product("inner"));
                    })
                    .await;
                use_cart().unwrap().add_to_cart(product("outer"));
            })
            .await;

        assert_eq!(inner.handle().products()[0].id, "inner");
        assert_eq!(outer.handle().products()[0].id, "outer");
    }

    #[tokio::test]
    async fn test_mount_hydrates() {
        let kv = MemoryStore::with_entry(
            CART_STORAGE_KEY,
            r#"[{"id":"a","title":"Apple","image_url":"img","price":2.0,"quantity":2}]"#,
        );
        let provider = provider(&kv).await;

        assert_eq!(provider.handle().products()[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_mount_propagates_bad_snapshot() {
        let kv = MemoryStore::with_entry(CART_STORAGE_KEY, r#"{"id":"a"}"#);

        let result = CartProvider::mount(Arc::new(kv), &CartConfig::default()).await;
        assert!(matches!(result, Err(CartError::Deserialization(_))));
    }

    #[tokio::test]
    async fn test_unmount_flushes() {
        let kv = MemoryStore::new();
        kv.set_write_delay(std::time::Duration::from_millis(10));
        let provider = provider(&kv).await;

        provider.handle().add_to_cart(product("a"));
        provider.unmount().await.unwrap();

        assert!(kv.peek(CART_STORAGE_KEY).is_some());
    }

    #[tokio::test]
    async fn test_open_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CartConfig::default();
        config.storage.database_path = dir.path().join("cart.db");

        let provider = CartProvider::open(&config).await.unwrap();
        provider.handle().add_to_cart(product("a"));
        provider.unmount().await.unwrap();

        let reopened = CartProvider::open(&config).await.unwrap();
        assert_eq!(reopened.handle().products().len(), 1);
    }
}
