//! # gomarket-store: Live Cart Store for GoMarket
//!
//! Wraps the pure cart from `gomarket-core` with everything that does I/O:
//! the key-value backends, the background snapshot writer, the shared
//! `CartStore` and the provider scope consumers reach it through.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        gomarket-store                                   │
//! │                                                                         │
//! │  provider   CartProvider::scope ──► use_cart() ──► CartHandle          │
//! │                  │                                                      │
//! │  store      CartStore ── watch<Cart> (state + subscribers)             │
//! │                  │                                                      │
//! │  writer     SnapshotWriter ── one task, newest snapshot wins           │
//! │                  │                                                      │
//! │  storage    KeyValueStore ── SqliteStore │ MemoryStore                 │
//! │                                                                         │
//! │  config     CartConfig (defaults → cart.toml → env)                    │
//! │  logging    tracing subscriber for binaries                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust,no_run
//! use gomarket_core::ProductInput;
//! use gomarket_store::{use_cart, CartConfig, CartProvider};
//!
//! # async fn run() -> gomarket_store::CartResult<()> {
//! let config = CartConfig::load(None)?;
//! let provider = CartProvider::open(&config).await?;
//!
//! provider
//!     .scope(async {
//!         let cart = use_cart()?;
//!         cart.add_to_cart(ProductInput::new("a", "Apple", "https://img/a.png", 1.5));
//!         cart.flush().await
//!     })
//!     .await?;
//!
//! provider.unmount().await
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod provider;
pub mod storage;
pub mod store;
pub mod writer;

pub use config::CartConfig;
pub use error::{CartError, CartResult, StorageError, StorageResult};
pub use provider::{use_cart, CartHandle, CartProvider};
pub use storage::{KeyValueStore, MemoryStore, SqliteConfig, SqliteStore};
pub use store::CartStore;
pub use writer::WriteStatus;
