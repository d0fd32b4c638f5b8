//! # gomarket-core: Pure Cart Logic for GoMarket
//!
//! This crate holds the cart as plain data plus the pure functions that
//! change it. Nothing in here touches storage; `gomarket-store` owns that.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        GoMarket Cart Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI layer (out of scope)                      │   │
//! │  │        Product list ──► Cart screen ──► Checkout                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ use_cart()                             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │           gomarket-store (CartStore, writer, storage)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ gomarket-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   cart    │  │ snapshot  │  │ validation│  │   │
//! │  │   │ LineItem  │  │  reducer  │  │   JSON    │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Line item and product input types
//! - [`cart`] - The cart and the actions that change it
//! - [`snapshot`] - Storage format for the whole cart
//! - [`validation`] - Line item rules for snapshots and incoming products
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use gomarket_core::{Cart, ProductInput};
//!
//! let mut cart = Cart::new();
//! let apple = ProductInput::new("a", "Apple", "https://img/a.png", 1.5);
//!
//! cart.add(apple.clone());
//! cart.add(apple);
//! assert_eq!(cart.get("a").map(|i| i.quantity), Some(2));
//!
//! cart.decrement("a");
//! cart.decrement("a");
//! assert!(cart.is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod snapshot;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartAction, CartChange};
pub use error::{CoreError, CoreResult, ValidationError};
pub use snapshot::{decode_snapshot, encode_snapshot};
pub use types::{CartLineItem, ProductInput};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Well-known storage key for the cart snapshot.
///
/// Namespaced so it can share a key-value store with other app data.
pub const CART_STORAGE_KEY: &str = "@GoMarket:products";
