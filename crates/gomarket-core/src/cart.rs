//! # Cart Reducer
//!
//! The cart and the three actions that change it.
//!
//! ## Action Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Actions                                         │
//! │                                                                         │
//! │  Action              Cart State Change                  CartChange      │
//! │  ──────              ─────────────────                  ──────────      │
//! │                                                                         │
//! │  Add(product) ─────► id present? increment              Incremented     │
//! │                      otherwise items.push(qty = 1)      Added           │
//! │                                                                         │
//! │  Increment(id) ────► items[id].qty += 1                 Incremented     │
//! │                      unknown id: nothing                Unchanged       │
//! │                                                                         │
//! │  Decrement(id) ────► items[id].qty -= 1                 Decremented     │
//! │                      then drop every qty == 0 item      Removed         │
//! │                      unknown id: nothing                Unchanged       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Actions are applied to whatever the cart holds at the moment they run.
//! Callers that share a cart between tasks must apply them under one lock
//! (see `CartStore`), never to a copy taken earlier.

use serde::{Deserialize, Serialize};

use crate::types::{CartLineItem, ProductInput};

// =============================================================================
// Actions
// =============================================================================

/// A request to change the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Add one unit of a product.
    Add(ProductInput),
    /// Add one unit of an item already in the cart.
    Increment(String),
    /// Remove one unit; the item leaves the cart at zero.
    Decrement(String),
}

impl CartAction {
    /// Returns the product id this action targets.
    pub fn id(&self) -> &str {
        match self {
            CartAction::Add(product) => &product.id,
            CartAction::Increment(id) | CartAction::Decrement(id) => id,
        }
    }
}

/// What an action did to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    /// New line item appended with quantity 1.
    Added { id: String },
    /// Existing line item went up by one.
    Incremented { id: String, quantity: u32 },
    /// Existing line item went down by one and is still in the cart.
    Decremented { id: String, quantity: u32 },
    /// Line item reached zero and was removed.
    Removed { id: String },
    /// The id was not in the cart.
    Unchanged,
}

impl CartChange {
    /// Returns true if the cart state differs from before the action.
    pub fn is_change(&self) -> bool {
        !matches!(self, CartChange::Unchanged)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by `id` (adding the same product increases quantity)
/// - Every item has `quantity >= 1`
/// - Items keep insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Wraps items that already satisfy the cart invariants.
    ///
    /// Use [`crate::decode_snapshot`] for untrusted data; it checks them.
    pub fn from_items(items: Vec<CartLineItem>) -> Self {
        Cart { items }
    }

    /// Applies an action and reports what changed.
    pub fn apply(&mut self, action: CartAction) -> CartChange {
        match action {
            CartAction::Add(product) => self.add(product),
            CartAction::Increment(id) => self.increment(&id),
            CartAction::Decrement(id) => self.decrement(&id),
        }
    }

    /// Adds a product, or one more unit of it if already present.
    pub fn add(&mut self, product: ProductInput) -> CartChange {
        if self.get(&product.id).is_some() {
            return self.increment(&product.id);
        }

        let id = product.id.clone();
        self.items.push(CartLineItem::from_product(product));
        CartChange::Added { id }
    }

    /// Increases the quantity of `id` by one. Unknown ids are ignored, and
    /// so is an item already at `u32::MAX`.
    pub fn increment(&mut self, id: &str) -> CartChange {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return CartChange::Unchanged;
        };

        match item.quantity.checked_add(1) {
            Some(quantity) => {
                item.quantity = quantity;
                CartChange::Incremented {
                    id: item.id.clone(),
                    quantity,
                }
            }
            None => CartChange::Unchanged,
        }
    }

    /// Decreases the quantity of `id` by one, dropping it at zero.
    /// Unknown ids are ignored.
    pub fn decrement(&mut self, id: &str) -> CartChange {
        let quantity = match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_sub(1);
                item.quantity
            }
            None => return CartChange::Unchanged,
        };

        self.items.retain(|item| item.quantity > 0);

        if quantity == 0 {
            CartChange::Removed { id: id.to_string() }
        } else {
            CartChange::Decremented {
                id: id.to_string(),
                quantity,
            }
        }
    }

    /// Returns the line items in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Consumes the cart, returning its line items.
    pub fn into_items(self) -> Vec<CartLineItem> {
        self.items
    }

    /// Looks up a line item by product id.
    pub fn get(&self, id: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Returns the number of distinct line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the sum of all quantities.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn product(id: &str) -> ProductInput {
        ProductInput::new(id, "Title", "img", 1.0)
    }

    proptest! {
        #[test]
        fn test_quantity_is_one_plus_increments_minus_decrements(
            steps in prop::collection::vec(any::<bool>(), 0..64)
        ) {
            let mut cart = Cart::new();
            cart.add(product("a"));
            let mut expected: i64 = 1;

            for inc in steps {
                if inc {
                    cart.increment("a");
                } else {
                    cart.decrement("a");
                }
                // Once removed, the item stays gone.
                if expected > 0 {
                    expected += if inc { 1 } else { -1 };
                }

                match cart.get("a") {
                    Some(item) => prop_assert_eq!(i64::from(item.quantity), expected),
                    None => prop_assert_eq!(expected, 0),
                }
            }
        }

        #[test]
        fn test_unknown_id_is_a_no_op(
            ids in prop::collection::vec("[a-e]", 0..16),
            unknown in "[f-z]{2,6}",
            inc in any::<bool>()
        ) {
            let mut cart = Cart::new();
            for id in &ids {
                cart.add(product(id));
            }
            let before = cart.clone();

            let change = if inc {
                cart.increment(&unknown)
            } else {
                cart.decrement(&unknown)
            };

            prop_assert_eq!(change, CartChange::Unchanged);
            prop_assert_eq!(cart, before);
        }

        #[test]
        fn test_items_stay_unique_and_positive(
            actions in prop::collection::vec((0u8..3, "[a-d]"), 0..64)
        ) {
            let mut cart = Cart::new();
            for (kind, id) in actions {
                let action = match kind {
                    0 => CartAction::Add(product(&id)),
                    1 => CartAction::Increment(id),
                    _ => CartAction::Decrement(id),
                };
                cart.apply(action);
            }

            let mut seen = std::collections::HashSet::new();
            for item in cart.items() {
                prop_assert!(item.quantity >= 1);
                prop_assert!(seen.insert(item.id.clone()));
            }
        }
    }
}
