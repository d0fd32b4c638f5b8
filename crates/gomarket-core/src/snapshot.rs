//! # Cart Snapshot Codec
//!
//! The storage format for a whole cart: a JSON array of line items.
//!
//! ```json
//! [
//!   {"id": "a", "title": "Apple", "image_url": "https://img/a.png", "price": 1.5, "quantity": 2},
//!   {"id": "b", "title": "Bread", "image_url": "https://img/b.png", "price": 3.0, "quantity": 1}
//! ]
//! ```
//!
//! Array order is cart order. Decoding checks the same invariants the
//! reducer keeps, so a cart rebuilt from storage is indistinguishable from
//! one built by actions.

use crate::error::{CoreError, CoreResult};
use crate::types::CartLineItem;
use crate::validation::validate_line_items;

/// Serializes line items into the snapshot format.
pub fn encode_snapshot(items: &[CartLineItem]) -> CoreResult<String> {
    serde_json::to_string(items).map_err(|e| CoreError::Serialization(e.to_string()))
}

/// Parses a snapshot back into line items.
///
/// ## Errors
/// - [`CoreError::Deserialization`] if the payload is not an array of
///   line-item records
/// - [`CoreError::Validation`] if a record breaks a cart invariant
pub fn decode_snapshot(payload: &str) -> CoreResult<Vec<CartLineItem>> {
    let items: Vec<CartLineItem> =
        serde_json::from_str(payload).map_err(|e| CoreError::Deserialization(e.to_string()))?;

    validate_line_items(&items)?;

    Ok(items)
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::cart::{Cart, CartAction};
    use crate::types::ProductInput;
    use proptest::prelude::*;

    fn arb_product() -> impl Strategy<Value = ProductInput> {
        (
            "[a-z0-9 ]{1,6}",
            "\\PC{0,16}",
            "[a-z:/.]{0,24}",
            // Whole cents, the way prices are entered.
            (0u32..10_000_000).prop_map(|cents| f64::from(cents) / 100.0),
        )
            .prop_map(|(id, title, image_url, price)| ProductInput::new(id, title, image_url, price))
    }

    proptest! {
        #[test]
        fn test_round_trip_reproduces_any_cart(
            products in prop::collection::vec(arb_product(), 0..12),
            decrements in prop::collection::vec(0usize..12, 0..6)
        ) {
            let mut cart = Cart::new();
            for product in &products {
                cart.apply(CartAction::Add(product.clone()));
            }
            for index in decrements {
                if let Some(product) = products.get(index) {
                    cart.apply(CartAction::Decrement(product.id.clone()));
                }
            }

            let payload = encode_snapshot(cart.items()).unwrap();
            let decoded = decode_snapshot(&payload).unwrap();

            prop_assert_eq!(decoded.as_slice(), cart.items());
        }
    }
}
