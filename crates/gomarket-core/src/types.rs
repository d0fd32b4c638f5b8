//! # Domain Types
//!
//! The two shapes a product takes in the cart.
//!
//! ```text
//! ┌─────────────────────────┐   add    ┌─────────────────────────┐
//! │     ProductInput        │ ───────► │     CartLineItem        │
//! │  ─────────────────────  │          │  ─────────────────────  │
//! │  id                     │          │  id                     │
//! │  title                  │          │  title                  │
//! │  image_url              │          │  image_url              │
//! │  price                  │          │  price                  │
//! │                         │          │  quantity (>= 1)        │
//! └─────────────────────────┘          └─────────────────────────┘
//! ```
//!
//! Field names serialize as `image_url` (snake case). That is the snapshot
//! format already on devices, so do not rename it.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Product Input
// =============================================================================

/// A product as handed to `add_to_cart`, before it has a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductInput {
    /// Product identifier. Also the line item identity inside the cart.
    pub id: String,

    /// Display label.
    pub title: String,

    /// Display image reference.
    pub image_url: String,

    /// Unit price.
    pub price: f64,
}

impl ProductInput {
    /// Creates a product input.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        ProductInput {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }
}

// =============================================================================
// Cart Line Item
// =============================================================================

/// A product plus its quantity in the cart.
///
/// ## Invariants
/// - `quantity >= 1` while the item is in a cart
/// - `id` is unique within a cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLineItem {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
    pub quantity: u32,
}

impl CartLineItem {
    /// Creates a line item with quantity 1 from a product.
    pub fn from_product(product: ProductInput) -> Self {
        CartLineItem {
            id: product.id,
            title: product.title,
            image_url: product.image_url,
            price: product.price,
            quantity: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_product_starts_at_one() {
        let product = ProductInput::new("p1", "Banana", "https://img/banana.png", 0.25);
        let item = CartLineItem::from_product(product);

        assert_eq!(item.id, "p1");
        assert_eq!(item.title, "Banana");
        assert_eq!(item.image_url, "https://img/banana.png");
        assert_eq!(item.price, 0.25);
        assert_eq!(item.quantity, 1);
    }

    #[test]
    fn test_line_item_uses_snake_case_image_url() {
        let item = CartLineItem::from_product(ProductInput::new("p1", "Banana", "img", 1.0));
        let json = serde_json::to_value(&item).unwrap();

        assert!(json.get("image_url").is_some());
        assert!(json.get("imageUrl").is_none());
    }
}
