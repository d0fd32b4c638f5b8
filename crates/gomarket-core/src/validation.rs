//! # Validation Module
//!
//! Rules a line item must satisfy to be part of a cart.
//!
//! The reducer upholds these by construction. They only need checking when
//! data comes from outside: a stored snapshot being decoded, or a product
//! about to be added.
//!
//! ## Usage
//! ```rust
//! use gomarket_core::validation::validate_line_items;
//! use gomarket_core::{CartLineItem, ProductInput};
//!
//! let item = CartLineItem::from_product(ProductInput::new("a", "Apple", "img", 1.0));
//! assert!(validate_line_items(&[item.clone()]).is_ok());
//! assert!(validate_line_items(&[item.clone(), item]).is_err());
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::{CartLineItem, ProductInput};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a single line item.
///
/// ## Rules
/// - `id` must not be empty
/// - `quantity` must be at least 1
/// - `price` must be finite
pub fn validate_line_item(item: &CartLineItem) -> ValidationResult<()> {
    if item.id.is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    if item.quantity == 0 {
        return Err(ValidationError::ZeroQuantity {
            id: item.id.clone(),
        });
    }

    if !item.price.is_finite() {
        return Err(ValidationError::NonFinitePrice {
            id: item.id.clone(),
        });
    }

    Ok(())
}

/// Validates a product before it enters the cart.
pub fn validate_product(product: &ProductInput) -> ValidationResult<()> {
    validate_line_item(&CartLineItem::from_product(product.clone()))
}

/// Validates a full list of line items, including id uniqueness.
pub fn validate_line_items(items: &[CartLineItem]) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(items.len());

    for item in items {
        validate_line_item(item)?;

        if !seen.insert(item.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: item.id.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> CartLineItem {
        CartLineItem::from_product(ProductInput::new(id, "Title", "img", 2.5))
    }

    #[test]
    fn test_valid_items() {
        assert!(validate_line_items(&[]).is_ok());
        assert!(validate_line_items(&[item("a"), item("b")]).is_ok());
    }

    #[test]
    fn test_empty_id() {
        let err = validate_line_item(&item("")).unwrap_err();
        assert!(matches!(err, ValidationError::Required { .. }));
    }

    #[test]
    fn test_whitespace_id_is_an_id() {
        assert!(validate_line_item(&item(" ")).is_ok());
        assert!(validate_line_items(&[item(" "), item("  ")]).is_ok());
    }

    #[test]
    fn test_zero_quantity() {
        let mut zero = item("a");
        zero.quantity = 0;

        let err = validate_line_item(&zero).unwrap_err();
        assert!(matches!(err, ValidationError::ZeroQuantity { .. }));
    }

    #[test]
    fn test_non_finite_price() {
        let mut bad = item("a");
        bad.price = f64::NAN;
        assert!(validate_line_item(&bad).is_err());

        bad.price = f64::INFINITY;
        assert!(validate_line_item(&bad).is_err());
    }

    #[test]
    fn test_product_validation() {
        assert!(validate_product(&ProductInput::new("a", "Apple", "img", 0.0)).is_ok());
        assert!(validate_product(&ProductInput::new("", "Apple", "img", 1.0)).is_err());
        assert!(validate_product(&ProductInput::new("a", "Apple", "img", f64::NAN)).is_err());
    }

    #[test]
    fn test_duplicate_ids() {
        let err = validate_line_items(&[item("a"), item("b"), item("a")]).unwrap_err();
        match err {
            ValidationError::DuplicateId { id } => assert_eq!(id, "a"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
