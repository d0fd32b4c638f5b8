//! # Error Types
//!
//! Domain-specific error types for gomarket-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  gomarket-core errors (this file)                                      │
//! │  ├── CoreError        - Snapshot encode/decode failures                │
//! │  └── ValidationError  - A line item breaks a cart rule                 │
//! │                                                                         │
//! │  gomarket-store errors (separate crate)                                │
//! │  ├── StorageError     - Key-value backend failures                     │
//! │  └── CartError        - What CartStore callers see                     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CartError::Deserialization        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core cart errors.
///
/// The reducer itself never fails; these come from the snapshot codec.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Stored payload is not valid line-item data.
    ///
    /// ## When This Occurs
    /// - Payload is not JSON, or not a JSON array
    /// - A record is missing a field or has the wrong type
    /// - A record breaks a cart invariant (see [`ValidationError`])
    #[error("Invalid cart snapshot: {0}")]
    Deserialization(String),

    /// Cart could not be serialized.
    #[error("Failed to serialize cart snapshot: {0}")]
    Serialization(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns true if the error means the stored payload is unusable.
    pub fn is_malformed_snapshot(&self) -> bool {
        matches!(self, CoreError::Deserialization(_) | CoreError::Validation(_))
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// A line item that can never appear in a live cart.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Quantity must be at least one.
    #[error("quantity of item '{id}' must be at least 1")]
    ZeroQuantity { id: String },

    /// Price is NaN or infinite.
    #[error("price of item '{id}' must be a finite number")]
    NonFinitePrice { id: String },

    /// Two line items share an id.
    #[error("item '{id}' appears more than once")]
    DuplicateId { id: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
