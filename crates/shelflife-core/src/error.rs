//! # Error Types
//!
//! Validation errors raised before a product reaches the database.
//!
//! ```text
//! ValidationError (this file) → DbError::Validation (shelflife-db) → caller
//! ```

use thiserror::Error;

/// Input validation errors.
///
/// Returned when a `NewProduct` exceeds the store limits in
/// [`crate::validation`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value outside the range the store can persist and compare.
    #[error("{field} is out of range: {reason}")]
    OutOfRange { field: String, reason: String },
}

// =============================================================================
// Unit Tests
// =============================================================================
