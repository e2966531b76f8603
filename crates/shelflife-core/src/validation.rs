//! # Validation Module
//!
//! Store limits checked on a `NewProduct` before it is written.
//!
//! Names and product types are free text chosen by the caller: empty
//! strings, spaces and punctuation are all accepted. Only the length of
//! each string and the year of the expiration date are bounded.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Caller (bot handler)  - parses user input                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE           - length caps, storable date range     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database              - NOT NULL constraints                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Datelike, Utc};

use crate::error::ValidationError;
use crate::expiry::{MAX_EXPIRATION_YEAR, MIN_EXPIRATION_YEAR};
use crate::types::NewProduct;
use crate::{MAX_NAME_LEN, MAX_PRODUCT_TYPE_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a product name.
///
/// ## Rules
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use shelflife_core::validation::validate_name;
///
/// assert!(validate_name("Greek yogurt").is_ok());
/// assert!(validate_name("").is_ok());
/// assert!(validate_name(&"x".repeat(201)).is_err());
/// ```
pub fn validate_name(name: &str) -> ValidationResult<()> {
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a product type.
///
/// ## Rules
/// - At most 50 characters
pub fn validate_product_type(product_type: &str) -> ValidationResult<()> {
    if product_type.chars().count() > MAX_PRODUCT_TYPE_LEN {
        return Err(ValidationError::TooLong {
            field: "product_type".to_string(),
            max: MAX_PRODUCT_TYPE_LEN,
        });
    }

    Ok(())
}

/// Validates that an expiration date can be stored and compared.
///
/// ## Rules
/// - Year between 0 and 9999 inclusive
pub fn validate_expiration_date(expiration_date: DateTime<Utc>) -> ValidationResult<()> {
    let year = expiration_date.year();

    if !(MIN_EXPIRATION_YEAR..=MAX_EXPIRATION_YEAR).contains(&year) {
        return Err(ValidationError::OutOfRange {
            field: "expiration_date".to_string(),
            reason: format!(
                "year {year} is outside {MIN_EXPIRATION_YEAR}..={MAX_EXPIRATION_YEAR}"
            ),
        });
    }

    Ok(())
}

/// Validates every caller-supplied field of a product.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_name(&product.name)?;
    validate_product_type(&product.product_type)?;
    validate_expiration_date(product.expiration_date)
}
