//! # Domain Types
//!
//! ## Identity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  NewProduct ──save()──► products row ──find_*()──► Product             │
//! │  (no id)                (id assigned)              (id, no flag)       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The persisted `is_expired` flag never appears on either type. It lives in
//! the table and in query predicates only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::expiry;

// =============================================================================
// Product
// =============================================================================

/// A perishable item as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned identifier. Immutable once assigned.
    pub id: i64,

    /// Owning chat/user. Opaque to the store.
    pub chat_id: i64,

    /// Free-text label.
    pub name: String,

    /// Caller-defined category (`FOOD`, `MEDICINE`, ...).
    pub product_type: String,

    /// Instant after which the product counts as expired.
    pub expiration_date: DateTime<Utc>,
}

impl Product {
    /// Checks whether the product has expired at `now`.
    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        expiry::is_expired_at(self.expiration_date, now)
    }

    /// Compares every field except `id` with a `NewProduct`.
    ///
    /// Used to find a freshly saved row, since `save` does not return the id.
    pub fn fields_match(&self, new: &NewProduct) -> bool {
        self.chat_id == new.chat_id
            && self.name == new.name
            && self.product_type == new.product_type
            && self.expiration_date == new.expiration_date
    }
}

// =============================================================================
// NewProduct
// =============================================================================

/// The caller-supplied fields of a product, used for inserts and full updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub chat_id: i64,
    pub name: String,
    pub product_type: String,
    pub expiration_date: DateTime<Utc>,
}

impl NewProduct {
    pub fn new(
        chat_id: i64,
        name: impl Into<String>,
        product_type: impl Into<String>,
        expiration_date: DateTime<Utc>,
    ) -> Self {
        NewProduct {
            chat_id,
            name: name.into(),
            product_type: product_type.into(),
            expiration_date,
        }
    }

    /// Attaches a store-assigned id.
    pub fn with_id(self, id: i64) -> Product {
        Product {
            id,
            chat_id: self.chat_id,
            name: self.name,
            product_type: self.product_type,
            expiration_date: self.expiration_date,
        }
    }

    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        expiry::is_expired_at(self.expiration_date, now)
    }
}

impl From<Product> for NewProduct {
    fn from(p: Product) -> Self {
        NewProduct {
            chat_id: p.chat_id,
            name: p.name,
            product_type: p.product_type,
            expiration_date: p.expiration_date,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
