//! # shelflife-core: Pure Domain Types for shelflife
//!
//! This crate holds the product model and the expiration rules shared by
//! the persistence layer and its callers. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        shelflife Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │           Callers (outside this workspace)                      │   │
//! │  │    chat bot handlers, expiry scheduler, notifier                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ ProductStore trait                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    shelflife-db (Persistence)                   │   │
//! │  │        SqliteProductStore, InMemoryProductStore                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ shelflife-core (THIS CRATE) ★                      │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐                 │   │
//! │  │   │   types   │  │  expiry   │  │ validation │                 │   │
//! │  │   │  Product  │  │  horizon  │  │   rules    │                 │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - `Product` and `NewProduct`
//! - [`expiry`] - Expiration predicate and lookahead horizon
//! - [`validation`] - Store limits on names, types and dates
//! - [`error`] - Validation error type
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{Duration, Utc};
//! use shelflife_core::NewProduct;
//!
//! let milk = NewProduct::new(42, "Milk", "FOOD", Utc::now() + Duration::days(3));
//! assert!(!milk.is_expired_at(Utc::now()));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod expiry;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use types::{NewProduct, Product};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a product name, in characters.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum length of a product type, in characters.
///
/// Types are short category tags such as `FOOD` or `MEDICINE`; callers use
/// them to scope lookahead queries.
pub const MAX_PRODUCT_TYPE_LEN: usize = 50;
