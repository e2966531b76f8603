//! # shelflife-db: Persistence Layer for shelflife
//!
//! Stores perishable products and answers the queries that drive expiration
//! notifications: ordered listing, lookahead window and the bulk expiry
//! sweep.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Scheduler tick / bot command                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  shelflife-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌──────────────────┐    ┌────────────┐  │   │
//! │  │   │   Database    │    │  ProductStore    │    │ Migrations │  │   │
//! │  │   │   (pool.rs)   │◄───│  Sqlite / Memory │    │ (embedded) │  │   │
//! │  │   └───────────────┘    └──────────────────┘    └────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite: products(id, chat_id, name, type, expiration_date, is_expired)│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - `DbConfig` and the missing-row policy
//! - [`pool`] - Connection pool lifecycle
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - `ProductStore` and its implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chrono::Duration;
//! use shelflife_db::{Database, DbConfig, ProductStore};
//! use tokio_util::sync::CancellationToken;
//!
//! let db = Database::new(DbConfig::from_env()?).await?;
//! let store = db.products();
//! let cancel = CancellationToken::new();
//!
//! store.set_expired(&cancel).await?;
//! let due = store.find_by_expired_time(&cancel, Duration::hours(24), "FOOD").await?;
//!
//! db.close().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, DbConfig, MissingRowPolicy};
pub use error::{DbError, DbResult};
pub use pool::Database;

pub use repository::memory::InMemoryProductStore;
pub use repository::product::SqliteProductStore;
pub use repository::{DynProductStore, ProductStore};

pub use shelflife_core::{NewProduct, Product};
pub use tokio_util::sync::CancellationToken;
