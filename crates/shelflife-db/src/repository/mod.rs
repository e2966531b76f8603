//! # Repository Module
//!
//! The `ProductStore` abstraction and its implementations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Bot handler / expiry scheduler                                        │
//! │       │                                                                 │
//! │       │  store.find_by_expired_time(&cancel, 1h, "FOOD")               │
//! │       ▼                                                                 │
//! │  dyn ProductStore                                                      │
//! │  ├── SqliteProductStore    (production, one statement per call)        │
//! │  └── InMemoryProductStore  (fake for caller tests)                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Implementations
//!
//! - [`product::SqliteProductStore`] - SQLite via sqlx
//! - [`memory::InMemoryProductStore`] - mutex-guarded map, same semantics

pub mod mapping;
pub mod memory;
pub mod product;

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use shelflife_core::{NewProduct, Product};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::error::{DbError, DbResult};

pub type DynProductStore = Arc<dyn ProductStore + Send + Sync>;

/// Storage for perishable products.
///
/// Every operation takes the caller's cancellation token.
///
/// - Reads (`find_*`): if the token fires before the query finishes, the
///   query is abandoned and `DbError::Cancelled` is returned instead of a
///   result.
/// - Writes (`save`, `update`, `delete`, `set_expired`): the token is
///   checked once, before the statement is sent. A cancelled token returns
///   `DbError::Cancelled` and nothing is written. Once sent, the write runs
///   to completion and its real outcome is returned, so `Cancelled` never
///   hides a committed write.
///
/// List operations return an empty `Vec` when nothing matches.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Inserts a new product. The assigned id is not returned; re-query to
    /// learn it. `is_expired` is computed from the database clock.
    async fn save(&self, cancel: &CancellationToken, product: &NewProduct) -> DbResult<()>;

    /// All products whose persisted expired flag equals `expired`, latest
    /// expiration first.
    async fn find_all_order_by_exp(
        &self,
        cancel: &CancellationToken,
        expired: bool,
    ) -> DbResult<Vec<Product>>;

    /// Replaces every caller field of product `id` and recomputes its
    /// expired flag. Zero matched rows follow the configured
    /// [`MissingRowPolicy`](crate::MissingRowPolicy).
    async fn update(&self, cancel: &CancellationToken, id: i64, product: &NewProduct)
        -> DbResult<()>;

    /// Products of `product_type` expiring at or before `now + interval`,
    /// regardless of the expired flag. Soonest expiration first.
    async fn find_by_expired_time(
        &self,
        cancel: &CancellationToken,
        interval: Duration,
        product_type: &str,
    ) -> DbResult<Vec<Product>>;

    /// Physically removes product `id`.
    async fn delete(&self, cancel: &CancellationToken, id: i64) -> DbResult<()>;

    /// Flags every product whose expiration has passed. Returns how many
    /// rows changed; a repeat sweep with nothing newly expired returns 0.
    async fn set_expired(&self, cancel: &CancellationToken) -> DbResult<u64>;

    /// All products currently flagged expired.
    async fn find_all_expired(&self, cancel: &CancellationToken) -> DbResult<Vec<Product>> {
        self.find_all_order_by_exp(cancel, true).await
    }
}

/// Fails with `DbError::Cancelled` if the token has already fired.
///
/// Called by writes before the statement is sent.
pub(crate) fn ensure_live(cancel: &CancellationToken, operation: &'static str) -> DbResult<()> {
    if cancel.is_cancelled() {
        warn!(operation, "Product store write cancelled before start");
        return Err(DbError::Cancelled);
    }
    Ok(())
}

/// Races a read `fut` against the cancellation token.
///
/// A token that is already cancelled wins before the statement starts.
pub(crate) async fn run_cancellable<T, F>(
    cancel: &CancellationToken,
    operation: &'static str,
    fut: F,
) -> DbResult<T>
where
    F: Future<Output = DbResult<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            warn!(operation, "Product store operation cancelled");
            Err(DbError::Cancelled)
        }
        result = fut => result,
    }
}
