//! # In-Memory Product Store
//!
//! A `ProductStore` with no database behind it, for testing code that
//! depends on the trait (schedulers, bot handlers).
//!
//! Semantics match `SqliteProductStore`: ids count up from 1 and are never
//! reused, the expired flag is computed on save/update and corrected by
//! `set_expired`, ordering, validation, cancellation and the missing-row
//! policy are identical. The
//! clock is injectable so tests can move time forward between a write and
//! a sweep.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use shelflife_core::expiry::{is_expired_at, is_within_lookahead};
use shelflife_core::validation::validate_new_product;
use shelflife_core::{NewProduct, Product};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{ensure_live, run_cancellable, ProductStore};
use crate::config::MissingRowPolicy;
use crate::error::{DbError, DbResult};

/// Time source used to evaluate "now".
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

struct StoredProduct {
    product: Product,
    is_expired: bool,
}

#[derive(Default)]
struct Inner {
    last_id: i64,
    rows: BTreeMap<i64, StoredProduct>,
}

/// Mutex-guarded in-memory `ProductStore`.
pub struct InMemoryProductStore {
    inner: Mutex<Inner>,
    clock: Clock,
    on_missing_row: MissingRowPolicy,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(Utc::now))
    }

    /// Creates a store that reads "now" from `clock`.
    pub fn with_clock(clock: Clock) -> Self {
        InMemoryProductStore {
            inner: Mutex::new(Inner::default()),
            clock,
            on_missing_row: MissingRowPolicy::default(),
        }
    }

    /// Sets the zero-rows-affected policy for `update` and `delete`.
    pub fn on_missing_row(mut self, policy: MissingRowPolicy) -> Self {
        self.on_missing_row = policy;
        self
    }

    /// Number of stored products, regardless of flag.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

impl Default for InMemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InMemoryProductStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryProductStore")
            .field("on_missing_row", &self.on_missing_row)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn save(&self, cancel: &CancellationToken, product: &NewProduct) -> DbResult<()> {
        validate_new_product(product)?;

        ensure_live(cancel, "save")?;

        let now = self.now();
        let mut inner = self.inner.lock().await;

        inner.last_id += 1;
        let id = inner.last_id;
        debug!(id, chat_id = product.chat_id, "Saving product in memory");

        inner.rows.insert(
            id,
            StoredProduct {
                product: product.clone().with_id(id),
                is_expired: product.is_expired_at(now),
            },
        );
        Ok(())
    }

    async fn find_all_order_by_exp(
        &self,
        cancel: &CancellationToken,
        expired: bool,
    ) -> DbResult<Vec<Product>> {
        run_cancellable(cancel, "find_all_order_by_exp", async {
            let inner = self.inner.lock().await;

            let mut products: Vec<Product> = inner
                .rows
                .values()
                .filter(|row| row.is_expired == expired)
                .map(|row| row.product.clone())
                .collect();

            products.sort_by(|a, b| {
                b.expiration_date
                    .cmp(&a.expiration_date)
                    .then(b.id.cmp(&a.id))
            });
            Ok::<_, DbError>(products)
        })
        .await
    }

    async fn update(
        &self,
        cancel: &CancellationToken,
        id: i64,
        product: &NewProduct,
    ) -> DbResult<()> {
        validate_new_product(product)?;

        ensure_live(cancel, "update")?;

        let now = self.now();
        let affected = match self.inner.lock().await.rows.get_mut(&id) {
            Some(row) => {
                row.product = product.clone().with_id(id);
                row.is_expired = product.is_expired_at(now);
                1
            }
            None => 0,
        };

        self.on_missing_row.check(affected, id)
    }

    async fn find_by_expired_time(
        &self,
        cancel: &CancellationToken,
        interval: Duration,
        product_type: &str,
    ) -> DbResult<Vec<Product>> {
        run_cancellable(cancel, "find_by_expired_time", async {
            let now = self.now();
            let inner = self.inner.lock().await;

            let mut products: Vec<Product> = inner
                .rows
                .values()
                .map(|row| &row.product)
                .filter(|p| p.product_type == product_type)
                .filter(|p| is_within_lookahead(p.expiration_date, now, interval))
                .cloned()
                .collect();

            products.sort_by(|a, b| {
                a.expiration_date
                    .cmp(&b.expiration_date)
                    .then(a.id.cmp(&b.id))
            });
            Ok::<_, DbError>(products)
        })
        .await
    }

    async fn delete(&self, cancel: &CancellationToken, id: i64) -> DbResult<()> {
        ensure_live(cancel, "delete")?;

        let removed = self.inner.lock().await.rows.remove(&id).is_some();

        self.on_missing_row.check(u64::from(removed), id)
    }

    async fn set_expired(&self, cancel: &CancellationToken) -> DbResult<u64> {
        ensure_live(cancel, "set_expired")?;

        let now = self.now();
        let mut inner = self.inner.lock().await;

        let mut flipped: u64 = 0;
        for row in inner.rows.values_mut() {
            if !row.is_expired && is_expired_at(row.product.expiration_date, now) {
                row.is_expired = true;
                flipped += 1;
            }
        }
        Ok(flipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    fn manual_clock(start: DateTime<Utc>) -> (Clock, Arc<StdMutex<DateTime<Utc>>>) {
        let now = Arc::new(StdMutex::new(start));
        let handle = now.clone();
        let clock: Clock = Arc::new(move || *handle.lock().unwrap());
        (clock, now)
    }

    #[tokio::test]
    async fn test_ids_are_not_reused() {
        let store = InMemoryProductStore::new();
        let cancel = CancellationToken::new();
        let exp = Utc::now() + Duration::days(1);

        store.save(&cancel, &NewProduct::new(1, "A", "FOOD", exp)).await.unwrap();
        store.delete(&cancel, 1).await.unwrap();
        store.save(&cancel, &NewProduct::new(1, "B", "FOOD", exp)).await.unwrap();

        let all = store.find_all_order_by_exp(&cancel, false).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, 2);
    }

    #[tokio::test]
    async fn test_flag_goes_stale_until_sweep() {
        let start = Utc::now();
        let (clock, now) = manual_clock(start);
        let store = InMemoryProductStore::with_clock(clock);
        let cancel = CancellationToken::new();

        store
            .save(
                &cancel,
                &NewProduct::new(9, "Ham", "FOOD", start + Duration::hours(1)),
            )
            .await
            .unwrap();

        *now.lock().unwrap() = start + Duration::hours(2);

        // flag still reflects the write-time evaluation
        assert!(store.find_all_expired(&cancel).await.unwrap().is_empty());
        // the lookahead query uses raw timestamps
        assert_eq!(
            store
                .find_by_expired_time(&cancel, Duration::zero(), "FOOD")
                .await
                .unwrap()
                .len(),
            1
        );

        assert_eq!(store.set_expired(&cancel).await.unwrap(), 1);
        assert_eq!(store.find_all_expired(&cancel).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_operations_do_not_mutate() {
        let store = InMemoryProductStore::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = store
            .save(&cancel, &NewProduct::new(1, "A", "FOOD", Utc::now()))
            .await;

        assert!(matches!(result, Err(DbError::Cancelled)));
        assert!(store.is_empty().await);
    }
}
