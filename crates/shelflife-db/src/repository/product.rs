//! # SQLite Product Store
//!
//! One parameterized statement per operation, no transactions, no retries.
//! Reads race the cancellation token; writes check it once before sending.
//!
//! ## Time Comparisons
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  expiration_date is RFC 3339 text: 2026-05-10T12:00:00.250+00:00       │
//! │                                                                         │
//! │  Every comparison goes through julianday():                            │
//! │    expired    julianday('now') > julianday(expiration_date)            │
//! │    lookahead  julianday(expiration_date)                               │
//! │                  <= julianday('now', '+3600.000 seconds')              │
//! │                                                                         │
//! │  'now' is the database clock at statement time, never the caller's.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::Duration;
use shelflife_core::expiry::clamp_lookahead;
use shelflife_core::validation::validate_new_product;
use shelflife_core::{NewProduct, Product};
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::mapping::{map_rows, PRODUCT_COLUMNS};
use super::{ensure_live, run_cancellable, ProductStore};
use crate::config::{DbConfig, MissingRowPolicy};
use crate::error::{DbError, DbResult};
use crate::pool::Database;

/// `ProductStore` backed by a SQLite pool.
///
/// ## Usage
/// ```rust,ignore
/// let store = SqliteProductStore::connect(DbConfig::new("sqlite://shelflife.db")).await?;
/// store.save(&cancel, &NewProduct::new(chat_id, "Milk", "FOOD", exp)).await?;
/// let due = store.find_by_expired_time(&cancel, Duration::hours(24), "FOOD").await?;
/// ```
#[derive(Debug, Clone)]
pub struct SqliteProductStore {
    pool: SqlitePool,
    on_missing_row: MissingRowPolicy,
}

impl SqliteProductStore {
    /// Creates a store over an existing pool.
    pub fn new(pool: SqlitePool, on_missing_row: MissingRowPolicy) -> Self {
        SqliteProductStore {
            pool,
            on_missing_row,
        }
    }

    /// Connects, migrates and returns a store.
    ///
    /// Fails with `DbError::ConnectionFailed` if the endpoint is unreachable.
    pub async fn connect(config: DbConfig) -> DbResult<Self> {
        Ok(Database::new(config).await?.products())
    }

    async fn fetch_products<'a>(
        &self,
        cancel: &CancellationToken,
        operation: &'static str,
        query: sqlx::query::Query<'a, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'a>>,
    ) -> DbResult<Vec<Product>> {
        let rows = run_cancellable(cancel, operation, async {
            Ok::<_, DbError>(query.fetch_all(&self.pool).await?)
        })
        .await?;

        let products = map_rows(&rows)?;
        debug!(operation, count = products.len(), "Query returned products");
        Ok(products)
    }
}

#[async_trait]
impl ProductStore for SqliteProductStore {
    async fn save(&self, cancel: &CancellationToken, product: &NewProduct) -> DbResult<()> {
        validate_new_product(product)?;

        debug!(
            chat_id = product.chat_id,
            product_type = %product.product_type,
            "Saving product"
        );

        ensure_live(cancel, "save")?;

        sqlx::query(
            r#"
            INSERT INTO products (chat_id, name, type, expiration_date, is_expired)
            VALUES (?1, ?2, ?3, ?4, julianday('now') > julianday(?4))
            "#,
        )
        .bind(product.chat_id)
        .bind(&product.name)
        .bind(&product.product_type)
        .bind(product.expiration_date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_all_order_by_exp(
        &self,
        cancel: &CancellationToken,
        expired: bool,
    ) -> DbResult<Vec<Product>> {
        debug!(expired, "Listing products by expiration");

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE is_expired = ?1 \
             ORDER BY julianday(expiration_date) DESC, id DESC"
        );

        self.fetch_products(cancel, "find_all_order_by_exp", sqlx::query(&sql).bind(expired))
            .await
    }

    async fn update(
        &self,
        cancel: &CancellationToken,
        id: i64,
        product: &NewProduct,
    ) -> DbResult<()> {
        validate_new_product(product)?;

        debug!(id, "Updating product");

        ensure_live(cancel, "update")?;

        let result = sqlx::query(
            r#"
            UPDATE products SET
                chat_id = ?2,
                name = ?3,
                type = ?4,
                expiration_date = ?5,
                is_expired = julianday('now') > julianday(?5)
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(product.chat_id)
        .bind(&product.name)
        .bind(&product.product_type)
        .bind(product.expiration_date)
        .execute(&self.pool)
        .await?;

        self.on_missing_row.check(result.rows_affected(), id)
    }

    async fn find_by_expired_time(
        &self,
        cancel: &CancellationToken,
        interval: Duration,
        product_type: &str,
    ) -> DbResult<Vec<Product>> {
        let modifier = seconds_modifier(interval);

        debug!(product_type, %modifier, "Looking ahead for expiring products");

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE type = ?1 \
             AND julianday(expiration_date) <= julianday('now', ?2) \
             ORDER BY julianday(expiration_date) ASC, id ASC"
        );

        self.fetch_products(
            cancel,
            "find_by_expired_time",
            sqlx::query(&sql).bind(product_type).bind(modifier),
        )
        .await
    }

    async fn delete(&self, cancel: &CancellationToken, id: i64) -> DbResult<()> {
        debug!(id, "Deleting product");

        ensure_live(cancel, "delete")?;

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.on_missing_row.check(result.rows_affected(), id)
    }

    async fn set_expired(&self, cancel: &CancellationToken) -> DbResult<u64> {
        ensure_live(cancel, "set_expired")?;

        let result = sqlx::query(
            r#"
            UPDATE products SET is_expired = TRUE
            WHERE julianday('now') > julianday(expiration_date)
            AND is_expired = FALSE
            "#,
        )
        .execute(&self.pool)
        .await?;

        let flipped = result.rows_affected();
        if flipped > 0 {
            info!(flipped, "Marked products as expired");
        } else {
            debug!("Expiry sweep found nothing new");
        }

        Ok(flipped)
    }
}

/// Formats an interval as a SQLite date modifier, e.g. `+5400.250 seconds`.
///
/// Millisecond precision; clamped like the in-memory horizon so the result
/// stays inside the range `julianday()` accepts.
pub(crate) fn seconds_modifier(interval: Duration) -> String {
    let millis = clamp_lookahead(interval).num_milliseconds();
    let sign = if millis < 0 { '-' } else { '+' };
    let abs = millis.unsigned_abs();

    format!("{sign}{}.{:03} seconds", abs / 1000, abs % 1000)
}
