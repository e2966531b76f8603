//! Row → `Product` mapping.
//!
//! Columns are read by position in the order every SELECT lists them:
//! `id, chat_id, name, type, expiration_date`. The `is_expired` flag is never
//! selected.

use shelflife_core::Product;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::error::DbResult;

/// Column list shared by every product SELECT.
pub const PRODUCT_COLUMNS: &str = "id, chat_id, name, type, expiration_date";

/// Maps a single row.
pub fn map_row(row: &SqliteRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: row.try_get(0)?,
        chat_id: row.try_get(1)?,
        name: row.try_get(2)?,
        product_type: row.try_get(3)?,
        expiration_date: row.try_get(4)?,
    })
}

/// Maps a result set. The first scan failure discards everything mapped so far.
pub fn map_rows(rows: &[SqliteRow]) -> DbResult<Vec<Product>> {
    let products = rows.iter().map(map_row).collect::<Result<Vec<_>, _>>()?;
    Ok(products)
}
