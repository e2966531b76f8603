//! # Database Pool Management
//!
//! Connection pool creation and lifecycle for SQLite.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Process startup                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← connect (fail fast) + migrations        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.products() ──► SqliteProductStore (holds a pool clone)             │
//! │       │                                                                 │
//! │       │  concurrent callers share the pool; SqlitePool is Send + Sync  │
//! │       ▼                                                                 │
//! │  db.close().await ← process shutdown                                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{debug, info};

use crate::config::{DbConfig, MissingRowPolicy};
use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::product::SqliteProductStore;

/// Owned database handle.
///
/// Constructed once at startup and passed to whatever needs a store. There is
/// no global connection.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    on_missing_row: MissingRowPolicy,
}

impl Database {
    /// Creates the connection pool.
    ///
    /// ## What This Does
    /// 1. Parses the connection URL
    /// 2. Configures SQLite (WAL for file databases)
    /// 3. Opens the pool, establishing a first connection
    /// 4. Runs migrations (if enabled)
    ///
    /// ## Returns
    /// * `Err(DbError::ConnectionFailed)` - the endpoint is unreachable.
    ///   This is the only place a connectivity failure is expected to be
    ///   treated as fatal by the caller.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(url = %config.database_url, "Initializing database connection");

        let in_memory = config.is_in_memory();

        let mut connect_options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true);

        if !in_memory {
            connect_options = connect_options.journal_mode(SqliteJournalMode::Wal);
        }

        debug!(in_memory, "Connection options configured");

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout);

        pool_options = if in_memory {
            // dropping the last connection drops the database
            pool_options.idle_timeout(None).max_lifetime(None)
        } else {
            pool_options.idle_timeout(Some(config.idle_timeout))
        };

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database {
            pool,
            on_missing_row: config.on_missing_row,
        };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Runs database migrations. Idempotent.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the product store bound to this pool.
    pub fn products(&self) -> SqliteProductStore {
        SqliteProductStore::new(self.pool.clone(), self.on_missing_row)
    }

    /// Closes the connection pool.
    ///
    /// After calling close, every store operation fails with
    /// `DbError::ConnectionFailed`.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
