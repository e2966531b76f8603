//! # Database Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error / ValidationError / cancellation                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ├── fatal: ConnectionFailed, PoolExhausted                       │
//! │       └── statement: everything else, returned to the caller           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use shelflife_core::ValidationError;
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `update`/`delete` touched zero rows under
    ///   [`MissingRowPolicy::NotFound`](crate::MissingRowPolicy::NotFound)
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Database connection failed or was lost.
    ///
    /// ## When This Occurs
    /// - Bad connection URL
    /// - Database file can't be opened or created
    /// - Pool closed after shutdown
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Statement execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A result row could not be mapped to a `Product`.
    #[error("Row decode failed: {0}")]
    Decode(String),

    /// The product was rejected before reaching the database.
    #[error("Invalid product: {0}")]
    Validation(#[from] ValidationError),

    /// The caller's cancellation token fired before a write was sent, or
    /// while a read was in flight.
    #[error("Operation cancelled")]
    Cancelled,

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Connectivity errors: nothing else can succeed until the connection is back.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DbError::ConnectionFailed(_) | DbError::PoolExhausted)
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database        → QueryFailed
/// sqlx::Error::ColumnDecode    → Decode
/// sqlx::Error::PoolTimedOut    → PoolExhausted
/// sqlx::Error::Io / PoolClosed → ConnectionFailed
/// Other                        → Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => DbError::QueryFailed(db_err.message().to_string()),

            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::Decode(_) => DbError::Decode(err.to_string()),

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::Io(_) | sqlx::Error::Configuration(_) => {
                DbError::ConnectionFailed(err.to_string())
            }

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
