//! # Database Configuration
//!
//! Pool sizing, connection endpoint and the missing-row policy.
//!
//! Configuration is either built in code or loaded from environment
//! variables with fallback to defaults:
//!
//! | Variable                        | Default                   |
//! |---------------------------------|---------------------------|
//! | `DATABASE_URL`                  | `sqlite://shelflife.db`   |
//! | `DATABASE_MAX_CONNECTIONS`      | `5`                       |
//! | `DATABASE_CONNECT_TIMEOUT_SECS` | `30`                      |
//! | `SHELFLIFE_MISSING_ROW`         | `ignore`                  |

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{DbError, DbResult};

/// Default connection URL when `DATABASE_URL` is unset.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://shelflife.db";

const IN_MEMORY_URL: &str = "sqlite::memory:";

// =============================================================================
// Missing-row policy
// =============================================================================

/// What `update` and `delete` do when the target id matches no row.
///
/// ```text
/// rows_affected == 0
///      │
///      ├── Ignore   → Ok(())                  (default)
///      └── NotFound → Err(DbError::NotFound)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingRowPolicy {
    /// Zero affected rows is success; callers can't tell "deleted" from
    /// "already absent".
    #[default]
    Ignore,
    /// Zero affected rows is reported as `DbError::NotFound`.
    NotFound,
}

impl MissingRowPolicy {
    /// Applies the policy to the outcome of a single-row statement.
    pub fn check(self, rows_affected: u64, id: i64) -> DbResult<()> {
        match self {
            MissingRowPolicy::NotFound if rows_affected == 0 => {
                Err(DbError::not_found("Product", id))
            }
            _ => Ok(()),
        }
    }
}

impl FromStr for MissingRowPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(MissingRowPolicy::Ignore),
            "not_found" | "notfound" | "error" => Ok(MissingRowPolicy::NotFound),
            _ => Err(ConfigError::InvalidValue("SHELFLIFE_MISSING_ROW".to_string())),
        }
    }
}

// =============================================================================
// DbConfig
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("sqlite://data/shelflife.db")
///     .max_connections(5)
///     .on_missing_row(MissingRowPolicy::NotFound);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Connection endpoint, e.g. `sqlite://shelflife.db` or `sqlite::memory:`.
    pub database_url: String,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// How long to wait for a connection before failing.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes. Ignored for in-memory databases.
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,

    /// Zero-rows-affected handling for `update` and `delete`.
    pub on_missing_row: MissingRowPolicy,
}

impl DbConfig {
    /// Creates a configuration for the given connection URL.
    pub fn new(database_url: impl Into<String>) -> Self {
        DbConfig {
            database_url: database_url.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
            on_missing_row: MissingRowPolicy::default(),
        }
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// Every connection to `:memory:` would open a separate database, so the
    /// pool is pinned to one connection that is never recycled.
    pub fn in_memory() -> Self {
        DbConfig {
            database_url: IN_MEMORY_URL.to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
            on_missing_row: MissingRowPolicy::default(),
        }
    }

    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let mut config = DbConfig::new(url);

        if let Some(raw) = lookup("DATABASE_MAX_CONNECTIONS") {
            let max: u32 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS".to_string()))?;
            if max == 0 {
                return Err(ConfigError::InvalidValue(
                    "DATABASE_MAX_CONNECTIONS".to_string(),
                ));
            }
            config = config.max_connections(max);
        }

        if let Some(raw) = lookup("DATABASE_CONNECT_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ConfigError::InvalidValue("DATABASE_CONNECT_TIMEOUT_SECS".to_string())
            })?;
            config = config.connect_timeout(Duration::from_secs(secs));
        }

        if let Some(raw) = lookup("SHELFLIFE_MISSING_ROW") {
            config = config.on_missing_row(raw.parse()?);
        }

        if config.is_in_memory() {
            config.max_connections = 1;
        }
        config.min_connections = config.min_connections.min(config.max_connections);

        Ok(config)
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Sets the zero-rows-affected policy for `update` and `delete`.
    pub fn on_missing_row(mut self, policy: MissingRowPolicy) -> Self {
        self.on_missing_row = policy;
        self
    }

    /// True for `:memory:` URLs.
    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
