use crate::error::DbError;
use configuration::AppConfig;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgPool, PgPoolOptions, Postgres};
use std::future::Future;
use std::time::Duration;

/// Reported whenever a database call is attempted without a connection string.
pub const MISSING_DATABASE_URL: &str = "DATABASE_URL is not set";

/// Supplies database connections to the repositories.
///
/// The pool is created lazily, so building a provider never touches the
/// network. Each `acquire` hands out a `PoolConnection` guard that goes back to
/// the pool when dropped, on success, error, or a timed-out future alike.
#[derive(Debug, Clone)]
pub struct ConnectionProvider {
    pool: Option<PgPool>,
    deadline: Duration,
}

impl ConnectionProvider {
    /// Builds a provider from the application configuration.
    ///
    /// A missing `database_url` is not an error here: the provider is created
    /// unconfigured and every `acquire` fails with `ConnectionConfigError`. A
    /// connection string that cannot be parsed is rejected immediately.
    pub fn from_config(config: &AppConfig) -> Result<Self, DbError> {
        let deadline = config.query_timeout();

        let Some(database_url) = config.database_url.as_deref() else {
            tracing::warn!("{}; database endpoints will report errors.", MISSING_DATABASE_URL);
            return Ok(Self::unconfigured(deadline));
        };

        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(deadline)
            .connect_lazy(database_url)
            .map_err(|e| DbError::ConnectionConfigError(format!("Invalid DATABASE_URL: {}", e)))?;

        Ok(Self::from_pool(pool, deadline))
    }

    /// Wraps an existing pool.
    pub fn from_pool(pool: PgPool, deadline: Duration) -> Self {
        Self { pool: Some(pool), deadline }
    }

    /// A provider with no connection string; every acquisition fails fast.
    pub fn unconfigured(deadline: Duration) -> Self {
        Self { pool: None, deadline }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Checks out a connection for exclusive use by the caller.
    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>, DbError> {
        let pool = self
            .pool
            .as_ref()
            .ok_or_else(|| DbError::ConnectionConfigError(MISSING_DATABASE_URL.to_string()))?;
        Ok(pool.acquire().await?)
    }

    /// Runs `op` under the configured deadline.
    ///
    /// If the deadline passes, `op` is dropped together with any connection it
    /// holds and `DbError::Timeout` is returned.
    pub async fn with_deadline<T, F>(&self, op: F) -> Result<T, DbError>
    where
        F: Future<Output = Result<T, DbError>>,
    {
        match tokio::time::timeout(self.deadline, op).await {
            Ok(result) => result,
            Err(_) => Err(DbError::Timeout(self.deadline)),
        }
    }
}
