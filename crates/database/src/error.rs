use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    /// The connection string is missing or unusable. No network call was made.
    #[error("{0}")]
    ConnectionConfigError(String),

    #[error("Database query failed: {0}")]
    QueryError(#[from] sqlx::Error),

    #[error("Database call did not complete within {0:?}")]
    Timeout(Duration),
}

impl DbError {
    /// The database could not be reached in time, as opposed to rejecting the query.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            DbError::Timeout(_) | DbError::QueryError(sqlx::Error::PoolTimedOut)
        )
    }
}
