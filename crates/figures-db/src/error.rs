//! # Database Errors
//!
//! What can go wrong below the port traits, and how it is reported above
//! them.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  sqlx::Error / MigrateError / serde_json::Error                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError          classified by sqlx ErrorKind, not by message text     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CoreError::Storage ──► OrderError::Persistence (PERSISTENCE_ERROR)     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Domain outcomes (insufficient stock, a would-be negative level) never
//! pass through `DbError`; the repositories return the matching
//! `CoreError` variant directly.

use figures_core::CoreError;
use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// A row with the same key is already stored, e.g. an order saved twice.
    #[error("{target} is already stored")]
    Duplicate { target: String },

    /// CHECK or FOREIGN KEY rejected the write.
    #[error("constraint rejected write: {0}")]
    Constraint(String),

    /// The database file could not be opened, or the pool is closed.
    #[error("database unavailable: {0}")]
    Unavailable(String),

    /// No connection became free within the acquire timeout.
    #[error("timed out waiting for a database connection")]
    Busy,

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("query failed: {0}")]
    Query(String),

    /// BEGIN, COMMIT or ROLLBACK failed.
    #[error("transaction failed: {0}")]
    Transaction(String),

    /// Measurements could not be written as JSON.
    #[error("cannot encode measurements: {0}")]
    Encoding(#[from] serde_json::Error),

    /// A stored row cannot be turned back into a domain value.
    #[error("stored data is corrupt: {0}")]
    Corrupt(String),
}

impl DbError {
    /// For `.map_err` on `begin`/`commit`/`rollback`.
    pub fn transaction(err: sqlx::Error) -> Self {
        DbError::Transaction(err.to_string())
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation => DbError::Duplicate {
                    target: db_err.message().to_string(),
                },
                ErrorKind::ForeignKeyViolation | ErrorKind::CheckViolation => {
                    DbError::Constraint(db_err.message().to_string())
                }
                _ => DbError::Query(db_err.message().to_string()),
            },
            sqlx::Error::PoolTimedOut => DbError::Busy,
            sqlx::Error::PoolClosed => DbError::Unavailable("pool is closed".into()),
            sqlx::Error::Io(io) => DbError::Unavailable(io.to_string()),
            other => DbError::Query(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration(err.to_string())
    }
}

impl From<DbError> for CoreError {
    fn from(err: DbError) -> Self {
        CoreError::Storage(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_becomes_storage() {
        let err: CoreError = DbError::Busy.into();
        match err {
            CoreError::Storage(msg) => assert!(msg.contains("timed out")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_pool_closed_is_unavailable() {
        let err = DbError::from(sqlx::Error::PoolClosed);
        assert!(matches!(err, DbError::Unavailable(_)));
    }

    #[test]
    fn test_duplicate_message() {
        let err = DbError::Duplicate {
            target: "order 42".into(),
        };
        assert_eq!(err.to_string(), "order 42 is already stored");
    }
}
