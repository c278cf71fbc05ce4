//! Error types for dbtools-db

use dbtools_core::CoreError;
use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Query returned no row or a value of the wrong type (D003)
    #[error("[D003] Unexpected query result: {0}")]
    UnexpectedResult(String),

    /// Recorded schema version is not a valid version (D004)
    #[error("[D004] Recorded schema version is invalid: {0}")]
    InvalidVersion(#[source] CoreError),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<tokio_postgres::Error> for DbError {
    fn from(err: tokio_postgres::Error) -> Self {
        if err.is_closed() {
            DbError::ConnectionError(err.to_string())
        } else {
            match err.as_db_error() {
                Some(db) => DbError::ExecutionError(format!("{}: {}", db.code().code(), db.message())),
                None => DbError::ExecutionError(err.to_string()),
            }
        }
    }
}
