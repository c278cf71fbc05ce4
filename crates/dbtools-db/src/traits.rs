//! SQL client trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// The minimal database capability the migration engine needs: run a
/// statement, or run a query and fetch the single scalar it returns.
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait SqlClient: Send + Sync {
    /// Execute one or more statements, discarding any rows
    async fn execute(&self, sql: &str) -> DbResult<()>;

    /// Run a query returning one row with one boolean column
    async fn fetch_bool(&self, sql: &str) -> DbResult<bool>;

    /// Run a query returning one row with one text column
    async fn fetch_text(&self, sql: &str) -> DbResult<String>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
