//! dbtools-db - Database layer for dbtools
//!
//! This crate provides the `SqlClient` trait, a PostgreSQL implementation
//! on tokio-postgres, and the `SchemaVersionStore` that persists the applied
//! schema version inside the target database.

pub mod ddl;
pub mod error;
#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod postgres;
pub mod store;
pub mod traits;

pub use error::{DbError, DbResult};
#[cfg(any(test, feature = "testing"))]
pub use memory::MemoryClient;
pub use postgres::PgClient;
pub use store::SchemaVersionStore;
pub use traits::SqlClient;
