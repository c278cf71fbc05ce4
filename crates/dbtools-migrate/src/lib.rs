//! dbtools-migrate - Migration engine for dbtools
//!
//! Brings a PostgreSQL database from its recorded schema version up to the
//! version the application expects by running version-named SQL scripts
//! through the SQL client program, and wraps that in the init, migrate,
//! reset, dump, and restore lifecycle operations.

pub mod args;
pub mod blocking;
pub mod error;
pub mod postgresql;
pub mod report;
pub mod runner;

pub use blocking::BlockingPostgresql;
pub use error::{MigrateError, MigrateResult};
pub use postgresql::Postgresql;
pub use report::MigrationReport;
pub use runner::MigrationRunner;
