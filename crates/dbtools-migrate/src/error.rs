//! Error types for dbtools-migrate

use dbtools_core::{CoreError, Version};
use dbtools_db::DbError;
use dbtools_exec::ExecError;
use std::path::PathBuf;
use thiserror::Error;

/// Migration and lifecycle errors
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Recorded version is newer than the requested target (R001)
    #[error("[R001] Schema version ({current}) is greater than app version ({target}): downgrades are not supported")]
    DowngradeRejected { current: Version, target: Version },

    /// A migration script failed; earlier scripts stay applied (R002)
    #[error("[R002] Migration {version} ({}) failed after {applied} of {planned} scripts were applied: {source}", path.display())]
    ScriptExecutionFailed {
        version: Version,
        path: PathBuf,
        applied: usize,
        planned: usize,
        #[source]
        source: ExecError,
    },

    /// A schema bootstrap script (`data.sql` or `api.sql`) failed (R003)
    #[error("[R003] Script {} failed: {source}", path.display())]
    BootstrapFailed {
        path: PathBuf,
        #[source]
        source: ExecError,
    },

    /// The blocking runtime could not be started (R004)
    #[error("[R004] Failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// Dump, restore, or analyze program failure
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// Configuration, version, or catalog error
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Version store or session error
    #[error(transparent)]
    Store(#[from] DbError),
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;
