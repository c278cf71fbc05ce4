//! Outcome of a successful migration run.

use dbtools_core::Version;
use std::fmt;

/// What a migration run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationReport {
    /// Recorded version already equalled the target; nothing ran.
    UpToDate { version: Version },
    /// The recorded version moved from `from` to `to`.
    Migrated {
        from: Version,
        to: Version,
        /// Versions of the scripts that ran, in order. May be empty.
        applied: Vec<Version>,
    },
}

impl MigrationReport {
    /// Version recorded after the run.
    pub fn version(&self) -> &Version {
        match self {
            MigrationReport::UpToDate { version } => version,
            MigrationReport::Migrated { to, .. } => to,
        }
    }

    /// Scripts applied by the run.
    pub fn applied(&self) -> &[Version] {
        match self {
            MigrationReport::UpToDate { .. } => &[],
            MigrationReport::Migrated { applied, .. } => applied,
        }
    }

    pub fn is_up_to_date(&self) -> bool {
        matches!(self, MigrationReport::UpToDate { .. })
    }
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationReport::UpToDate { version } => {
                write!(f, "Schema is up to date at {version}")
            }
            MigrationReport::Migrated { from, to, applied } => {
                write!(
                    f,
                    "Migrated schema from {from} to {to} ({} script{} applied)",
                    applied.len(),
                    if applied.len() == 1 { "" } else { "s" }
                )
            }
        }
    }
}
