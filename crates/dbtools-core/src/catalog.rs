//! Migration script discovery and planning.
//!
//! Migration scripts live in a single flat directory and are named after the
//! version they produce, e.g. `migration/1.3.0.sql`. A plan is the ascending
//! sequence of scripts strictly between the recorded schema version and the
//! target application version.

use crate::error::{CoreError, CoreResult};
use crate::version::Version;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the migrations directory under the SQL root.
pub const MIGRATION_DIRECTORY: &str = "migration";

/// File extension (without the dot) of SQL scripts.
pub const SQL_EXTENSION: &str = "sql";

/// A single version-named migration script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationScript {
    pub version: Version,
    pub path: PathBuf,
}

/// Build the ordered list of scripts to run when moving from `from` to `to`.
///
/// Only scripts with `from < version < to` are returned. A script named after
/// the recorded version has already been applied, and scripts at or beyond
/// the target are left for a later upgrade.
///
/// A missing directory yields an empty plan. Any `.sql` file whose stem is
/// not a valid version fails the whole call, as does a version claimed by two
/// files.
pub fn plan(dir: &Path, from: &Version, to: &Version) -> CoreResult<Vec<MigrationScript>> {
    if from >= to {
        return Ok(Vec::new());
    }

    if !dir.exists() {
        log::debug!(
            "No migrations to run: Directory \"{}\" does not exist",
            dir.display()
        );
        return Ok(Vec::new());
    }

    if !dir.is_dir() {
        return Err(CoreError::NotADirectory {
            path: dir.display().to_string(),
        });
    }

    let io_err = |source: std::io::Error| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();

        if is_sql_file(&path) {
            paths.push(path);
        } else {
            log::debug!("Skipping \"{}\": Not a SQL file", path.display());
        }
    }

    let migrations = index_scripts(paths)?;

    let mut scripts = Vec::new();
    for (version, path) in migrations {
        if version <= *from {
            log::debug!(
                "Skipping \"{}\": Schema version is greater or equal",
                path.display()
            );
        } else if version >= *to {
            log::debug!(
                "Skipping \"{}\": Greater than or equal to target",
                path.display()
            );
        } else {
            log::debug!("Adding \"{}\"", path.display());
            scripts.push(MigrationScript { version, path });
        }
    }

    Ok(scripts)
}

/// Key scripts by the version their stem parses to.
///
/// Fails on the first malformed stem, and on two paths naming one version.
fn index_scripts(paths: Vec<PathBuf>) -> CoreResult<BTreeMap<Version, PathBuf>> {
    let mut migrations = BTreeMap::new();

    for path in paths {
        match migrations.entry(script_version(&path)?) {
            Entry::Vacant(slot) => {
                slot.insert(path);
            }
            Entry::Occupied(existing) => {
                // Report the pair in a stable order regardless of readdir order.
                let mut pair = [existing.get().clone(), path];
                pair.sort();
                return Err(CoreError::DuplicateMigration {
                    version: existing.key().to_string(),
                    first: pair[0].display().to_string(),
                    second: pair[1].display().to_string(),
                });
            }
        }
    }

    Ok(migrations)
}

/// Regular file (symlinks followed) with a `.sql` extension.
fn is_sql_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SQL_EXTENSION)
        && fs::metadata(path).is_ok_and(|meta| meta.is_file())
}

fn script_version(path: &Path) -> CoreResult<Version> {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    Version::parse(&stem)
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
