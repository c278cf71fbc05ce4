//! Migration runner.
//!
//! Reads the recorded version, plans the scripts strictly between it and the
//! target, and runs them one at a time through the SQL client. After each
//! script succeeds the store is advanced to that script's version, and the
//! last one records the target itself, so an interrupted run resumes where
//! it stopped.

use crate::args;
use crate::error::{MigrateError, MigrateResult};
use crate::report::MigrationReport;
use dbtools_core::{catalog, Config, Version};
use dbtools_db::{ddl, SchemaVersionStore, SqlClient};
use dbtools_exec::Executor;

/// Runs pending migration scripts against one database.
pub struct MigrationRunner<'a, C, E> {
    store: &'a SchemaVersionStore<C>,
    executor: &'a E,
    config: &'a Config,
    connection: &'a str,
}

impl<'a, C: SqlClient, E: Executor> MigrationRunner<'a, C, E> {
    pub fn new(
        store: &'a SchemaVersionStore<C>,
        executor: &'a E,
        config: &'a Config,
        connection: &'a str,
    ) -> Self {
        Self {
            store,
            executor,
            config,
            connection,
        }
    }

    /// Recorded version, or the configured floor when none was ever written.
    pub async fn current(&self) -> MigrateResult<Version> {
        Ok(self
            .store
            .read()
            .await?
            .unwrap_or_else(|| self.config.floor_version.clone()))
    }

    /// Read the current version and reject `target` if it is older.
    pub async fn check_direction(&self, target: &Version) -> MigrateResult<Version> {
        let current = self.current().await?;

        if current > *target {
            return Err(MigrateError::DowngradeRejected {
                current,
                target: target.clone(),
            });
        }

        Ok(current)
    }

    /// Bring the recorded version up to `target`.
    ///
    /// Returns [`MigrationReport::UpToDate`] without touching anything when
    /// the recorded version already equals `target`, and rejects targets
    /// older than the recorded version before any script runs.
    pub async fn run(&self, target: &Version) -> MigrateResult<MigrationReport> {
        let set_search_path = ddl::set_search_path(self.store.schema());
        self.store.client().execute(&set_search_path).await?;

        let current = self.check_direction(target).await?;

        if current == *target {
            log::debug!("Schema version and app version are equal: Nothing to migrate");
            return Ok(MigrationReport::UpToDate { version: current });
        }

        let scripts = catalog::plan(&self.config.migration_directory(), &current, target)?;

        if scripts.is_empty() {
            log::debug!("No migrations to run");
        } else {
            log::debug!(
                "Running {} migration{}",
                scripts.len(),
                if scripts.len() == 1 { "" } else { "s" }
            );
        }

        let program = self.config.client_program.as_str();
        let planned = scripts.len();
        let mut applied = Vec::with_capacity(planned);

        for (index, script) in scripts.iter().enumerate() {
            log::info!("Migrate {}", script.version);

            let args = args::migration(self.connection, &set_search_path, &script.path);
            self.executor
                .execute(program, &args)
                .await
                .into_result(program)
                .map_err(|source| MigrateError::ScriptExecutionFailed {
                    version: script.version.clone(),
                    path: script.path.clone(),
                    applied: index,
                    planned,
                    source,
                })?;

            let checkpoint = if index + 1 == planned {
                target
            } else {
                &script.version
            };
            self.store.write(checkpoint).await?;
            applied.push(script.version.clone());
        }

        if scripts.is_empty() {
            self.store.write(target).await?;
        }

        Ok(MigrationReport::Migrated {
            from: current,
            to: target.clone(),
            applied,
        })
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
