//! Database lifecycle operations.
//!
//! The data schema holds application data and the version marker and is
//! only ever changed by migration scripts. The API schema is disposable: it
//! is dropped before migration scripts run and rebuilt from `api.sql` once
//! they succeed.

use crate::args;
use crate::error::{MigrateError, MigrateResult};
use crate::report::MigrationReport;
use crate::runner::MigrationRunner;
use dbtools_core::{Config, Version};
use dbtools_db::{ddl, SchemaVersionStore, SqlClient};
use dbtools_exec::{ExecError, Executor};
use std::path::Path;

/// A PostgreSQL database managed by dbtools.
pub struct Postgresql<C, E> {
    config: Config,
    connection: String,
    store: SchemaVersionStore<C>,
    executor: E,
}

impl<C: SqlClient, E: Executor> Postgresql<C, E> {
    /// Manage the database reached through `client` and `config.connection`.
    ///
    /// Fails when no connection string is configured, since every client
    /// program needs one.
    pub fn new(config: Config, client: C, executor: E) -> MigrateResult<Self> {
        let connection = config.connection()?.to_string();
        log::debug!(
            "Managing schemas \"{}\" and \"{}\" through the {} client",
            config.data_schema,
            config.api_schema,
            client.db_type()
        );
        let store = SchemaVersionStore::new(client, config.data_schema.clone());
        Ok(Self {
            config,
            connection,
            store,
            executor,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn runner(&self) -> MigrationRunner<'_, C, E> {
        MigrationRunner::new(&self.store, &self.executor, &self.config, &self.connection)
    }

    /// Recorded schema version, if any.
    pub async fn status(&self) -> MigrateResult<Option<Version>> {
        Ok(self.store.read().await?)
    }

    /// Create the data schema, apply `data.sql` and every migration up to
    /// `version`, then build the API schema.
    pub async fn init(&self, version: &Version) -> MigrateResult<MigrationReport> {
        log::info!("Initializing database at version {version}");

        self.execute(&ddl::create_schema(&self.config.data_schema))
            .await?;
        self.run_script(&self.config.data_script()).await?;

        let report = self.runner().run(version).await?;
        self.update(version).await?;
        Ok(report)
    }

    /// Apply pending migrations up to `version` and rebuild the API schema.
    ///
    /// The API schema is dropped before any migration script runs, since its
    /// views and functions may depend on the data objects being changed. A
    /// downgrade is rejected before anything is dropped.
    pub async fn migrate(&self, version: &Version) -> MigrateResult<MigrationReport> {
        let runner = self.runner();
        runner.check_direction(version).await?;

        self.execute(&ddl::drop_schema(&self.config.api_schema))
            .await?;

        let report = runner.run(version).await?;
        log::info!("{report}");
        self.update(version).await?;
        Ok(report)
    }

    /// Drop both schemas and initialize from scratch.
    pub async fn reset(&self, version: &Version) -> MigrateResult<MigrationReport> {
        log::info!("Resetting database");
        self.execute(&ddl::drop_schema(&self.config.api_schema))
            .await?;
        self.execute(&ddl::drop_schema(&self.config.data_schema))
            .await?;
        self.init(version).await
    }

    /// Write a custom-format archive of the database to `file`.
    pub async fn dump(&self, file: &Path) -> MigrateResult<()> {
        let program = self.config.dump_program.as_str();
        self.exec(program, &args::dump(&self.connection, file))
            .await?;
        log::debug!("Saved database dump to: {}", file.display());
        Ok(())
    }

    /// Restore the archive at `file` over the database, then analyze it.
    pub async fn restore(&self, file: &Path) -> MigrateResult<()> {
        let program = self.config.restore_program.as_str();
        self.exec(program, &args::restore(&self.connection, file))
            .await?;
        log::debug!("Restored database from: {}", file.display());

        let program = self.config.client_program.as_str();
        self.exec(program, &args::analyze(&self.connection)).await?;
        Ok(())
    }

    /// Build the API schema from `api.sql` and record `version`.
    async fn update(&self, version: &Version) -> MigrateResult<()> {
        self.execute(&ddl::create_schema(&self.config.api_schema))
            .await?;
        self.run_script(&self.config.api_script()).await?;
        self.store.write(version).await?;
        Ok(())
    }

    async fn execute(&self, sql: &str) -> MigrateResult<()> {
        self.store.client().execute(sql).await?;
        Ok(())
    }

    async fn exec(&self, program: &str, args: &[String]) -> Result<(), ExecError> {
        self.executor
            .execute(program, args)
            .await
            .into_result(program)
    }

    async fn run_script(&self, path: &Path) -> MigrateResult<()> {
        let program = self.config.client_program.as_str();
        self.exec(program, &args::sql_file(&self.connection, path))
            .await
            .map_err(|source| MigrateError::BootstrapFailed {
                path: path.to_path_buf(),
                source,
            })
    }
}

#[cfg(test)]
#[path = "postgresql_test.rs"]
mod tests;
