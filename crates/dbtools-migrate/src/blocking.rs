//! Synchronous facade over [`Postgresql`].
//!
//! Drives every operation on a private current-thread runtime, so each call
//! blocks the calling thread until the database and any client program are
//! done.

use crate::error::{MigrateError, MigrateResult};
use crate::postgresql::Postgresql;
use crate::report::MigrationReport;
use dbtools_core::{Config, Version};
use dbtools_db::{PgClient, SqlClient};
use dbtools_exec::{BlockingExecutor, Executor};
use std::path::Path;
use tokio::runtime::{Builder, Runtime};

/// Blocking handle to a managed database.
pub struct BlockingPostgresql<C, E> {
    // Dropped before the runtime that drives its session.
    inner: Postgresql<C, E>,
    runtime: Runtime,
}

fn runtime() -> MigrateResult<Runtime> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(MigrateError::Runtime)
}

impl BlockingPostgresql<PgClient, BlockingExecutor> {
    /// Open a session to `config.connection` and run real client programs
    /// on the calling thread.
    pub fn connect(config: Config) -> MigrateResult<Self> {
        let runtime = runtime()?;
        let connection = config.connection()?.to_string();
        let client = runtime.block_on(PgClient::connect(&connection))?;
        let inner = Postgresql::new(config, client, BlockingExecutor)?;
        Ok(Self { inner, runtime })
    }
}

impl<C: SqlClient, E: Executor> BlockingPostgresql<C, E> {
    pub fn new(config: Config, client: C, executor: E) -> MigrateResult<Self> {
        Ok(Self {
            inner: Postgresql::new(config, client, executor)?,
            runtime: runtime()?,
        })
    }

    pub fn status(&self) -> MigrateResult<Option<Version>> {
        self.runtime.block_on(self.inner.status())
    }

    pub fn init(&self, version: &Version) -> MigrateResult<MigrationReport> {
        self.runtime.block_on(self.inner.init(version))
    }

    pub fn migrate(&self, version: &Version) -> MigrateResult<MigrationReport> {
        self.runtime.block_on(self.inner.migrate(version))
    }

    pub fn reset(&self, version: &Version) -> MigrateResult<MigrationReport> {
        self.runtime.block_on(self.inner.reset(version))
    }

    pub fn dump(&self, file: &Path) -> MigrateResult<()> {
        self.runtime.block_on(self.inner.dump(file))
    }

    pub fn restore(&self, file: &Path) -> MigrateResult<()> {
        self.runtime.block_on(self.inner.restore(file))
    }
}
