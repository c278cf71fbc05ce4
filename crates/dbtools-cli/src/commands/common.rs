//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use dbtools_core::{Config, CoreError};
use dbtools_db::PgClient;
use dbtools_exec::SystemExecutor;
use dbtools_migrate::{MigrationReport, Postgresql};
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// The managed database as seen by every command.
pub(crate) type Database = Postgresql<PgClient, SystemExecutor>;

/// Load configuration and apply command-line overrides.
///
/// An explicit `--config` must exist. Otherwise the project directory is
/// searched, and when it holds no config file the defaults are used with
/// `sql/` resolved against the project directory.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    let project_dir = Path::new(&global.project_dir);

    let mut config = match &global.config {
        Some(path) => Config::load(Path::new(path)).context("Failed to load config")?,
        None => match Config::load_from_dir(project_dir) {
            Ok(config) => config,
            Err(CoreError::ConfigNotFound { .. }) => {
                log::debug!(
                    "No config file in {}: using defaults",
                    project_dir.display()
                );
                let mut config = Config::default();
                config.sql_directory = project_dir.join(&config.sql_directory);
                config
            }
            Err(e) => return Err(e).context("Failed to load config"),
        },
    };

    if let Some(connection) = &global.connection {
        config.connection = Some(connection.clone());
    }
    if let Some(sql_directory) = &global.sql_directory {
        config.sql_directory = PathBuf::from(sql_directory);
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Open a session to the configured database.
pub(crate) async fn connect(global: &GlobalArgs) -> Result<Database> {
    let config = load_config(global)?;
    let connection = config.connection().context("Cannot connect")?.to_string();

    let client = PgClient::connect(&connection)
        .await
        .context("Failed to connect to database")?;

    Ok(Postgresql::new(config, client, SystemExecutor)?)
}

/// Print a one-line summary followed by the applied versions.
pub(crate) fn print_report(report: &MigrationReport) {
    println!("{report}");
    for version in report.applied() {
        println!("  applied {version}");
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
