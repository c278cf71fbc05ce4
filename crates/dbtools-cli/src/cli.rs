//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};
use dbtools_core::Version;
use std::path::PathBuf;

/// dbtools - PostgreSQL schema migrations, dumps, and restores
#[derive(Parser, Debug)]
#[command(name = "dbtools")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output (debug logging unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory searched for dbtools.yml
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override database connection string
    #[arg(short = 'd', long, global = true, env = "DBTOOLS_CONNECTION")]
    pub connection: Option<String>,

    /// Override directory holding data.sql, api.sql, and migration/
    #[arg(short, long, global = true)]
    pub sql_directory: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the schemas of a fresh database and migrate it to a version
    Init(VersionArgs),

    /// Apply pending migrations up to a version
    Migrate(VersionArgs),

    /// Drop all schemas and initialize again
    Reset(VersionArgs),

    /// Save the database to an archive file
    Dump(FileArgs),

    /// Replace the database contents with an archive file
    Restore(FileArgs),

    /// Show the recorded schema version
    Status,
}

/// Arguments for commands that target an application version
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Application version the schema should be brought to (e.g. 1.4.0)
    pub version: Version,
}

/// Arguments for commands that read or write an archive
#[derive(Args, Debug)]
pub struct FileArgs {
    /// Archive path
    pub file: PathBuf,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
