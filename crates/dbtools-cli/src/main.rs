//! dbtools CLI - PostgreSQL schema migrations, dumps, and restores

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{dump, init, migrate, reset, restore, status};

/// Install the logger. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match &cli.command {
        cli::Commands::Init(args) => init::execute(args, &cli.global).await,
        cli::Commands::Migrate(args) => migrate::execute(args, &cli.global).await,
        cli::Commands::Reset(args) => reset::execute(args, &cli.global).await,
        cli::Commands::Dump(args) => dump::execute(args, &cli.global).await,
        cli::Commands::Restore(args) => restore::execute(args, &cli.global).await,
        cli::Commands::Status => status::execute(&cli.global).await,
    }
}
