//! Init command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, VersionArgs};
use crate::commands::common::{connect, print_report};

/// Execute the init command
pub async fn execute(args: &VersionArgs, global: &GlobalArgs) -> Result<()> {
    let db = connect(global).await?;

    let report = db.init(&args.version).await.context("Failed to initialize database")?;

    print_report(&report);
    Ok(())
}
