//! Reset command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, VersionArgs};
use crate::commands::common::{connect, print_report};

/// Execute the reset command
pub async fn execute(args: &VersionArgs, global: &GlobalArgs) -> Result<()> {
    let db = connect(global).await?;

    let config = db.config();
    log::warn!(
        "Dropping schemas \"{}\" and \"{}\" with all their data",
        config.api_schema,
        config.data_schema
    );

    let report = db
        .reset(&args.version)
        .await
        .context("Failed to reset database")?;

    print_report(&report);
    Ok(())
}
