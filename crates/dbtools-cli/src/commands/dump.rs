//! Dump command implementation

use anyhow::{Context, Result};

use crate::cli::{FileArgs, GlobalArgs};
use crate::commands::common::connect;

/// Execute the dump command
pub async fn execute(args: &FileArgs, global: &GlobalArgs) -> Result<()> {
    let db = connect(global).await?;

    db.dump(&args.file)
        .await
        .with_context(|| format!("Failed to dump database to {}", args.file.display()))?;

    println!("Saved database dump to {}", args.file.display());
    Ok(())
}
