//! Restore command implementation

use anyhow::{bail, Context, Result};

use crate::cli::{FileArgs, GlobalArgs};
use crate::commands::common::connect;

/// Execute the restore command
pub async fn execute(args: &FileArgs, global: &GlobalArgs) -> Result<()> {
    if !args.file.is_file() {
        bail!("Archive not found: {}", args.file.display());
    }

    let db = connect(global).await?;

    db.restore(&args.file)
        .await
        .with_context(|| format!("Failed to restore database from {}", args.file.display()))?;

    println!("Restored database from {}", args.file.display());
    Ok(())
}
