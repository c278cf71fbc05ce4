//! Status command implementation

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use crate::commands::common::connect;

/// Execute the status command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let db = connect(global).await?;

    match db.status().await.context("Failed to read schema version")? {
        Some(version) => println!("Schema version: {version}"),
        None => println!("No schema version recorded"),
    }
    Ok(())
}
