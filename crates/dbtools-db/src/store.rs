//! Schema version store.
//!
//! The applied version lives inside the target database as an immutable
//! function `<schema>.schema_version()` returning text. Whether the function
//! exists and what it returns are read separately, so a fresh schema reads
//! as "no version" rather than as an error.

use crate::ddl;
use crate::error::{DbError, DbResult};
use crate::traits::SqlClient;
use dbtools_core::Version;

/// Reads and writes the version marker in one schema through one client.
pub struct SchemaVersionStore<C> {
    client: C,
    schema: String,
}

impl<C: SqlClient> SchemaVersionStore<C> {
    /// Create a store for the marker in `schema`.
    pub fn new(client: C, schema: impl Into<String>) -> Self {
        Self {
            client,
            schema: schema.into(),
        }
    }

    /// Borrow the underlying client for statements outside the marker.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Schema holding the marker.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Read the recorded version, or `None` if no version was ever written.
    pub async fn read(&self) -> DbResult<Option<Version>> {
        let exists = self
            .client
            .fetch_bool(&ddl::version_exists(&self.schema))
            .await?;

        if !exists {
            log::debug!("No schema version recorded in \"{}\"", self.schema);
            return Ok(None);
        }

        let text = self
            .client
            .fetch_text(&ddl::select_version(&self.schema))
            .await?;

        Version::parse(&text)
            .map(Some)
            .map_err(DbError::InvalidVersion)
    }

    /// Record `version` so that a subsequent [`read`](Self::read) returns it.
    pub async fn write(&self, version: &Version) -> DbResult<()> {
        log::debug!("Recording schema version {version}");
        self.client
            .execute(&ddl::replace_version(&self.schema, &version.to_string()))
            .await
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
