//! Configuration types and parsing for dbtools.yml

use crate::catalog::{MIGRATION_DIRECTORY, SQL_EXTENSION};
use crate::error::{CoreError, CoreResult};
use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration from dbtools.yml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// libpq connection string or URI passed to every client program
    #[serde(default)]
    pub connection: Option<String>,

    /// Root directory holding `data.sql`, `api.sql`, and `migration/`
    #[serde(default = "default_sql_directory")]
    pub sql_directory: PathBuf,

    /// Interactive SQL client used to run scripts
    #[serde(default = "default_client_program")]
    pub client_program: String,

    /// Program used by `dump`
    #[serde(default = "default_dump_program")]
    pub dump_program: String,

    /// Program used by `restore`
    #[serde(default = "default_restore_program")]
    pub restore_program: String,

    /// Schema holding application data and the version marker
    #[serde(default = "default_data_schema")]
    pub data_schema: String,

    /// Schema holding the API surface, rebuilt on every migration
    #[serde(default = "default_api_schema")]
    pub api_schema: String,

    /// Version assumed when the database has never recorded one
    #[serde(default)]
    pub floor_version: Version,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connection: None,
            sql_directory: default_sql_directory(),
            client_program: default_client_program(),
            dump_program: default_dump_program(),
            restore_program: default_restore_program(),
            data_schema: default_data_schema(),
            api_schema: default_api_schema(),
            floor_version: Version::ZERO,
        }
    }
}

/// Config file names searched by [`Config::load_from_dir`], in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["dbtools.yml", "dbtools.yaml"];

const DATA_SCRIPT: &str = "data";
const API_SCRIPT: &str = "api";

fn default_sql_directory() -> PathBuf {
    PathBuf::from("sql")
}

fn default_client_program() -> String {
    "psql".to_string()
}

fn default_dump_program() -> String {
    "pg_dump".to_string()
}

fn default_restore_program() -> String {
    "pg_restore".to_string()
}

fn default_data_schema() -> String {
    "data".to_string()
}

fn default_api_schema() -> String {
    "api".to_string()
}

impl Config {
    /// Load configuration from a file path.
    ///
    /// A relative `sql_directory` is resolved against the directory containing
    /// the file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        if config.sql_directory.is_relative() {
            if let Some(parent) = path.parent() {
                config.sql_directory = parent.join(&config.sql_directory);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory.
    /// Looks for dbtools.yml or dbtools.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }
        Err(CoreError::ConfigNotFound {
            path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if let Some(connection) = &self.connection {
            if connection.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: "connection cannot be empty".to_string(),
                });
            }
        }

        for (key, program) in [
            ("client_program", &self.client_program),
            ("dump_program", &self.dump_program),
            ("restore_program", &self.restore_program),
        ] {
            if program.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("{key} cannot be empty"),
                });
            }
        }

        for (key, schema) in [
            ("data_schema", &self.data_schema),
            ("api_schema", &self.api_schema),
        ] {
            if !is_identifier(schema) {
                return Err(CoreError::ConfigInvalid {
                    message: format!(
                        "{key} '{schema}' must be a lowercase SQL identifier ([a-z_][a-z0-9_]*)"
                    ),
                });
            }
        }

        if self.data_schema == self.api_schema {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "data_schema and api_schema must differ (both are '{}')",
                    self.data_schema
                ),
            });
        }

        Ok(())
    }

    /// The connection string, or an error when none was configured.
    pub fn connection(&self) -> CoreResult<&str> {
        self.connection
            .as_deref()
            .ok_or_else(|| CoreError::ConfigInvalid {
                message: "no database connection configured".to_string(),
            })
    }

    /// Path of the data schema bootstrap script (`data.sql`)
    pub fn data_script(&self) -> PathBuf {
        self.sql_directory
            .join(format!("{DATA_SCRIPT}.{SQL_EXTENSION}"))
    }

    /// Path of the API schema script (`api.sql`)
    pub fn api_script(&self) -> PathBuf {
        self.sql_directory
            .join(format!("{API_SCRIPT}.{SQL_EXTENSION}"))
    }

    /// Directory holding version-named migration scripts
    pub fn migration_directory(&self) -> PathBuf {
        self.sql_directory.join(MIGRATION_DIRECTORY)
    }
}

/// Lowercase identifiers never need quoting in PostgreSQL.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
