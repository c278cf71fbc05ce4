//! Error types for dbtools-core

use thiserror::Error;

/// Core error type for dbtools
#[derive(Error, Debug)]
pub enum CoreError {
    /// V001: Malformed version string
    #[error("[V001] Invalid version '{input}': {source}")]
    VersionParse {
        input: String,
        #[source]
        source: semver::Error,
    },

    /// V002: Two migration scripts resolve to the same version
    #[error("[V002] Duplicate migration version {version}: '{first}' and '{second}'")]
    DuplicateMigration {
        version: String,
        first: String,
        second: String,
    },

    /// V003: Migration path exists but is not a directory
    #[error("[V003] {path}: Not a directory")]
    NotADirectory { path: String },

    /// V004: Version carries build metadata, which has no precedence
    #[error("[V004] Invalid version '{input}': build metadata is not allowed")]
    BuildMetadata { input: String },

    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: IO error with file path context
    #[error("[E003] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
