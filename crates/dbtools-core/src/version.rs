//! Semantic version value type.
//!
//! A [`Version`] wraps [`semver::Version`] and follows its precedence rules:
//! the numeric core is compared first, and a pre-release sorts before the
//! release it precedes. Build metadata is rejected because it takes no part
//! in precedence, so two distinct strings could otherwise name one schema.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// A totally ordered application or schema version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Version(semver::Version);

impl Version {
    /// `0.0.0`, the version of a schema that has never recorded one.
    pub const ZERO: Version = Version::new(0, 0, 0);

    /// Create a release version with no pre-release suffix.
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(semver::Version::new(major, minor, patch))
    }

    /// Parse a version string such as `1.2.3` or `1.2.3-beta.2`.
    pub fn parse(input: &str) -> CoreResult<Self> {
        let version = semver::Version::parse(input).map_err(|source| CoreError::VersionParse {
            input: input.to_string(),
            source,
        })?;

        if !version.build.is_empty() {
            return Err(CoreError::BuildMetadata {
                input: input.to_string(),
            });
        }

        Ok(Self(version))
    }

    /// Returns `true` when the version carries a pre-release suffix.
    pub fn is_prerelease(&self) -> bool {
        !self.0.pre.is_empty()
    }
}

impl Deref for Version {
    type Target = semver::Version;

    fn deref(&self) -> &semver::Version {
        &self.0
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Version {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let version = semver::Version::deserialize(deserializer)?;
        if !version.build.is_empty() {
            return Err(serde::de::Error::custom(format!(
                "version '{version}' must not carry build metadata"
            )));
        }
        Ok(Self(version))
    }
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
