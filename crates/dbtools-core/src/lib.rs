//! dbtools-core - Core library for dbtools
//!
//! This crate provides the version type, migration script discovery and
//! planning, and configuration parsing shared by every dbtools component.

pub mod catalog;
pub mod config;
pub mod error;
pub mod version;

pub use catalog::{plan, MigrationScript};
pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use version::Version;
