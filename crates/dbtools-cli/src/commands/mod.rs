//! CLI command implementations

pub(crate) mod common;
pub(crate) mod dump;
pub(crate) mod init;
pub(crate) mod migrate;
pub(crate) mod reset;
pub(crate) mod restore;
pub(crate) mod status;
