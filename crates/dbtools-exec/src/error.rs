//! Error types for dbtools-exec

use thiserror::Error;

/// A client program that did not finish successfully.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    /// Program ran to completion with a nonzero exit status (X001)
    #[error("[X001] {program} exited with code {status}")]
    AbnormalExit { program: String, status: i32 },

    /// Program was terminated by a signal (X002)
    #[error("[X002] {program} was killed by signal {signal}")]
    Signaled { program: String, signal: i32 },

    /// Program could not be spawned or waited on (X003)
    #[error("[X003] {program} did not succeed: {message}")]
    SupervisorFailure { program: String, message: String },
}

/// Result type alias for ExecError
pub type ExecResult<T> = Result<T, ExecError>;
