//! Classification of child process wait statuses.

use crate::error::{ExecError, ExecResult};
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

/// How a child process ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Normal exit with the given status code.
    Exited(i32),
    /// Terminated by the given signal, with or without a core dump.
    Signaled(i32),
    /// The process could not be spawned or its status could not be observed.
    SupervisorFailure(String),
}

impl ProcessOutcome {
    /// Classify a wait status reported by the operating system.
    pub fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            ProcessOutcome::Exited(code)
        } else if let Some(signal) = status.signal() {
            ProcessOutcome::Signaled(signal)
        } else {
            ProcessOutcome::SupervisorFailure(format!(
                "unrecognized wait status {:#x}",
                status.into_raw()
            ))
        }
    }

    /// Returns `true` only for a normal exit with status 0.
    pub fn success(&self) -> bool {
        matches!(self, ProcessOutcome::Exited(0))
    }

    /// Convert into a result, attributing failures to `program`.
    pub fn into_result(self, program: &str) -> ExecResult<()> {
        match self {
            ProcessOutcome::Exited(0) => Ok(()),
            ProcessOutcome::Exited(status) => Err(ExecError::AbnormalExit {
                program: program.to_string(),
                status,
            }),
            ProcessOutcome::Signaled(signal) => Err(ExecError::Signaled {
                program: program.to_string(),
                signal,
            }),
            ProcessOutcome::SupervisorFailure(message) => Err(ExecError::SupervisorFailure {
                program: program.to_string(),
                message,
            }),
        }
    }
}

#[cfg(test)]
#[path = "outcome_test.rs"]
mod tests;
