//! dbtools-exec - Process execution layer for dbtools
//!
//! Spawns the SQL client, dump, and restore programs, waits for them, and
//! classifies how they ended. Unix only.

pub mod error;
pub mod executor;
pub mod outcome;
pub mod process;
#[cfg(any(test, feature = "testing"))]
pub mod recording;

pub use error::{ExecError, ExecResult};
pub use executor::{BlockingExecutor, Executor, SystemExecutor};
pub use outcome::ProcessOutcome;
pub use process::{run, run_blocking, spawn, RunningProcess};
#[cfg(any(test, feature = "testing"))]
pub use recording::{Invocation, RecordingExecutor};
