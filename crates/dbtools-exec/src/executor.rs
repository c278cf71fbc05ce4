//! Executor trait definition

use crate::outcome::ProcessOutcome;
use crate::process;
use async_trait::async_trait;

/// Runs external client programs on behalf of the migration engine.
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Run `program` with verbatim `args` and report how it ended.
    async fn execute(&self, program: &str, args: &[String]) -> ProcessOutcome;
}

/// Executor that spawns real OS processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

#[async_trait]
impl Executor for SystemExecutor {
    async fn execute(&self, program: &str, args: &[String]) -> ProcessOutcome {
        process::run(program, args).await
    }
}

/// Executor that runs each program on the calling thread.
///
/// For callers that are synchronous anyway, such as a facade driving a
/// current-thread runtime with `block_on`. Never use it on a runtime that
/// has other work to make progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockingExecutor;

#[async_trait]
impl Executor for BlockingExecutor {
    async fn execute(&self, program: &str, args: &[String]) -> ProcessOutcome {
        process::run_blocking(program, args)
    }
}
