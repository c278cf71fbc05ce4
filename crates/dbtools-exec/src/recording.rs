//! Recording [`Executor`] for tests.
//!
//! Never spawns anything. Each call is recorded and answered with
//! `Exited(0)` unless a failure rule matches one of its arguments.

use crate::executor::Executor;
use crate::outcome::ProcessOutcome;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

/// One recorded program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Value following `flag` in the argument list, e.g. the `--file` path.
    pub fn arg_after(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}

#[derive(Debug, Default)]
struct RecordingState {
    invocations: Vec<Invocation>,
    failures: Vec<(String, ProcessOutcome)>,
}

/// Shared-state fake executor. Clones record into the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingExecutor {
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer any invocation with an argument containing `fragment` with `outcome`.
    pub fn fail_when(&self, fragment: &str, outcome: ProcessOutcome) {
        self.lock().failures.push((fragment.to_string(), outcome));
    }

    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.lock().invocations.clone()
    }

    /// `--file` arguments of every invocation, in order.
    pub fn files(&self) -> Vec<String> {
        self.lock()
            .invocations
            .iter()
            .filter_map(|i| i.arg_after("--file").map(str::to_string))
            .collect()
    }

    pub fn clear(&self) {
        self.lock().invocations.clear();
    }

    fn lock(&self) -> MutexGuard<'_, RecordingState> {
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl Executor for RecordingExecutor {
    async fn execute(&self, program: &str, args: &[String]) -> ProcessOutcome {
        let mut state = self.lock();
        state.invocations.push(Invocation {
            program: program.to_string(),
            args: args.to_vec(),
        });
        state
            .failures
            .iter()
            .find(|(fragment, _)| args.iter().any(|a| a.contains(fragment.as_str())))
            .map(|(_, outcome)| outcome.clone())
            .unwrap_or(ProcessOutcome::Exited(0))
    }
}
