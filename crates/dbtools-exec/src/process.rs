//! Spawning client programs.
//!
//! Every child is started with an argument vector of exactly
//! `[program] + args` (no shell, no globbing) and with an empty signal mask,
//! so a mask inherited from the async runtime's threads never leaks into
//! `psql` or `pg_dump`.
//!
//! Two shapes are provided: [`run_blocking`] for synchronous callers, and
//! [`spawn`] / [`run`] for async tasks. In the async shape the child handle is
//! owned by a detached reaper task, so dropping the waiting future never
//! leaves a zombie behind.

use crate::outcome::ProcessOutcome;
use std::io;
use std::os::unix::process::CommandExt;
use std::process::Command;
use tokio::sync::oneshot;

/// Build the command for `program` with verbatim arguments.
fn command<S: AsRef<str>>(program: &str, args: &[S]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args.iter().map(AsRef::as_ref));

    // SAFETY: the hook runs in the forked child before exec and only calls
    // sigemptyset/sigprocmask, both async-signal-safe.
    unsafe {
        cmd.pre_exec(reset_signal_mask);
    }

    cmd
}

fn reset_signal_mask() -> io::Result<()> {
    // SAFETY: `signals` is a valid, initialized sigset_t for both calls.
    unsafe {
        let mut signals: libc::sigset_t = std::mem::zeroed();
        libc::sigemptyset(&mut signals);
        if libc::sigprocmask(libc::SIG_SETMASK, &signals, std::ptr::null_mut()) != 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

fn log_exec<S: AsRef<str>>(program: &str, args: &[S]) {
    if log::log_enabled!(log::Level::Debug) {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        log::debug!("EXEC {} {}", program, args.join(" "));
    }
}

fn log_outcome(program: &str, outcome: &ProcessOutcome) {
    match outcome {
        ProcessOutcome::Exited(code) => log::debug!("{program} exited with code {code}"),
        ProcessOutcome::Signaled(signal) => {
            log::debug!("{program} was killed by signal {signal}")
        }
        ProcessOutcome::SupervisorFailure(message) => log::debug!("{program}: {message}"),
    }
}

/// Run `program` and block the calling thread until it exits.
pub fn run_blocking<S: AsRef<str>>(program: &str, args: &[S]) -> ProcessOutcome {
    log_exec(program, args);

    let outcome = match command(program, args).status() {
        Ok(status) => ProcessOutcome::from_status(status),
        Err(e) => ProcessOutcome::SupervisorFailure(e.to_string()),
    };

    log_outcome(program, &outcome);
    outcome
}

/// A child process whose exit is being observed by a reaper task.
#[derive(Debug)]
pub struct RunningProcess {
    program: String,
    pid: Option<u32>,
    outcome: oneshot::Receiver<ProcessOutcome>,
}

impl RunningProcess {
    /// OS process id of the child, if it was still known at spawn time.
    pub fn id(&self) -> Option<u32> {
        self.pid
    }

    /// Suspend the calling task until the child has been reaped.
    pub async fn wait(self) -> ProcessOutcome {
        let outcome = self.outcome.await.unwrap_or_else(|_| {
            ProcessOutcome::SupervisorFailure(
                "reaper task ended without reporting an exit status".to_string(),
            )
        });
        log_outcome(&self.program, &outcome);
        outcome
    }
}

/// Start `program` and hand its child handle to a reaper task.
///
/// Must be called from within a Tokio runtime. The reaper waits for the child
/// whether or not the returned [`RunningProcess`] is ever awaited.
pub fn spawn<S: AsRef<str>>(program: &str, args: &[S]) -> io::Result<RunningProcess> {
    log_exec(program, args);

    let mut child = tokio::process::Command::from(command(program, args)).spawn()?;
    let pid = child.id();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let outcome = match child.wait().await {
            Ok(status) => ProcessOutcome::from_status(status),
            Err(e) => ProcessOutcome::SupervisorFailure(e.to_string()),
        };
        // The receiver is gone when the waiting task was cancelled.
        let _ = tx.send(outcome);
    });

    Ok(RunningProcess {
        program: program.to_string(),
        pid,
        outcome: rx,
    })
}

/// Run `program` and suspend the calling task until it exits.
pub async fn run<S: AsRef<str>>(program: &str, args: &[S]) -> ProcessOutcome {
    match spawn(program, args) {
        Ok(process) => process.wait().await,
        Err(e) => {
            let outcome = ProcessOutcome::SupervisorFailure(e.to_string());
            log_outcome(program, &outcome);
            outcome
        }
    }
}
