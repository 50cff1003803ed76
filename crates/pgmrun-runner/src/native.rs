use std::future;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Instant;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;
use tokio::time::{self, timeout};
use tracing::{debug, error, info, warn};

use crate::platform::{self, ProcessTree};
use crate::process::{ProcessRunner, RunnerOptions};
use crate::{CommandInvocation, CommandOutcome, CommandStatus, FailureCause};

// ============================================================================
// NativeRunner - Bounded Native Process Execution
// ============================================================================

/// Native process runner driving `tokio::process` on a current-thread runtime.
///
/// Both standard streams of the child are attached to the write end of a single
/// pipe, so the captured output keeps the order in which the process wrote it.
/// The wait for the child is raced against the deadline with
/// `tokio::time`. On timeout the child's process group receives SIGTERM, then
/// SIGKILL after [`RunnerOptions::kill_grace`]. On Windows the child runs in a
/// job object and the whole job is terminated.
///
/// `run` builds its own runtime, so it must not be called from async code.
///
/// # Example
///
/// ```rust,no_run
/// use pgmrun_runner::{CommandInvocation, CommandSpec, NativeRunner, ProcessRunner};
/// use std::time::Duration;
///
/// let runner = NativeRunner::new();
/// let invocation = CommandInvocation::new(CommandSpec::new("echo").arg("hello"))
///     .with_timeout(Some(Duration::from_secs(30)));
///
/// let outcome = runner.run(&invocation);
/// assert!(outcome.status.is_success());
/// assert_eq!(outcome.output_string(), "hello\n");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRunner {
    options: RunnerOptions,
}

/// How the wait for the child ended.
enum Completion {
    Exited(ExitStatus),
    WaitFailed(io::Error),
    TimedOut,
}

impl NativeRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_options(options: RunnerOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> RunnerOptions {
        self.options
    }

    async fn execute(&self, invocation: &CommandInvocation, started: Instant) -> CommandOutcome {
        let spec = &invocation.command;
        let spawn_failure = |err: io::Error| {
            CommandOutcome::failed(
                FailureCause::Spawn {
                    program: spec.program.to_string_lossy().into_owned(),
                    reason: err.to_string(),
                },
                started.elapsed(),
            )
        };

        let (reader, writer) = match io::pipe() {
            Ok(pair) => pair,
            Err(err) => return spawn_failure(err),
        };
        let stderr_writer = match writer.try_clone() {
            Ok(w) => w,
            Err(err) => return spawn_failure(err),
        };
        let mut pipe = match platform::output_pipe(reader) {
            Ok(pipe) => pipe,
            Err(err) => return spawn_failure(err),
        };

        let mut command = spec.to_tokio_command();
        command
            .stdin(Stdio::null())
            .stdout(writer)
            .stderr(stderr_writer);
        platform::isolate(&mut command);

        let spawned = command.spawn();
        // The Command still owns the parent's copies of the write end; EOF only
        // arrives once they are closed.
        drop(command);
        let mut child = match spawned {
            Ok(child) => child,
            Err(err) => return spawn_failure(err),
        };
        let tree = ProcessTree::attach(&child);

        let deadline = invocation
            .timeout
            .and_then(|t| started.checked_add(t))
            .map(time::Instant::from_std);

        let mut output = Vec::new();
        let completion = {
            let reading = read_until_eof(&mut pipe, &mut output);
            tokio::pin!(reading);
            let mut drained = false;

            let exited = loop {
                tokio::select! {
                    status = child.wait() => break Some(status),
                    () = &mut reading, if !drained => drained = true,
                    () = until(deadline) => break None,
                }
            };

            match exited {
                Some(Ok(status)) => {
                    if !drained {
                        drained = tokio::select! {
                            () = &mut reading => true,
                            () = until(deadline) => false,
                        };
                    }
                    if !drained {
                        // Leftover descendants still hold the pipe past the deadline
                        warn!(command = %invocation, "descendants outlived the deadline, terminating group");
                        tree.force_kill();
                        let _ = timeout(self.options.drain_timeout, &mut reading).await;
                    }
                    Completion::Exited(status)
                }
                Some(Err(err)) => {
                    tree.force_kill();
                    Completion::WaitFailed(err)
                }
                None => {
                    self.terminate(&tree, &mut child).await;
                    if !drained {
                        let _ = timeout(self.options.drain_timeout, &mut reading).await;
                    }
                    Completion::TimedOut
                }
            }
        };

        match completion {
            Completion::Exited(status) => {
                CommandOutcome::completed(output, status.code(), started.elapsed())
            }
            Completion::WaitFailed(err) => CommandOutcome::failed(
                FailureCause::Wait {
                    reason: err.to_string(),
                },
                started.elapsed(),
            ),
            Completion::TimedOut => CommandOutcome::timed_out(output, started.elapsed()),
        }
    }

    /// Stop a timed-out child: SIGTERM, grace period, then SIGKILL to the group.
    ///
    /// SIGKILL is sent even when the leader exits during the grace period, so
    /// descendants that ignored SIGTERM do not outlive the run.
    async fn terminate(&self, tree: &ProcessTree, child: &mut Child) {
        let reaped = platform::GRACEFUL_STOP && {
            tree.request_stop();
            timeout(self.options.kill_grace, child.wait()).await.is_ok()
        };
        tree.force_kill();
        if !reaped {
            let _ = child.wait().await;
        }
    }
}

/// Resolves at `deadline`, or never without one.
async fn until(deadline: Option<time::Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => future::pending().await,
    }
}

/// Append everything read from `pipe` to `output` until EOF or a read error.
///
/// Cancelling the future keeps the bytes read so far.
async fn read_until_eof<R: AsyncRead + Unpin>(pipe: &mut R, output: &mut Vec<u8>) {
    let mut chunk = vec![0u8; 8192];
    loop {
        match pipe.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => output.extend_from_slice(&chunk[..n]),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                debug!(%err, "output pipe read failed");
                break;
            }
        }
    }
}

fn log_outcome(invocation: &CommandInvocation, outcome: &CommandOutcome) {
    match &outcome.status {
        CommandStatus::Failed(cause) => {
            error!(command = %invocation, %cause, "command failed");
        }
        CommandStatus::TimedOut => warn!(
            command = %invocation,
            timeout_secs = invocation.timeout.map(|t| t.as_secs()),
            "command timed out"
        ),
        CommandStatus::Success if outcome.exited_abnormally() => warn!(
            command = %invocation,
            exit_code = ?outcome.exit_code,
            output = %outcome.output_string(),
            "command exited with non-zero status"
        ),
        CommandStatus::Success => debug!(
            command = %invocation,
            duration_ms = %outcome.duration.as_millis(),
            "command completed"
        ),
    }
}

impl ProcessRunner for NativeRunner {
    fn run(&self, invocation: &CommandInvocation) -> CommandOutcome {
        let started = Instant::now();

        info!(
            command = %invocation,
            timeout_secs = invocation.timeout.map(|t| t.as_secs()),
            "running command"
        );

        let outcome = if invocation.command.is_empty() {
            CommandOutcome::failed(FailureCause::EmptyCommand, started.elapsed())
        } else {
            match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => {
                    let outcome = runtime.block_on(self.execute(invocation, started));
                    runtime.shutdown_timeout(self.options.drain_timeout);
                    outcome
                }
                Err(err) => CommandOutcome::failed(
                    FailureCause::Spawn {
                        program: invocation.command.program.to_string_lossy().into_owned(),
                        reason: format!("failed to create tokio runtime: {err}"),
                    },
                    started.elapsed(),
                ),
            }
        };

        log_outcome(invocation, &outcome);
        outcome
    }
}
