use std::time::Duration;

use crate::{CommandInvocation, CommandOutcome};

// ============================================================================
// ProcessRunner Trait - Bounded Process Execution Interface
// ============================================================================

/// Trait for bounded process execution.
///
/// Implementations MUST use argv-style APIs only (no shell string evaluation) and
/// MUST always return an outcome: non-zero exits, timeouts and spawn failures are
/// reported through [`CommandStatus`](crate::CommandStatus), never by panicking.
///
/// # Threading
///
/// `run` blocks the calling thread until the process exits or is terminated.
/// Implementations may drive an async runtime internally (the native runner
/// uses a current-thread Tokio runtime per call), so `run` must not be called
/// from inside an async context. Separate calls share no state, so callers may
/// invoke `run` from several threads at once.
///
/// # Example
///
/// ```rust
/// use pgmrun_runner::{CommandInvocation, CommandOutcome, CommandSpec, ProcessRunner};
/// use std::time::Duration;
///
/// /// Pretends every command printed its own command line.
/// struct EchoRunner;
///
/// impl ProcessRunner for EchoRunner {
///     fn run(&self, invocation: &CommandInvocation) -> CommandOutcome {
///         let line = format!("{invocation}\n");
///         CommandOutcome::completed(line.into_bytes(), Some(0), Duration::ZERO)
///     }
/// }
///
/// let outcome = EchoRunner.run(&CommandInvocation::new(CommandSpec::new("libra")));
/// assert!(outcome.status.is_success());
/// assert_eq!(outcome.output_string(), "libra\n");
/// ```
pub trait ProcessRunner {
    /// Execute one invocation and classify the result.
    fn run(&self, invocation: &CommandInvocation) -> CommandOutcome;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    fn run(&self, invocation: &CommandInvocation) -> CommandOutcome {
        (**self).run(invocation)
    }
}

/// Default grace period between SIGTERM and SIGKILL
pub const DEFAULT_KILL_GRACE: Duration = Duration::from_secs(2);

/// Default time allowed to drain the output pipe after termination
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_millis(500);

/// Termination tuning for [`NativeRunner`](crate::NativeRunner).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerOptions {
    /// How long a timed-out process group gets to exit after SIGTERM
    pub kill_grace: Duration,
    /// How long to keep reading buffered output once the process is gone
    pub drain_timeout: Duration,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            kill_grace: DEFAULT_KILL_GRACE,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CommandSpec, CommandStatus, FailureCause};

    /// A mock implementation of ProcessRunner for testing
    struct MockRunner {
        expected: CommandOutcome,
    }

    impl ProcessRunner for MockRunner {
        fn run(&self, _invocation: &CommandInvocation) -> CommandOutcome {
            self.expected.clone()
        }
    }

    #[test]
    fn test_process_runner_trait_implementation() {
        let mock = MockRunner {
            expected: CommandOutcome::completed(b"mock".to_vec(), Some(0), Duration::ZERO),
        };

        let outcome = mock.run(&CommandInvocation::new(CommandSpec::new("test")));
        assert!(outcome.status.is_success());
        assert_eq!(outcome.output_string(), "mock");
    }

    #[test]
    fn test_process_runner_through_reference() {
        let mock = MockRunner {
            expected: CommandOutcome::timed_out(Vec::new(), Duration::from_secs(60)),
        };
        fn run_via<R: ProcessRunner>(runner: R) -> CommandOutcome {
            runner.run(&CommandInvocation::new(CommandSpec::new("sleep").arg("100")))
        }

        assert_eq!(run_via(&mock).status, CommandStatus::TimedOut);
    }

    #[test]
    fn test_process_runner_with_failure() {
        let mock = MockRunner {
            expected: CommandOutcome::failed(
                FailureCause::Wait {
                    reason: "mock error".to_string(),
                },
                Duration::ZERO,
            ),
        };

        let outcome = mock.run(&CommandInvocation::new(CommandSpec::new("test")));
        match outcome.status {
            CommandStatus::Failed(FailureCause::Wait { reason }) => {
                assert_eq!(reason, "mock error");
            }
            other => panic!("Expected Wait failure, got {other:?}"),
        }
    }

    #[test]
    fn test_runner_options_default() {
        let options = RunnerOptions::default();
        assert_eq!(options.kill_grace, DEFAULT_KILL_GRACE);
        assert_eq!(options.drain_timeout, DEFAULT_DRAIN_TIMEOUT);
    }
}
