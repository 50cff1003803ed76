use std::fmt;
use std::time::Duration;

use crate::FailureCause;

/// Classified result of one command.
///
/// Callers key their skip logic off this: a dependent step only runs after
/// `Success`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandStatus {
    /// The process ran and exited on its own, whatever its exit code.
    Success,
    /// The deadline elapsed and the process group was terminated.
    TimedOut,
    /// The process could not be started or waited on.
    Failed(FailureCause),
}

impl CommandStatus {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    #[must_use]
    pub const fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOut)
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Short label for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::TimedOut => "timed_out",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::TimedOut => f.write_str("timed out"),
            Self::Failed(cause) => write!(f, "failed: {cause}"),
        }
    }
}

/// Output from running a [`CommandInvocation`](crate::CommandInvocation).
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    /// Combined stdout and stderr, in the order the process wrote them
    pub output: Vec<u8>,
    pub status: CommandStatus,
    /// Exit code when the process exited normally (None if killed or never started)
    pub exit_code: Option<i32>,
    /// Wall-clock time spent in `run`
    pub duration: Duration,
}

impl CommandOutcome {
    #[must_use]
    pub fn completed(output: Vec<u8>, exit_code: Option<i32>, duration: Duration) -> Self {
        Self {
            output,
            status: CommandStatus::Success,
            exit_code,
            duration,
        }
    }

    #[must_use]
    pub fn timed_out(output: Vec<u8>, duration: Duration) -> Self {
        Self {
            output,
            status: CommandStatus::TimedOut,
            exit_code: None,
            duration,
        }
    }

    /// A failed outcome never carries output.
    #[must_use]
    pub fn failed(cause: FailureCause, duration: Duration) -> Self {
        Self {
            output: Vec::new(),
            status: CommandStatus::Failed(cause),
            exit_code: None,
            duration,
        }
    }

    /// Captured output as UTF-8, lossy conversion.
    #[must_use]
    pub fn output_string(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    /// The process completed but reported a non-zero exit code or was killed by a
    /// signal it did not receive from us.
    #[must_use]
    pub fn exited_abnormally(&self) -> bool {
        self.status.is_success() && self.exit_code != Some(0)
    }
}
