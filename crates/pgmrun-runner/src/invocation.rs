use std::fmt;
use std::time::Duration;

use crate::CommandSpec;

/// A requested execution: what to run and how long it may take.
///
/// Built right before [`ProcessRunner::run`](crate::ProcessRunner::run) and dropped
/// afterwards. `timeout: None` means run to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub command: CommandSpec,
    pub timeout: Option<Duration>,
}

impl CommandInvocation {
    /// Run `command` with no deadline.
    #[must_use]
    pub fn new(command: CommandSpec) -> Self {
        Self {
            command,
            timeout: None,
        }
    }

    /// Set or clear the deadline. A zero duration clears it.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout.filter(|t| !t.is_zero());
        self
    }

    /// Whitespace-split `line` and attach a timeout given in whole seconds.
    ///
    /// `secs <= 0` means no deadline.
    #[must_use]
    pub fn from_command_line(line: &str, secs: i64) -> Self {
        Self::new(CommandSpec::from_command_line(line)).with_timeout(timeout_from_secs(secs))
    }
}

impl fmt::Display for CommandInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.command.fmt(f)
    }
}

/// Map a CLI timeout in seconds to a deadline; zero or negative disables it.
#[must_use]
pub fn timeout_from_secs(secs: i64) -> Option<Duration> {
    u64::try_from(secs)
        .ok()
        .filter(|&s| s > 0)
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_from_secs() {
        assert_eq!(timeout_from_secs(0), None);
        assert_eq!(timeout_from_secs(-5), None);
        assert_eq!(timeout_from_secs(3), Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_with_timeout_zero_clears_deadline() {
        let inv = CommandInvocation::new(CommandSpec::new("true"))
            .with_timeout(Some(Duration::ZERO));
        assert_eq!(inv.timeout, None);
    }

    #[test]
    fn test_from_command_line() {
        let inv = CommandInvocation::from_command_line("sleep 5", 1);
        assert_eq!(inv.command.program, "sleep");
        assert_eq!(inv.timeout, Some(Duration::from_secs(1)));
        assert_eq!(inv.to_string(), "sleep 5");
    }
}
