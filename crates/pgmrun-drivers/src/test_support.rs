use std::cell::RefCell;
use std::time::Duration;

use pgmrun_runner::{CommandInvocation, CommandOutcome, ProcessRunner};

type Responder = Box<dyn Fn(&CommandInvocation) -> CommandOutcome>;

/// Runner that records every invocation and answers with a scripted outcome.
pub(crate) struct RecordingRunner {
    calls: RefCell<Vec<CommandInvocation>>,
    respond: Responder,
}

impl RecordingRunner {
    pub(crate) fn with(respond: impl Fn(&CommandInvocation) -> CommandOutcome + 'static) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    /// Every command exits 0 with no output.
    pub(crate) fn succeeding() -> Self {
        Self::with(|_| CommandOutcome::completed(Vec::new(), Some(0), Duration::ZERO))
    }

    pub(crate) fn invocations(&self) -> Vec<CommandInvocation> {
        self.calls.borrow().clone()
    }

    /// Each invocation rendered as `program arg1 arg2 ...`.
    pub(crate) fn command_lines(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|call| call.command.to_string())
            .collect()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, invocation: &CommandInvocation) -> CommandOutcome {
        self.calls.borrow_mut().push(invocation.clone());
        (self.respond)(invocation)
    }
}

/// First argument of the command, which is the libra sub-command.
pub(crate) fn sub_command(invocation: &CommandInvocation) -> String {
    invocation
        .command
        .args
        .first()
        .map(|arg| arg.to_string_lossy().into_owned())
        .unwrap_or_default()
}
