use std::path::{Path, PathBuf};
use std::time::Duration;

use pgmrun_runner::{CommandInvocation, CommandOutcome, CommandSpec, ProcessRunner};
use rand::Rng;
use tracing::{debug, warn};

/// Executables and JVM settings shared by the drivers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tools {
    /// libra executable used by `sample`
    pub libra: String,
    pub java: String,
    /// `-Xmx` value for the BI learner
    pub java_heap: String,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            libra: "libra".to_string(),
            java: "java".to_string(),
            java_heap: "2G".to_string(),
        }
    }
}

/// Whether a step runs under the learner deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Deadline {
    Timed,
    Untimed,
}

/// Runs tool pipelines through a [`ProcessRunner`].
///
/// Only the expensive step of each pipeline (learning, querying) gets the
/// deadline; preparation and scoring steps run to completion.
#[derive(Debug, Clone)]
pub struct Driver<R> {
    runner: R,
    timeout: Option<Duration>,
    tools: Tools,
}

impl<R: ProcessRunner> Driver<R> {
    pub fn new(runner: R, tools: Tools) -> Self {
        Self {
            runner,
            timeout: None,
            tools,
        }
    }

    /// Deadline for learner and query steps. `None` runs them to completion.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    #[must_use]
    pub fn tools(&self) -> &Tools {
        &self.tools
    }

    #[must_use]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run one pipeline step and log anything other than a clean exit.
    pub(crate) fn step(&self, name: &str, command: CommandSpec, deadline: Deadline) -> CommandOutcome {
        let timeout = match deadline {
            Deadline::Timed => self.timeout,
            Deadline::Untimed => None,
        };
        let invocation = CommandInvocation::new(command).with_timeout(timeout);
        let outcome = self.runner.run(&invocation);

        if !outcome.status.is_success() {
            warn!(step = name, status = %outcome.status, "step did not succeed");
        } else if outcome.exited_abnormally() {
            warn!(step = name, exit_code = ?outcome.exit_code, "step reported a non-zero exit code");
        } else {
            debug!(step = name, duration_ms = %outcome.duration.as_millis(), "step finished");
        }
        outcome
    }
}

/// Seed handed to an external tool, kept within a signed 32-bit range.
pub(crate) fn tool_seed<G: Rng + ?Sized>(rng: &mut G) -> u32 {
    rng.gen_range(0..=i32::MAX as u32)
}

/// `base` with `.ext` appended (not replacing anything after a dot in `base`).
pub(crate) fn with_ext(base: &Path, ext: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
