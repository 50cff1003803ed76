//! Bounded command runner for external tools
//!
//! Runs one external program, optionally under a wall-clock deadline, captures the
//! combined stdout/stderr stream and classifies the result as success, timeout or
//! failure. Every learner, sampler and inference engine driven by pgmrun goes
//! through [`ProcessRunner::run`].
//!
//! # Security Model
//!
//! All process execution goes through [`CommandSpec`] to ensure argv-style invocation.
//! Arguments are passed as discrete elements rather than shell strings, so file
//! paths containing whitespace or shell metacharacters reach the tool unchanged.

pub mod command_spec;
pub mod error;
pub mod invocation;
pub mod native;
pub mod outcome;
mod platform;
pub mod process;

pub use command_spec::CommandSpec;
pub use error::FailureCause;
pub use invocation::{CommandInvocation, timeout_from_secs};
pub use native::NativeRunner;
pub use outcome::{CommandOutcome, CommandStatus};
pub use process::{ProcessRunner, RunnerOptions};
