//! Platform-specific process isolation and termination
//!
//! Each platform provides:
//! - `isolate`: prepares a command so everything it spawns can be stopped together
//! - `ProcessTree`: handle on that tree (`request_stop`, `force_kill`)
//! - `output_pipe`: turns the read end of the output pipe into an async reader

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
pub(crate) use unix::{OutputPipe, ProcessTree, isolate, output_pipe};
#[cfg(windows)]
pub(crate) use windows::{OutputPipe, ProcessTree, isolate, output_pipe};

/// Whether [`ProcessTree::request_stop`] can ask processes to exit before
/// they are killed.
pub(crate) const GRACEFUL_STOP: bool = cfg!(unix);
