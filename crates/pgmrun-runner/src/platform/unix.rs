use std::fs::File;
use std::io;
use std::os::fd::OwnedFd;

use nix::sys::signal::{Signal, killpg};
use nix::unistd::Pid;
use tokio::net::unix::pipe::Receiver;
use tokio::process::{Child, Command};

pub(crate) type OutputPipe = Receiver;

pub(crate) fn output_pipe(reader: io::PipeReader) -> io::Result<OutputPipe> {
    Receiver::from_file(File::from(OwnedFd::from(reader)))
}

/// The child becomes leader of a new process group whose id equals its pid.
pub(crate) fn isolate(command: &mut Command) {
    command.process_group(0);
}

/// Process group led by a spawned child.
pub(crate) struct ProcessTree {
    pgid: Option<Pid>,
}

impl ProcessTree {
    pub(crate) fn attach(child: &Child) -> Self {
        let pgid = child
            .id()
            .and_then(|pid| i32::try_from(pid).ok())
            .map(Pid::from_raw);
        Self { pgid }
    }

    pub(crate) fn request_stop(&self) {
        self.signal(Signal::SIGTERM);
    }

    pub(crate) fn force_kill(&self) {
        self.signal(Signal::SIGKILL);
    }

    fn signal(&self, signal: Signal) {
        let Some(pgid) = self.pgid else {
            return;
        };
        // ESRCH just means the group is already gone
        if let Err(err) = killpg(pgid, signal) {
            tracing::trace!(pgid = pgid.as_raw(), ?signal, %err, "killpg failed");
        }
    }
}
