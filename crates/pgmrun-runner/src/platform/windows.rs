use std::fs::File;
use std::io;
use std::os::windows::io::OwnedHandle;

use tokio::process::{Child, Command};
use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::System::JobObjects::{
    AssignProcessToJobObject, CreateJobObjectW, JOB_OBJECT_LIMIT_KILL_ON_JOB_CLOSE,
    JOBOBJECT_EXTENDED_LIMIT_INFORMATION, JobObjectExtendedLimitInformation,
    SetInformationJobObject, TerminateJobObject,
};
use windows::Win32::System::Threading::{
    OpenProcess, PROCESS_SET_QUOTA, PROCESS_TERMINATE, TerminateProcess,
};

/// Anonymous pipes have no overlapped I/O, so reads go through Tokio's blocking pool.
pub(crate) type OutputPipe = tokio::fs::File;

pub(crate) fn output_pipe(reader: io::PipeReader) -> io::Result<OutputPipe> {
    Ok(tokio::fs::File::from_std(File::from(OwnedHandle::from(reader))))
}

/// Nothing to prepare: the tree is captured by a job object after spawn.
pub(crate) fn isolate(_command: &mut Command) {}

/// Job object holding a spawned child and every process it starts.
///
/// The job is created with `JOB_OBJECT_LIMIT_KILL_ON_JOB_CLOSE`, so dropping
/// the tree also kills whatever is still running in it.
pub(crate) struct ProcessTree {
    job: Option<HANDLE>,
    pid: Option<u32>,
}

impl ProcessTree {
    pub(crate) fn attach(child: &Child) -> Self {
        let pid = child.id();
        let job = pid.and_then(|pid| match assign_to_new_job(pid) {
            Ok(job) => Some(job),
            Err(err) => {
                tracing::debug!(pid, %err, "could not place process in a job object");
                None
            }
        });
        Self { job, pid }
    }

    /// Windows has no polite equivalent of SIGTERM for console tools.
    pub(crate) fn request_stop(&self) {}

    pub(crate) fn force_kill(&self) {
        unsafe {
            if let Some(job) = self.job {
                let _ = TerminateJobObject(job, 1);
            } else if let Some(pid) = self.pid
                && let Ok(process) = OpenProcess(PROCESS_TERMINATE, false, pid)
            {
                let _ = TerminateProcess(process, 1);
                let _ = CloseHandle(process);
            }
        }
    }
}

impl Drop for ProcessTree {
    fn drop(&mut self) {
        if let Some(job) = self.job.take() {
            unsafe {
                let _ = CloseHandle(job);
            }
        }
    }
}

fn assign_to_new_job(pid: u32) -> windows::core::Result<HANDLE> {
    unsafe {
        let job = CreateJobObjectW(None, None)?;

        let mut info: JOBOBJECT_EXTENDED_LIMIT_INFORMATION = std::mem::zeroed();
        info.BasicLimitInformation.LimitFlags = JOB_OBJECT_LIMIT_KILL_ON_JOB_CLOSE;

        let assigned = SetInformationJobObject(
            job,
            JobObjectExtendedLimitInformation,
            (&raw const info).cast(),
            std::mem::size_of::<JOBOBJECT_EXTENDED_LIMIT_INFORMATION>() as u32,
        )
        .and_then(|()| {
            let process = OpenProcess(PROCESS_SET_QUOTA | PROCESS_TERMINATE, false, pid)?;
            let result = AssignProcessToJobObject(job, process);
            let _ = CloseHandle(process);
            result
        });

        match assigned {
            Ok(()) => Ok(job),
            Err(err) => {
                let _ = CloseHandle(job);
                Err(err)
            }
        }
    }
}
