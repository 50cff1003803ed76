//! Failure causes reported by the runner

use thiserror::Error;

/// Why a command could not be run to completion.
///
/// Carried inside [`CommandStatus::Failed`](crate::CommandStatus::Failed). Timeouts are
/// not failures: they have their own status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    #[error("empty command line")]
    EmptyCommand,

    #[error("failed to spawn process '{program}': {reason}")]
    Spawn { program: String, reason: String },

    #[error("failed to wait for process: {reason}")]
    Wait { reason: String },
}
