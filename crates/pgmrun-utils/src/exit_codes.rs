//! Exit code constants and error mapping for pgmrun.
//!
//! # Exit Code Table
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Operation completed successfully |
//! | 1 | `INTERNAL` | General/internal failure |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments or configuration |
//! | 3 | `UNSUPPORTED` | Executable or sub-mode pgmrun cannot drive |
//! | 4 | `STEP_FAILED` | A required external step did not succeed |
//! | 5 | `IO` | Input or output files could not be read or written |
//!
//! Individual external commands that exit non-zero do not change the exit code
//! of a batch; only errors that abort the whole command are mapped here.

use crate::error::{DriverError, PgmError};

/// Process exit code for the `pgmrun` binary.
///
/// Use the named constants, or [`as_i32()`](Self::as_i32) to get the numeric value
/// for `std::process::exit()`.
///
/// # Example
///
/// ```rust
/// use pgmrun_utils::exit_codes::ExitCode;
///
/// assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
/// assert_eq!(ExitCode::STEP_FAILED, ExitCode::from_i32(4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - operation completed successfully
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Internal error - general failure
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// CLI arguments error - invalid or missing command-line arguments or config
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// Unsupported algorithm - the executable or sub-mode is not recognized
    pub const UNSUPPORTED: ExitCode = ExitCode(3);

    /// Step failed - a step later work depends on timed out or could not run
    pub const STEP_FAILED: ExitCode = ExitCode(4);

    /// IO error - files could not be read, parsed or written
    pub const IO: ExitCode = ExitCode(5);

    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Create an ExitCode from a raw i32 value.
    ///
    /// Prefer using the named constants when possible.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<i32> for ExitCode {
    fn from(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl PgmError {
    /// Map this error to the exit code the CLI should report.
    #[must_use]
    pub fn to_exit_code(&self) -> ExitCode {
        match self {
            PgmError::Config(_) => ExitCode::CLI_ARGS,
            PgmError::Driver(driver_err) => match driver_err {
                DriverError::MissingRequiredInput { .. } | DriverError::InvalidArgument { .. } => {
                    ExitCode::CLI_ARGS
                }
                DriverError::UnsupportedAlgorithm { .. } => ExitCode::UNSUPPORTED,
                DriverError::StepFailed { .. } => ExitCode::STEP_FAILED,
                DriverError::Data(crate::error::DataError::InvalidTestSize { .. }) => {
                    ExitCode::CLI_ARGS
                }
                DriverError::Io { .. } | DriverError::Bif(_) | DriverError::Data(_) => ExitCode::IO,
            },
            PgmError::Bif(_) | PgmError::Io(_) => ExitCode::IO,
            PgmError::Data(crate::error::DataError::InvalidTestSize { .. }) => ExitCode::CLI_ARGS,
            PgmError::Data(_) => ExitCode::IO,
        }
    }
}
