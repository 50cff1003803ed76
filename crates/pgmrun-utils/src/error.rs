use std::io;
use std::path::PathBuf;

use pgmrun_runner::CommandStatus;
use thiserror::Error;

/// Library-level error type for pgmrun operations.
///
/// Errors are grouped by the boundary they come from:
///
/// | Category | Description |
/// |----------|-------------|
/// | `Config` | Configuration file or CLI argument errors |
/// | `Driver` | Missing inputs, unsupported tools, failed pipeline steps |
/// | `Bif` | Network definition files that cannot be read |
/// | `Data` | CSV, schema and score file helpers |
///
/// Use [`to_exit_code()`](Self::to_exit_code) to map an error to a CLI exit code.
/// Library code returns `PgmError` and does NOT call `std::process::exit()`.
#[derive(Error, Debug)]
pub enum PgmError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Driver(#[from] DriverError),

    #[error("Network file error: {0}")]
    Bif(#[from] BifError),

    #[error("Data file error: {0}")]
    Data(#[from] DataError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file {path}: {reason}")]
    InvalidFile { path: PathBuf, reason: String },

    #[error("Invalid value for '{key}': {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration discovery failed: {reason}")]
    DiscoveryFailed { reason: String },
}

/// Errors raised by the tool drivers.
#[derive(Error, Debug)]
pub enum DriverError {
    /// A flag the selected tool needs was not given.
    #[error("Missing required input: {what}")]
    MissingRequiredInput { what: String },

    /// The executable or sub-mode is not one pgmrun knows how to drive.
    #[error("Unsupported algorithm: {name}")]
    UnsupportedAlgorithm { name: String },

    #[error("Invalid argument {name}: {reason}")]
    InvalidArgument { name: String, reason: String },

    /// A step whose result later steps depend on did not succeed.
    #[error("Step '{step}' did not succeed ({status})")]
    StepFailed { step: String, status: CommandStatus },

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Bif(#[from] BifError),

    #[error(transparent)]
    Data(#[from] DataError),
}

/// Errors from reading network definition (BIF) files
#[derive(Error, Debug)]
pub enum BifError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Line {line}: {reason}")]
    Syntax { line: usize, reason: String },

    #[error("Variable '{name}' declares {declared} states but lists {listed}")]
    CardinalityMismatch {
        name: String,
        declared: usize,
        listed: usize,
    },

    #[error("Variable '{name}' is declared more than once")]
    DuplicateVariable { name: String },

    #[error("Probability block refers to unknown variable '{name}'")]
    UnknownVariable { name: String },
}

/// Errors from the CSV/score file helpers
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is empty")]
    EmptyFile { path: PathBuf },

    #[error("{path}, line {line}: {reason}")]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Sequences differ in length: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Cannot compute a metric over empty input")]
    EmptyInput,

    #[error("Invalid test size {value}: must be strictly between 0 and 1")]
    InvalidTestSize { value: f64 },
}

impl DataError {
    /// Attach a path to an I/O error.
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

impl DriverError {
    /// Attach a path to an I/O error.
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
