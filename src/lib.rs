//! pgmrun - batch driver for probabilistic graphical model tools
//!
//! pgmrun runs external learners, samplers and inference engines (libra,
//! LearnSDD, gobnilp, BI) over whole benchmark directories. Inputs are found by
//! naming convention, every tool run goes through a bounded process runner with
//! an optional deadline, and a failure on one dataset never stops the batch.
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! # Sample datasets from every network in bench/
//! pgmrun sample -i bench --tr 10000 --te 1000 --va 1000 --seed 7
//!
//! # Learn a Chow-Liu tree per dataset, one hour each
//! pgmrun learn -i bench -o models -e libra -s cl -t 3600
//!
//! # Answer query sets and score the answers
//! pgmrun infer -i bench -o models -e libra -s cl
//! pgmrun score -i bench -o models -e libra
//! ```
//!
//! # Directory layout
//!
//! | Path | Produced by | Consumed by |
//! |------|-------------|-------------|
//! | `<in>/<name>.bif` | user | `sample`, `hide`, `append` |
//! | `<in>/data/<name>.{train,test,valid,schema,hdr}` | `sample` | `learn`, `hide` |
//! | `<in>/query/<name>.{q,ev,infkey}` | user | `infer`, `hide`, `score` |
//! | `<out>/<name>-<sub>.{bn,ac,spn,out,score}` | `learn` | `infer` |
//! | `<out>/<name>-<sub>.exact` | `infer` | `score` |
//!
//! # Crates
//!
//! - [`pgmrun_runner`]: bounded command execution
//! - [`pgmrun_bif`]: network structure reader
//! - [`pgmrun_data`]: CSV, schema and score helpers
//! - [`pgmrun_drivers`]: per-tool pipelines
//! - [`pgmrun_config`]: configuration discovery

pub mod cli;

// ============================================================================
// Public API
// ============================================================================

pub use pgmrun_bif::{BifNetwork, Variable};
pub use pgmrun_config::{CliArgs, Config, ConfigSource};
pub use pgmrun_drivers::{
    Algorithm, BatchReport, Driver, HideRequest, InferRequest, LearnRequest, LibraMode,
    SampleRequest, ScoreRequest, Tools,
};
pub use pgmrun_runner::{
    CommandInvocation, CommandOutcome, CommandSpec, CommandStatus, FailureCause, NativeRunner,
    ProcessRunner, RunnerOptions,
};
pub use pgmrun_utils::error::{BifError, ConfigError, DataError, DriverError, PgmError};
pub use pgmrun_utils::exit_codes::ExitCode;
