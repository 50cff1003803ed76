//! CLI argument definitions and parsing structures
//!
//! This module defines the command-line interface structure using clap,
//! including the main `Cli` struct and the `Commands` enum.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use pgmrun_data::DEFAULT_TEST_SIZE;
use pgmrun_drivers::DEFAULT_SCORE_EXT;

/// pgmrun - batch driver for graphical model learners and inference engines
#[derive(Parser, Debug)]
#[command(name = "pgmrun")]
#[command(about = "Run PGM learning, sampling and inference tools over whole benchmark directories")]
#[command(long_about = r#"
pgmrun discovers datasets, networks and query sets by naming convention and runs
an external tool (libra, LearnSDD, gobnilp or BI) once per file, each run under
an optional deadline.

EXAMPLES:
  # Sample train/test/valid data from every network in bench/
  pgmrun sample -i bench --tr 10000 --te 1000 --va 1000

  # Learn Chow-Liu trees with libra, one hour per dataset
  pgmrun learn -i bench -o models -e libra -s cl -t 3600

  # Answer the query sets against the learned models
  pgmrun infer -i bench -o models -e libra -s cl

  # Hide two internal variables, three random instances per network
  pgmrun hide -i bench -o hidden -n 2 --instances 3

  # Compare inference output against reference answers
  pgmrun score -i bench -o models -e libra

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > config file > defaults
  Config file is discovered by searching upward from CWD for .pgmrun/config.toml
  Use --config to specify an explicit config file path
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Seed for every random choice pgmrun makes (tool seeds, hidden variables, splits)
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Milliseconds between SIGTERM and SIGKILL when a deadline expires
    #[arg(long, global = true)]
    pub kill_grace_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Learn one model per `<input>/data/*.train` dataset
    Learn {
        /// Benchmark directory containing `data/`
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for models and logs
        #[arg(short, long)]
        output: PathBuf,

        /// Learner executable (libra, LearnSDD jar, gobnilp or BI classpath)
        #[arg(short, long)]
        executable: String,

        /// libra learner: cl, bnlearn, acbn, acmn, idspn or mtlearn
        #[arg(short, long)]
        sub_mode: Option<String>,

        /// gobnilp settings file
        #[arg(short, long)]
        param_file: Option<PathBuf>,

        /// Deadline in seconds for each learner run (0 or less disables it)
        #[arg(short, long, allow_negative_numbers = true)]
        timeout: Option<i64>,
    },

    /// Answer `<input>/query/*.q` with the learned models (libra only)
    Infer {
        #[arg(short, long)]
        input: PathBuf,

        /// Directory holding the learned models
        #[arg(short, long)]
        output: PathBuf,

        #[arg(short, long)]
        executable: String,

        #[arg(short, long)]
        sub_mode: Option<String>,

        /// Deadline in seconds for each query run (0 or less disables it)
        #[arg(short, long, allow_negative_numbers = true)]
        timeout: Option<i64>,
    },

    /// Sample datasets from every `<input>/*.bif` network
    Sample {
        #[arg(short, long)]
        input: PathBuf,

        /// Rows in the training split
        #[arg(long = "tr")]
        train: u64,

        /// Rows in the test split
        #[arg(long = "te")]
        test: u64,

        /// Rows in the validation split
        #[arg(long = "va")]
        valid: u64,

        /// libra executable (defaults to tools.libra)
        #[arg(short, long)]
        executable: Option<String>,
    },

    /// Write copies of data and queries with random internal variables removed
    Hide {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        /// Internal variables to hide
        #[arg(short = 'n', long)]
        count: usize,

        /// Random selections per network
        #[arg(long, default_value_t = 1)]
        instances: usize,
    },

    /// Pad a data file with `*` columns for the network's latent variables
    Append {
        /// Network the data was drawn from
        #[arg(short, long)]
        network: PathBuf,

        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Write the mean squared error of each inference file against its key
    Score {
        /// Benchmark directory containing `query/*.infkey`
        #[arg(short, long)]
        input: PathBuf,

        /// Directory holding the inference output
        #[arg(short, long)]
        output: PathBuf,

        #[arg(short, long)]
        executable: String,

        /// Extension of the inference files to score
        #[arg(long, default_value = DEFAULT_SCORE_EXT)]
        ext: String,
    },

    /// Shuffle a CSV file into `<stem>_train` and `<stem>_test` files
    Split {
        /// CSV file with a header row
        file: PathBuf,

        /// Fraction of rows put in the test file
        #[arg(default_value_t = DEFAULT_TEST_SIZE)]
        test_size: f64,
    },
}

impl Commands {
    /// Short name used in logs and error reports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Learn { .. } => "learn",
            Commands::Infer { .. } => "infer",
            Commands::Sample { .. } => "sample",
            Commands::Hide { .. } => "hide",
            Commands::Append { .. } => "append",
            Commands::Score { .. } => "score",
            Commands::Split { .. } => "split",
        }
    }

    /// The `-t` value of commands that run under a deadline.
    #[must_use]
    pub fn timeout_secs(&self) -> Option<i64> {
        match self {
            Commands::Learn { timeout, .. } | Commands::Infer { timeout, .. } => *timeout,
            _ => None,
        }
    }
}

/// Build the clap command, for tests and completions.
#[must_use]
pub fn build_cli() -> clap::Command {
    <Cli as clap::CommandFactory>::command()
}
