//! Helpers shared by the CLI commands
//!
//! Builds the runner, driver and random source from the effective
//! configuration, and prints batch summaries.

use pgmrun_drivers::{BatchReport, Driver, Tools};
use pgmrun_runner::NativeRunner;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::{debug, info};

use crate::Config;

/// Tool settings from `[tools]`.
pub fn tools_from_config(config: &Config) -> Tools {
    Tools {
        libra: config.libra().to_string(),
        java: config.java().to_string(),
        java_heap: config.java_heap().to_string(),
    }
}

/// Driver running tools natively under the configured deadline and kill grace.
pub fn build_driver(config: &Config, tools: Tools) -> Driver<NativeRunner> {
    let runner = NativeRunner::with_options(config.runner_options());
    Driver::new(runner, tools).with_timeout(config.learner_timeout())
}

/// The seed from `--seed` or `defaults.seed`, else a fresh one.
///
/// A fresh seed is logged so the run can be repeated.
pub fn resolve_seed(config: &Config) -> u64 {
    match config.defaults.seed {
        Some(seed) => {
            debug!(seed, "using configured seed");
            seed
        }
        None => {
            let seed = rand::thread_rng().r#gen::<u64>();
            info!(seed, "no seed configured, pass --seed {seed} to repeat this run");
            seed
        }
    }
}

pub fn build_rng(config: &Config) -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(resolve_seed(config))
}

/// One line per batch on stdout, plus the failed and skipped items.
pub fn print_report(operation: &str, report: &BatchReport) {
    println!(
        "{operation}: {} succeeded, {} failed, {} skipped",
        report.succeeded.len(),
        report.failed.len(),
        report.skipped.len()
    );
    for (item, reason) in &report.failed {
        println!("  ✗ {item}: {reason}");
    }
    for (item, reason) in &report.skipped {
        println!("  - {item}: {reason}");
    }
}

/// Log the effective configuration, one event per key, in verbose mode.
pub fn log_effective_config(config: &Config) {
    for (key, value, source) in config.effective_config() {
        debug!(key, value = %value, source = %source, "config");
    }
}
