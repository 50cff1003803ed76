//! Learn command implementation
//!
//! Handles `pgmrun learn`.

use std::path::PathBuf;

use pgmrun_drivers::LearnRequest;

use super::common::{build_driver, build_rng, print_report, tools_from_config};
use crate::{Config, PgmError};

/// Execute the learn command
pub fn execute_learn_command(
    input: PathBuf,
    output: PathBuf,
    executable: String,
    sub_mode: Option<String>,
    param_file: Option<PathBuf>,
    config: &Config,
) -> Result<(), PgmError> {
    let request = LearnRequest {
        input_dir: input,
        output_dir: output,
        executable,
        sub_mode,
        param_file,
    };
    let driver = build_driver(config, tools_from_config(config));
    let mut rng = build_rng(config);

    let report = driver.learn(&request, &mut rng)?;
    print_report("learn", &report);
    Ok(())
}
