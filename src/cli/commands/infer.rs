//! Infer command implementation
//!
//! Handles `pgmrun infer`.

use std::path::PathBuf;

use pgmrun_drivers::InferRequest;

use super::common::{build_driver, print_report, tools_from_config};
use crate::{Config, PgmError};

/// Execute the infer command
pub fn execute_infer_command(
    input: PathBuf,
    output: PathBuf,
    executable: String,
    sub_mode: Option<String>,
    config: &Config,
) -> Result<(), PgmError> {
    let request = InferRequest {
        input_dir: input,
        output_dir: output,
        executable,
        sub_mode,
    };
    let driver = build_driver(config, tools_from_config(config));

    let report = driver.infer(&request)?;
    print_report("infer", &report);
    Ok(())
}
