//! Sample command implementation
//!
//! Handles `pgmrun sample`.

use pgmrun_drivers::SampleRequest;

use super::common::{build_driver, build_rng, print_report, tools_from_config};
use crate::{Config, PgmError};

/// Execute the sample command
///
/// `executable` replaces the configured libra for this run.
pub fn execute_sample_command(
    request: SampleRequest,
    executable: Option<String>,
    config: &Config,
) -> Result<(), PgmError> {
    let mut tools = tools_from_config(config);
    if let Some(libra) = executable {
        tools.libra = libra;
    }
    let driver = build_driver(config, tools);
    let mut rng = build_rng(config);

    let report = driver.sample(&request, &mut rng)?;
    print_report("sample", &report);
    Ok(())
}
