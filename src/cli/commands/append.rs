//! Append command implementation
//!
//! Handles `pgmrun append`.

use std::path::Path;

use pgmrun_drivers::append_latent;

use crate::PgmError;

/// Execute the append command
pub fn execute_append_command(network: &Path, input: &Path, output: &Path) -> Result<(), PgmError> {
    let latent = append_latent(network, input, output)?;
    println!("append: {latent} latent column(s) -> {}", output.display());
    Ok(())
}
