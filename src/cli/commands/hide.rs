//! Hide command implementation
//!
//! Handles `pgmrun hide`.

use pgmrun_drivers::{HideRequest, hide};

use super::common::{build_rng, print_report};
use crate::{Config, PgmError};

/// Execute the hide command
pub fn execute_hide_command(request: &HideRequest, config: &Config) -> Result<(), PgmError> {
    let mut rng = build_rng(config);
    let report = hide(request, &mut rng)?;
    print_report("hide", &report);
    Ok(())
}
