//! Score command implementation
//!
//! Handles `pgmrun score`.

use pgmrun_drivers::{ScoreRequest, score};

use super::common::print_report;
use crate::PgmError;

/// Execute the score command
pub fn execute_score_command(request: &ScoreRequest) -> Result<(), PgmError> {
    let report = score(request)?;
    print_report("score", &report);
    Ok(())
}
