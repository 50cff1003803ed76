//! Split command implementation
//!
//! Handles `pgmrun split`.

use std::path::Path;

use pgmrun_data::split_csv;

use super::common::build_rng;
use crate::{Config, PgmError};

/// Execute the split command
pub fn execute_split_command(file: &Path, test_size: f64, config: &Config) -> Result<(), PgmError> {
    let mut rng = build_rng(config);
    let outcome = split_csv(file, test_size, &mut rng)?;
    println!(
        "split: {} train rows -> {}",
        outcome.train_rows,
        outcome.train_path.display()
    );
    println!(
        "split: {} test rows -> {}",
        outcome.test_rows,
        outcome.test_path.display()
    );
    Ok(())
}
