use std::path::Path;

use pgmrun_bif::BifNetwork;
use pgmrun_data::{append_columns, count_columns};
use pgmrun_utils::error::DriverError;
use tracing::{info, warn};

/// Pad every row of `input` with `*` for the network variables it lacks.
///
/// The number of latent columns is the network's variable count minus the
/// column count of the first row. Returns that number, or 0 when the rows were
/// copied unchanged because the data already has as many columns as the
/// network has variables.
pub fn append_latent(network: &Path, input: &Path, output: &Path) -> Result<usize, DriverError> {
    let variables = BifNetwork::from_path(network)?.variables().len();
    let columns = count_columns(input)?;

    let latent = variables.saturating_sub(columns);
    if latent == 0 {
        warn!(
            variables,
            columns,
            input = %input.display(),
            "data has no missing columns, copying unchanged"
        );
    }

    let stars = vec!["*"; latent];
    let rows = append_columns(input, output, &stars)?;
    info!(latent, rows, output = %output.display(), "appended latent columns");
    Ok(latent)
}
