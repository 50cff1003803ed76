use std::fs;
use std::path::PathBuf;

use pgmrun_data::{DataError, mean_squared_error, read_log_probabilities};
use pgmrun_utils::error::DriverError;
use pgmrun_utils::logging::dataset_span;
use pgmrun_utils::paths::{discover_files, file_stem};
use tracing::{info, warn};

use crate::driver::with_ext;
use crate::{Algorithm, BatchReport};

/// Extension of the inference files compared by default.
pub const DEFAULT_SCORE_EXT: &str = "exact";

/// Arguments of a `score` run.
#[derive(Debug, Clone)]
pub struct ScoreRequest {
    /// Directory with a `query/` folder of `<name>.infkey` reference files
    pub input_dir: PathBuf,
    /// Directory holding the inference output files
    pub output_dir: PathBuf,
    pub executable: String,
    pub ext: String,
}

/// Compare every inference file against its reference key and write the mean
/// squared error of the probabilities to `<inference file>.ase`.
///
/// An inference file belongs to key `<name>` when its file name starts with
/// `<name>` and ends in `.<ext>`.
pub fn score(request: &ScoreRequest) -> Result<BatchReport, DriverError> {
    let algorithm = Algorithm::detect(&request.executable)?;
    let mut report = BatchReport::default();
    if algorithm != Algorithm::Libra {
        warn!(%algorithm, "scoring is not available for this tool, skipping");
        report.skip(algorithm.as_str(), "scoring not available");
        return Ok(report);
    }

    let keys = discover_files(&request.input_dir.join("query"), "*.infkey")?;
    let candidates = discover_files(&request.output_dir, &format!("*.{}", request.ext))?;
    info!(
        keys = keys.len(),
        candidates = candidates.len(),
        ext = %request.ext,
        "scoring inference output"
    );

    for key in &keys {
        let name = file_stem(key);
        let _span = dataset_span(&name).entered();
        let expected = read_log_probabilities(key)?;

        let matching = candidates.iter().filter(|path| {
            path.file_name()
                .and_then(|file| file.to_str())
                .is_some_and(|file| file.starts_with(name.as_str()))
        });
        for inference in matching {
            let label = inference
                .file_name()
                .map(|file| file.to_string_lossy().into_owned())
                .unwrap_or_default();
            let actual = read_log_probabilities(inference)?;
            let mse = match mean_squared_error(&expected, &actual) {
                Ok(mse) => mse,
                Err(err @ (DataError::LengthMismatch { .. } | DataError::EmptyInput)) => {
                    warn!(file = %inference.display(), %err, "cannot compare with key, skipping");
                    report.skip(label, err.to_string());
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            let ase = with_ext(inference, "ase");
            fs::write(&ase, format!("{mse}\n")).map_err(DriverError::io(&ase))?;
            info!(file = %ase.display(), mse, "wrote score");
            report.succeed(label);
        }
    }

    report.log_summary("score");
    Ok(report)
}
