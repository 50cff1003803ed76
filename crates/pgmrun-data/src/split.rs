use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use pgmrun_utils::error::DataError;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::info;

use crate::columns::{create, open};

/// Share of rows placed in the test file when none is given
pub const DEFAULT_TEST_SIZE: f64 = 0.2;

/// Files written by [`split_csv`].
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOutcome {
    pub train_path: PathBuf,
    pub test_path: PathBuf,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// `data/alarm.csv` + `_train` -> `data/alarm_train.csv`
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };
    path.with_file_name(name)
}

/// Randomly split a CSV with a header row into train and test files.
///
/// Rows are shuffled with `rng`; `ceil(rows * test_size)` of them go to
/// `<stem>_test.<ext>` and the rest to `<stem>_train.<ext>`. Both files keep the
/// header.
///
/// # Errors
///
/// [`DataError::InvalidTestSize`] unless `0 < test_size < 1`, and
/// [`DataError::EmptyFile`] when there is no header row.
pub fn split_csv<R: Rng + ?Sized>(
    path: &Path,
    test_size: f64,
    rng: &mut R,
) -> Result<SplitOutcome, DataError> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(DataError::InvalidTestSize { value: test_size });
    }

    let mut lines = open(path)?.lines();
    let header = match lines.next() {
        Some(line) => line.map_err(DataError::io(path))?,
        None => {
            return Err(DataError::EmptyFile {
                path: path.to_path_buf(),
            });
        }
    };
    let mut rows = Vec::new();
    for line in lines {
        let line = line.map_err(DataError::io(path))?;
        if !line.trim().is_empty() {
            rows.push(line);
        }
    }

    rows.shuffle(rng);
    let test_rows = ((rows.len() as f64) * test_size).ceil() as usize;
    let (test, train) = rows.split_at(test_rows.min(rows.len()));

    let outcome = SplitOutcome {
        train_path: with_suffix(path, "_train"),
        test_path: with_suffix(path, "_test"),
        train_rows: train.len(),
        test_rows: test.len(),
    };
    write_rows(&outcome.train_path, &header, train)?;
    write_rows(&outcome.test_path, &header, test)?;

    info!(
        file = %path.display(),
        train = %outcome.train_path.display(),
        train_rows = outcome.train_rows,
        test = %outcome.test_path.display(),
        test_rows = outcome.test_rows,
        "split dataset"
    );
    Ok(outcome)
}

fn write_rows(path: &Path, header: &str, rows: &[String]) -> Result<(), DataError> {
    let mut writer = create(path)?;
    writeln!(writer, "{header}").map_err(DataError::io(path))?;
    for row in rows {
        writeln!(writer, "{row}").map_err(DataError::io(path))?;
    }
    writer.flush().map_err(DataError::io(path))
}
