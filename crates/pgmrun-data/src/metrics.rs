use std::io::BufRead;
use std::path::Path;

use pgmrun_utils::error::DataError;

use crate::columns::open;

fn parse_log_probability(line: &str) -> Option<f64> {
    line.trim().parse::<f64>().ok()
}

/// Read one log-probability per line and return the probabilities.
///
/// Lines that do not parse as a float (headers, blank lines, tool chatter) are
/// skipped.
pub fn read_log_probabilities(path: &Path) -> Result<Vec<f64>, DataError> {
    let mut values = Vec::new();
    for line in open(path)?.lines() {
        let line = line.map_err(DataError::io(path))?;
        if let Some(value) = parse_log_probability(&line) {
            values.push(value.exp());
        }
    }
    Ok(values)
}

/// The lines of captured tool output that parse as a float, one per line.
///
/// Answers and diagnostics arrive as one combined stream. A diagnostic line
/// that is itself a bare number cannot be told apart from an answer and is
/// kept.
///
/// ```
/// let answers = pgmrun_data::log_probability_lines(b"loading circuit\n-0.5\ndone\n-2\n");
/// assert_eq!(answers, "-0.5\n-2\n");
/// ```
#[must_use]
pub fn log_probability_lines(output: &[u8]) -> String {
    String::from_utf8_lossy(output)
        .lines()
        .filter(|line| parse_log_probability(line).is_some())
        .map(|line| format!("{}\n", line.trim()))
        .collect()
}

/// Mean of the squared element-wise differences.
///
/// # Errors
///
/// [`DataError::LengthMismatch`] when the slices differ in length and
/// [`DataError::EmptyInput`] when both are empty.
pub fn mean_squared_error(expected: &[f64], actual: &[f64]) -> Result<f64, DataError> {
    if expected.len() != actual.len() {
        return Err(DataError::LengthMismatch {
            left: expected.len(),
            right: actual.len(),
        });
    }
    if expected.is_empty() {
        return Err(DataError::EmptyInput);
    }

    let sum: f64 = expected
        .iter()
        .zip(actual)
        .map(|(e, a)| (e - a).powi(2))
        .sum();
    Ok(sum / expected.len() as f64)
}
