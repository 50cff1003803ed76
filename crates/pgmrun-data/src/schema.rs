//! Schema, header and ARFF files derived from a network's variables.
//!
//! - `.schema`: one line with the cardinality of every variable (libra format)
//! - `.hdr`: variable names on the first line, highest state index on the second

use std::fmt::Write as _;
use std::io::{self, BufRead, Write};
use std::path::Path;

use pgmrun_utils::error::DataError;

use crate::columns::{create, open};

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn write_lines(path: &Path, lines: &[String]) -> Result<(), DataError> {
    let mut writer = create(path)?;
    for line in lines {
        writeln!(writer, "{line}").map_err(DataError::io(path))?;
    }
    writer.flush().map_err(DataError::io(path))
}

fn first_line(path: &Path) -> Result<String, DataError> {
    let mut line = String::new();
    let read = open(path)?
        .read_line(&mut line)
        .map_err(DataError::io(path))?;
    if read == 0 {
        return Err(DataError::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    Ok(line.trim().to_string())
}

/// Write a libra schema: the cardinalities on one comma-separated line.
pub fn write_schema(path: &Path, cardinalities: &[usize]) -> Result<(), DataError> {
    write_lines(path, &[join(cardinalities)])
}

/// Write a `.hdr` file: names, then the highest state index of each variable.
pub fn write_header(path: &Path, names: &[&str], cardinalities: &[usize]) -> Result<(), DataError> {
    if names.len() != cardinalities.len() {
        return Err(DataError::LengthMismatch {
            left: names.len(),
            right: cardinalities.len(),
        });
    }
    let max_states: Vec<usize> = cardinalities.iter().map(|c| c.saturating_sub(1)).collect();
    write_lines(path, &[names.join(","), join(&max_states)])
}

/// Variable names from the first line of a `.hdr` file.
pub fn read_header_names(path: &Path) -> Result<Vec<String>, DataError> {
    Ok(first_line(path)?.split(',').map(str::to_string).collect())
}

/// Cardinalities from a libra schema file.
pub fn read_schema(path: &Path) -> Result<Vec<usize>, DataError> {
    first_line(path)?
        .split(',')
        .map(|field| {
            field.trim().parse().map_err(|_| DataError::Malformed {
                path: path.to_path_buf(),
                line: 1,
                reason: format!("'{field}' is not a cardinality"),
            })
        })
        .collect()
}

/// ARFF header declaring every variable as nominal over `0..cardinality`.
///
/// ```
/// let header = pgmrun_data::arff_header(&["a".to_string()], &[3]).unwrap();
/// assert_eq!(header, "@relation data\n@attribute a {0,1,2}\n@data\n");
/// ```
pub fn arff_header(names: &[String], cardinalities: &[usize]) -> Result<String, DataError> {
    if names.len() != cardinalities.len() {
        return Err(DataError::LengthMismatch {
            left: names.len(),
            right: cardinalities.len(),
        });
    }

    let mut header = String::from("@relation data\n");
    for (name, &cardinality) in names.iter().zip(cardinalities) {
        let states: Vec<usize> = (0..cardinality).collect();
        let _ = writeln!(header, "@attribute {name} {{{}}}", join(&states));
    }
    header.push_str("@data\n");
    Ok(header)
}

/// Write `header` (newline-terminated) followed by the bytes of `src`.
pub fn copy_with_header(src: &Path, dst: &Path, header: &str) -> Result<u64, DataError> {
    let mut reader = open(src)?;
    let mut writer = create(dst)?;

    writer
        .write_all(header.as_bytes())
        .map_err(DataError::io(dst))?;
    if !header.ends_with('\n') {
        writer.write_all(b"\n").map_err(DataError::io(dst))?;
    }
    let copied = io::copy(&mut reader, &mut writer).map_err(DataError::io(src))?;
    writer.flush().map_err(DataError::io(dst))?;
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_schema_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("asia.schema");

        write_schema(&path, &[2, 2, 3]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "2,2,3\n");
        assert_eq!(read_schema(&path).unwrap(), [2, 2, 3]);
    }

    #[test]
    fn test_header_file_layout() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("asia.hdr");

        write_header(&path, &["asia", "tub", "xray"], &[2, 2, 3]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "asia,tub,xray\n1,1,2\n");
        assert_eq!(read_header_names(&path).unwrap(), ["asia", "tub", "xray"]);
    }

    #[test]
    fn test_header_length_mismatch() {
        let temp = TempDir::new().unwrap();
        let err = write_header(&temp.path().join("x.hdr"), &["a"], &[2, 2]).unwrap_err();
        assert!(matches!(err, DataError::LengthMismatch { left: 1, right: 2 }));
    }

    #[test]
    fn test_read_schema_rejects_non_numeric() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.schema");
        fs::write(&path, "2,x,3\n").unwrap();

        let err = read_schema(&path).unwrap_err();
        assert!(matches!(err, DataError::Malformed { line: 1, .. }));
    }

    #[test]
    fn test_arff_header() {
        let names = vec!["asia".to_string(), "xray".to_string()];
        let header = arff_header(&names, &[2, 3]).unwrap();
        assert_eq!(
            header,
            "@relation data\n@attribute asia {0,1}\n@attribute xray {0,1,2}\n@data\n"
        );
    }

    #[test]
    fn test_copy_with_header() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("asia.train");
        let dst = temp.path().join("asia-train.arff");
        fs::write(&src, "0,1\n1,1\n").unwrap();

        copy_with_header(&src, &dst, "@relation data\n@data").unwrap();

        assert_eq!(
            fs::read_to_string(&dst).unwrap(),
            "@relation data\n@data\n0,1\n1,1\n"
        );
    }
}
