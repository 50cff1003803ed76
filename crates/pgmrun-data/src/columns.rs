use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use pgmrun_utils::error::DataError;
use tracing::debug;

pub(crate) fn open(path: &Path) -> Result<BufReader<File>, DataError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(DataError::io(path))
}

pub(crate) fn create(path: &Path) -> Result<BufWriter<File>, DataError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(DataError::io(path))
}

/// Number of comma-separated fields on the first line of `path`.
///
/// # Errors
///
/// [`DataError::EmptyFile`] when the file has no first line.
pub fn count_columns(path: &Path) -> Result<usize, DataError> {
    let mut first = String::new();
    let read = open(path)?
        .read_line(&mut first)
        .map_err(DataError::io(path))?;
    if read == 0 {
        return Err(DataError::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    Ok(first.trim_end_matches(['\r', '\n']).split(',').count())
}

/// Copy `src` to `dst`, appending `,c1,c2,...` to every line.
///
/// With no columns the lines are copied unchanged. Returns the number of lines
/// written.
pub fn append_columns(src: &Path, dst: &Path, columns: &[&str]) -> Result<usize, DataError> {
    let suffix = if columns.is_empty() {
        String::new()
    } else {
        format!(",{}", columns.join(","))
    };

    let reader = open(src)?;
    let mut writer = create(dst)?;
    let mut rows = 0;
    for line in reader.lines() {
        let line = line.map_err(DataError::io(src))?;
        writeln!(writer, "{line}{suffix}").map_err(DataError::io(dst))?;
        rows += 1;
    }
    writer.flush().map_err(DataError::io(dst))?;

    debug!(src = %src.display(), dst = %dst.display(), rows, appended = columns.len(), "appended columns");
    Ok(rows)
}

/// Copy the headerless CSV `src` to `dst` without the given 0-based columns.
///
/// Remaining columns keep their order. Indices past the end of a row are
/// ignored, as are blank lines. Returns the number of rows written.
pub fn drop_columns(src: &Path, dst: &Path, indices: &[usize]) -> Result<usize, DataError> {
    let dropped: BTreeSet<usize> = indices.iter().copied().collect();

    let reader = open(src)?;
    let mut writer = create(dst)?;
    let mut rows = 0;
    for line in reader.lines() {
        let line = line.map_err(DataError::io(src))?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let kept: Vec<&str> = line
            .split(',')
            .enumerate()
            .filter(|(i, _)| !dropped.contains(i))
            .map(|(_, field)| field)
            .collect();
        writeln!(writer, "{}", kept.join(",")).map_err(DataError::io(dst))?;
        rows += 1;
    }
    writer.flush().map_err(DataError::io(dst))?;

    debug!(src = %src.display(), dst = %dst.display(), rows, ?dropped, "dropped columns");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_count_columns_uses_first_line() {
        let temp = TempDir::new().unwrap();
        let path = fixture(&temp, "a.train", "0,1,1\n0,1\n");
        assert_eq!(count_columns(&path).unwrap(), 3);
    }

    #[test]
    fn test_count_columns_empty_file() {
        let temp = TempDir::new().unwrap();
        let path = fixture(&temp, "empty.train", "");
        assert!(matches!(
            count_columns(&path),
            Err(DataError::EmptyFile { .. })
        ));
    }

    #[test]
    fn test_count_columns_missing_file() {
        let err = count_columns(Path::new("/nonexistent/a.train")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }

    #[test]
    fn test_append_columns() {
        let temp = TempDir::new().unwrap();
        let src = fixture(&temp, "a.train", "0,1\n1,0\n");
        let dst = temp.path().join("a-latent.train");

        let rows = append_columns(&src, &dst, &["*", "*"]).unwrap();

        assert_eq!(rows, 2);
        assert_eq!(fs::read_to_string(&dst).unwrap(), "0,1,*,*\n1,0,*,*\n");
    }

    #[test]
    fn test_append_no_columns_copies_lines() {
        let temp = TempDir::new().unwrap();
        let src = fixture(&temp, "a.train", "0,1\n1,0");
        let dst = temp.path().join("out.train");

        append_columns(&src, &dst, &[]).unwrap();
        assert_eq!(fs::read_to_string(&dst).unwrap(), "0,1\n1,0\n");
    }

    #[test]
    fn test_drop_columns() {
        let temp = TempDir::new().unwrap();
        let src = fixture(&temp, "a.train", "0,1,2,3\n4,5,6,7\n\n");
        let dst = temp.path().join("cut.train");

        let rows = drop_columns(&src, &dst, &[2, 0, 9]).unwrap();

        assert_eq!(rows, 2);
        assert_eq!(fs::read_to_string(&dst).unwrap(), "1,3\n5,7\n");
    }

    #[test]
    fn test_drop_columns_keeps_query_markers() {
        let temp = TempDir::new().unwrap();
        let src = fixture(&temp, "a.q", "*,1,*\n0,*,1\n");
        let dst = temp.path().join("cut.q");

        drop_columns(&src, &dst, &[1]).unwrap();
        assert_eq!(fs::read_to_string(&dst).unwrap(), "*,*\n0,1\n");
    }

    proptest! {
        #[test]
        fn prop_drop_columns_removes_exactly_the_valid_indices(
            rows in proptest::collection::vec(proptest::collection::vec(0u8..5, 6), 1..20),
            indices in proptest::collection::vec(0usize..10, 0..8),
        ) {
            let temp = TempDir::new().unwrap();
            let content: String = rows
                .iter()
                .map(|row| row.iter().map(u8::to_string).collect::<Vec<_>>().join(",") + "\n")
                .collect();
            let src = fixture(&temp, "p.train", &content);
            let dst = temp.path().join("p-cut.train");

            drop_columns(&src, &dst, &indices).unwrap();

            let valid: BTreeSet<usize> = indices.iter().copied().filter(|&i| i < 6).collect();
            let expected: Vec<String> = rows
                .iter()
                .map(|row| {
                    row.iter()
                        .enumerate()
                        .filter(|(i, _)| !valid.contains(i))
                        .map(|(_, v)| v.to_string())
                        .collect::<Vec<_>>()
                        .join(",")
                })
                .collect();
            let written = fs::read_to_string(&dst).unwrap();
            let actual: Vec<&str> = written.lines().collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
