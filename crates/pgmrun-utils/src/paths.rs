//! Filesystem helpers shared by the drivers.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use tracing::debug;

use crate::error::DriverError;

/// Create `dir` and any missing parents.
///
/// # Errors
///
/// Returns [`DriverError::Io`] naming the directory.
pub fn ensure_dir_all(dir: &Path) -> Result<(), DriverError> {
    fs::create_dir_all(dir).map_err(DriverError::io(dir))
}

/// List the regular files directly inside `dir` whose names match `pattern`
/// (for example `"*.train"`), sorted by path.
///
/// A missing directory yields an empty list.
///
/// # Errors
///
/// Returns an error for an invalid pattern or an unreadable directory.
pub fn discover_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, DriverError> {
    let matcher = compile(pattern)?;

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(dir = %dir.display(), "directory does not exist");
            return Ok(Vec::new());
        }
        Err(err) => return Err(DriverError::io(dir)(err)),
    };

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(DriverError::io(dir))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if entry
            .file_name()
            .to_str()
            .is_some_and(|name| matcher.is_match(name))
        {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

fn compile(pattern: &str) -> Result<GlobMatcher, DriverError> {
    Glob::new(pattern)
        .map(|glob| glob.compile_matcher())
        .map_err(|err| DriverError::InvalidArgument {
            name: "pattern".to_string(),
            reason: err.to_string(),
        })
}

/// File name without its final extension, as an owned string.
#[must_use]
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Remove a file left over from an earlier run. Missing files are fine.
///
/// # Errors
///
/// Returns [`DriverError::Io`] for any failure other than `NotFound`.
pub fn remove_if_exists(path: &Path) -> Result<(), DriverError> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed stale file");
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(DriverError::io(path)(err)),
    }
}
