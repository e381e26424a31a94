// src/prepare.rs

//! Directory bootstrap under the data folder.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{LauncherError, Result};
use crate::fs::FileSystem;

pub const DATABASE_DIR: &str = "database";
pub const LOGS_DIR: &str = "logs";
pub const REPORTS_DIR: &str = "generated-reports";

/// Ensure `root/<dir>` exists for every entry in `dirs`.
///
/// Returns the paths that were actually created; directories that already
/// exist are left alone, so running this twice is a no-op the second time.
/// A path occupied by something other than a directory is an error.
pub fn prepare_directories(
    fs: &dyn FileSystem,
    root: &Path,
    dirs: &[&str],
) -> Result<Vec<PathBuf>> {
    let mut created = Vec::new();

    for dir in dirs {
        let path = root.join(dir);

        if fs.is_dir(&path) {
            debug!(path = %path.display(), "directory already present");
            continue;
        }

        if fs.exists(&path) {
            return Err(LauncherError::DirectoryPreparation {
                source: io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "exists but is not a directory",
                ),
                path,
            });
        }

        if let Err(source) = fs.create_dir_all(&path) {
            return Err(LauncherError::DirectoryPreparation { path, source });
        }

        debug!(path = %path.display(), "created directory");
        created.push(path);
    }

    Ok(created)
}
