//! Output directory preparation. Failures here are fatal for the whole run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The output directory cannot be used; reported before any task is dispatched.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("cannot create output directory {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("output path {} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("output directory {} is not writable: {source}", .path.display())]
    NotWritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot list output directory {}: {source}", .path.display())]
    List {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Creates `dir` if missing and verifies it is a writable directory.
pub fn ensure_output_dir(dir: &Path) -> Result<(), SetupError> {
    if !dir.exists() {
        tracing::info!("creating output directory {}", dir.display());
    }
    fs::create_dir_all(dir).map_err(|source| {
        if dir.exists() && !dir.is_dir() {
            SetupError::NotADirectory(dir.to_path_buf())
        } else {
            SetupError::Create {
                path: dir.to_path_buf(),
                source,
            }
        }
    })?;
    if !dir.is_dir() {
        return Err(SetupError::NotADirectory(dir.to_path_buf()));
    }

    // Unnamed temp file: unique per call and gone once closed.
    tempfile::tempfile_in(dir).map_err(|source| SetupError::NotWritable {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(())
}
