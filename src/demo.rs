//! Demo mode: rebuild a scratch directory from a pristine fixture tree.

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory organized in demo mode when none is given.
pub const DEFAULT_DEMO_TARGET: &str = "sample-folder";

/// Errors that can occur while preparing the demo directory.
#[derive(Debug)]
pub enum DemoError {
    /// The fixture tree is missing or not a directory.
    SourceMissing(PathBuf),
    /// The previous demo directory could not be removed.
    CleanupFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Copying an entry failed.
    CopyFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for DemoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DemoError::SourceMissing(path) => {
                write!(f, "demo source {} is not a directory", path.display())
            }
            DemoError::CleanupFailed { path, source } => {
                write!(f, "failed to remove destination {}: {}", path.display(), source)
            }
            DemoError::CopyFailed { path, source } => {
                write!(f, "failed to copy {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for DemoError {}

/// Replaces `destination` with a fresh copy of `source`.
///
/// Any existing `destination` is removed first, so every demo run starts
/// from the same unorganized files.
pub fn prepare(source: &Path, destination: &Path) -> Result<(), DemoError> {
    if !source.is_dir() {
        return Err(DemoError::SourceMissing(source.to_path_buf()));
    }

    if destination.exists() {
        fs::remove_dir_all(destination).map_err(|e| DemoError::CleanupFailed {
            path: destination.to_path_buf(),
            source: e,
        })?;
    }

    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            DemoError::CopyFailed {
                path,
                source: e.into(),
            }
        })?;

        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let target = destination.join(relative);
        let copy_failed = |e| DemoError::CopyFailed {
            path: entry.path().to_path_buf(),
            source: e,
        };

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(copy_failed)?;
        } else {
            fs::copy(entry.path(), &target).map_err(copy_failed)?;
        }
    }

    Ok(())
}
