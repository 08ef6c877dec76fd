use std::fs::create_dir;
use std::fs::create_dir_all;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::error;

use crate::Error;
use crate::Result;

/// Creates `path`, which must not exist yet. Missing parents are created.
///
/// # Errors
/// `Error::EnvironmentConflict` when `path` is already there, whatever it is.
pub fn create_fresh_dir(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(Error::EnvironmentConflict {
            path: path.to_path_buf(),
        });
    }

    if let Some(parent) = path.parent() {
        create_dir_all(parent).map_err(|e| {
            error!("Failed to create {}: {:?}", parent.display(), e);
            Error::Io(e)
        })?;
    }

    match create_dir(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(Error::EnvironmentConflict {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(Error::Io(e)),
    }
}

/// Opens `path` for writing, truncating an existing file.
pub fn create_log_file(path: &Path) -> Result<File> {
    let file = OpenOptions::new().write(true).create(true).truncate(true).open(path)?;
    Ok(file)
}

/// Creates a uniquely named directory under the system temp dir that outlives
/// this process.
pub fn create_temp_base_dir(prefix: &str) -> Result<PathBuf> {
    let dir = tempfile::Builder::new().prefix(prefix).tempdir()?;
    Ok(dir.keep())
}

/// Recursively removes `path`.
///
/// Returns `false` when there was nothing to remove.
pub async fn remove_dir_all_if_exists(path: &Path) -> Result<bool> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => {
            debug!("removed {}", path.display());
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::Io(e)),
    }
}

/// Blocking variant of [`remove_dir_all_if_exists`] for contexts that cannot
/// await, such as `Drop`.
pub fn remove_dir_all_blocking(path: &Path) -> Result<bool> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::Io(e)),
    }
}
