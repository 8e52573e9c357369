//! Atomic I/O operations with file locking

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use backoff::ExponentialBackoff;
use fs2::FileExt;

use crate::{Error, Result};

/// Knobs for [`write_atomic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobustnessConfig {
    /// How long to keep retrying the advisory lock before giving up.
    pub lock_timeout: Duration,
    /// Flush file contents to disk before the rename.
    pub enable_fsync: bool,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(5),
            enable_fsync: true,
        }
    }
}

/// Read text content from a file.
pub fn read_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Create the folder that will contain `path`.
///
/// Returns the folder. A bare relative file name resolves to the current
/// directory, which is never created.
///
/// # Errors
///
/// Returns `NoParentFolder` when `path` has no parent component (a root or
/// an empty path).
pub fn ensure_folder_exists_for(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let parent = path.parent().ok_or_else(|| Error::NoParentFolder {
        path: path.to_path_buf(),
    })?;

    if parent.as_os_str().is_empty() {
        return Ok(PathBuf::from("."));
    }

    if !parent.is_dir() {
        tracing::debug!(?parent, "Creating folder");
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    Ok(parent.to_path_buf())
}

/// Create an empty file at `path` unless one is already there.
///
/// Returns `true` when this call created the file. Concurrent creators may
/// race; losing the race is not an error.
pub fn ensure_file_exists_at(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    if path.is_file() {
        return Ok(false);
    }

    ensure_folder_exists_for(path)?;

    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => {
            tracing::debug!(?path, "Created empty file");
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_file() => {
            tracing::debug!(?path, "File appeared while creating it");
            Ok(false)
        }
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Write content atomically to a file with locking.
///
/// Holds an exclusive advisory lock on a `<path>.lock` sidecar for the
/// duration of the write, then writes to a temp file in the same folder
/// and renames it over the target.
///
/// The sidecar is left in place afterwards. A writer blocked on it holds an
/// open handle, so deleting it would let the next writer lock a fresh file
/// and run concurrently with the blocked one.
pub fn write_atomic(path: impl AsRef<Path>, content: &[u8], config: RobustnessConfig) -> Result<()> {
    let path = path.as_ref();
    ensure_folder_exists_for(path)?;

    let lock_path = sidecar(path, "lock");
    let lock_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)
        .map_err(|e| Error::io(&lock_path, e))?;
    acquire_lock(&lock_file, path, config.lock_timeout)?;

    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(&temp_name);

    let written = write_temp(&temp_path, content, config.enable_fsync)
        .and_then(|()| fs::rename(&temp_path, path).map_err(|e| Error::io(path, e)));
    if written.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    FileExt::unlock(&lock_file).map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;

    written
}

/// Write text content to a file atomically.
pub fn write_text(path: impl AsRef<Path>, content: &str, config: RobustnessConfig) -> Result<()> {
    write_atomic(path, content.as_bytes(), config)
}

fn write_temp(temp_path: &Path, content: &[u8], fsync: bool) -> Result<()> {
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(temp_path, e))?;

    if fsync {
        temp_file.sync_all().map_err(|e| Error::io(temp_path, e))?;
    }
    Ok(())
}

fn acquire_lock(lock_file: &File, path: &Path, timeout: Duration) -> Result<()> {
    let policy = ExponentialBackoff {
        initial_interval: Duration::from_millis(10),
        max_interval: Duration::from_millis(250),
        max_elapsed_time: Some(timeout),
        ..ExponentialBackoff::default()
    };

    backoff::retry(policy, || {
        lock_file
            .try_lock_exclusive()
            .map_err(backoff::Error::transient)
    })
    .map_err(|e| {
        tracing::warn!(?path, error = %e, "Timed out waiting for write lock");
        Error::LockFailed {
            path: path.to_path_buf(),
        }
    })
}

fn sidecar(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}
