// src/fs/directory.rs

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Context;
use tracing::debug;

use crate::errors::{GirError, Result};

/// `None` means "follow the process working directory".
static CURRENT_DIRECTORY: Mutex<Option<PathBuf>> = Mutex::new(None);

fn tracked() -> MutexGuard<'static, Option<PathBuf>> {
    CURRENT_DIRECTORY
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// The real working directory of the process.
pub fn cwd() -> Result<PathBuf> {
    let dir = std::env::current_dir().context("reading process working directory")?;
    Ok(dir)
}

/// The directory gir operations currently run in.
pub fn current_directory() -> Result<PathBuf> {
    match tracked().clone() {
        Some(dir) => Ok(dir),
        None => cwd(),
    }
}

/// Resolve `path` against the current directory. Absolute paths are
/// returned as is.
pub fn resolve(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(current_directory()?.join(path))
    }
}

/// Make `path` (resolved against the current directory) the current
/// directory. It must exist and be a directory.
pub fn set_current_directory(path: impl AsRef<Path>) -> Result<()> {
    let dir = resolve(path)?;
    if !dir.is_dir() {
        return Err(GirError::DirectoryNotFound(dir));
    }
    debug!(dir = %dir.display(), "current directory changed");
    *tracked() = Some(dir);
    Ok(())
}

/// Forget any tracked directory and follow the process working directory
/// again.
pub fn reset_current_directory() {
    *tracked() = None;
}

/// Run `action` with `path` as the current directory, restoring the previous
/// directory afterwards on every exit path.
///
/// Relative paths are resolved against the directory active at the call, so
/// nested calls compose.
pub fn in_directory<T, E, F>(path: impl AsRef<Path>, action: F) -> std::result::Result<T, E>
where
    F: FnOnce() -> std::result::Result<T, E>,
    E: From<GirError>,
{
    let _restore = DirectoryScope::enter(path.as_ref())?;
    action()
}

/// Restores the tracked directory it replaced when dropped.
struct DirectoryScope {
    previous: Option<PathBuf>,
}

impl DirectoryScope {
    fn enter(path: &Path) -> Result<Self> {
        let dir = resolve(path)?;
        if !dir.is_dir() {
            return Err(GirError::DirectoryNotFound(dir));
        }

        let previous = std::mem::replace(&mut *tracked(), Some(dir.clone()));
        debug!(dir = %dir.display(), "entered directory");
        Ok(Self { previous })
    }
}

impl Drop for DirectoryScope {
    fn drop(&mut self) {
        let previous = self.previous.take();
        if let Some(dir) = &previous {
            debug!(dir = %dir.display(), "restored directory");
        }
        *tracked() = previous;
    }
}
