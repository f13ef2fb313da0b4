//! Scoped archive files and the filesystem seam.
//!
//! An archive handle is acquired immediately before a backend read/write and
//! must be released on every exit path, including error propagation out of
//! the backend call. [`ScopedArchive`] encodes that guarantee as a drop
//! guard.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Raw handle behind a [`ScopedArchive`]. Implementations own the actual
/// resource; the guard calls `close` at most once.
pub trait ArchiveHandle: Send {
    /// Qualified location of the archive.
    fn uri(&self) -> &Path;

    /// Release the resource.
    fn close(&mut self);
}

/// RAII guard over an archive file.
pub struct ScopedArchive {
    handle: Option<Box<dyn ArchiveHandle>>,
    uri: PathBuf,
}

impl ScopedArchive {
    pub fn new(handle: Box<dyn ArchiveHandle>) -> Self {
        let uri = handle.uri().to_path_buf();
        Self {
            handle: Some(handle),
            uri,
        }
    }

    pub fn uri(&self) -> &Path {
        &self.uri
    }

    /// Explicit close. The drop guard makes this optional; it exists for
    /// callers that want the release to happen before end of scope.
    pub fn close(mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.close();
        }
    }
}

impl Drop for ScopedArchive {
    fn drop(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.close();
        }
    }
}

/// Filesystem seam: path qualification and archive acquisition.
pub trait Filesystem: Send + Sync {
    /// Qualify a possibly-relative path against this filesystem's root.
    fn qualify(&self, path: &Path) -> PathBuf;

    /// Open a scoped archive at `path`, creating parent directories as
    /// needed.
    fn open_archive(&self, path: &Path) -> Result<ScopedArchive>;
}

/// Local filesystem implementation.
pub struct LocalFs;

struct LocalArchive {
    uri: PathBuf,
    file: Option<File>,
}

impl ArchiveHandle for LocalArchive {
    fn uri(&self) -> &Path {
        &self.uri
    }

    fn close(&mut self) {
        // Dropping the descriptor releases it; flushing payload bytes is
        // the backend's concern.
        self.file.take();
    }
}

impl Filesystem for LocalFs {
    fn qualify(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    }

    fn open_archive(&self, path: &Path) -> Result<ScopedArchive> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;
        Ok(ScopedArchive::new(Box::new(LocalArchive {
            uri: path.to_path_buf(),
            file: Some(file),
        })))
    }
}
