//! Two-tree storage layout.
//!
//! Originals and thumbnails live in parallel directories under the same
//! generated filename:
//!
//! ```text
//! uploads/
//! ├── images/
//! │   └── aB3dE5gH7j_1714564800.jpg
//! └── thumbnails/
//!     └── aB3dE5gH7j_1714564800.jpg
//! ```

use crate::config::StorageConfig;
use crate::types::StoragePaths;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Which of a stored image's files a removal actually deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovedFiles {
    pub original: bool,
    pub thumbnail: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    pub originals: PathBuf,
    pub thumbnails: PathBuf,
}

impl StorageLayout {
    pub fn new(originals: impl Into<PathBuf>, thumbnails: impl Into<PathBuf>) -> Self {
        Self {
            originals: originals.into(),
            thumbnails: thumbnails.into(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.originals_dir, &config.thumbnails_dir)
    }

    /// Create both trees. Already-existing directories are fine.
    pub fn ensure_dirs(&self) -> io::Result<()> {
        fs::create_dir_all(&self.originals)?;
        fs::create_dir_all(&self.thumbnails)
    }

    pub fn paths_for(&self, stored_filename: &str) -> StoragePaths {
        StoragePaths {
            original: self.originals.join(stored_filename),
            thumbnail: self.thumbnails.join(stored_filename),
        }
    }

    /// Whether either tree already holds a file of this name.
    pub fn is_taken(&self, stored_filename: &str) -> bool {
        let paths = self.paths_for(stored_filename);
        paths.original.exists() || paths.thumbnail.exists()
    }

    /// Move an uploaded payload into the originals tree.
    ///
    /// Falls back to copy-then-delete when a rename is impossible (the temp
    /// payload sits on another filesystem). A copy that fails partway has its
    /// partial target removed before the error is returned.
    pub fn store_original(&self, payload: &Path, stored_filename: &str) -> io::Result<PathBuf> {
        let target = self.originals.join(stored_filename);
        if let Err(rename_err) = fs::rename(payload, &target) {
            debug!(
                from = %payload.display(),
                to = %target.display(),
                error = %rename_err,
                "rename failed, copying"
            );
            if let Err(copy_err) = fs::copy(payload, &target) {
                if let Err(e) = remove_if_present(&target) {
                    warn!(path = %target.display(), error = %e, "partial original left behind");
                }
                return Err(copy_err);
            }
            if let Err(e) = fs::remove_file(payload) {
                debug!(path = %payload.display(), error = %e, "payload left behind after copy");
            }
        }
        Ok(target)
    }

    /// Delete both files of a stored image, tolerating already-missing ones.
    pub fn remove(&self, stored_filename: &str) -> io::Result<RemovedFiles> {
        let paths = self.paths_for(stored_filename);
        Ok(RemovedFiles {
            original: remove_if_present(&paths.original)?,
            thumbnail: remove_if_present(&paths.thumbnail)?,
        })
    }
}

fn remove_if_present(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
