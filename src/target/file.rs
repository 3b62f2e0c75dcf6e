// src/target/file.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::trace;

use super::Target;
use crate::errors::FetchError;

/// A target backed by a file on disk.
///
/// Every fetch reads the entire file. Any read failure (missing file,
/// permission denied, path is a directory, ...) becomes a
/// [`FetchError::Io`].
#[derive(Debug, Clone)]
pub struct FileTarget {
    path: PathBuf,
    fail_open: bool,
}

impl FileTarget {
    /// `fail_open = true` is the recommended setting: a config file that
    /// disappears should make dependents attempt a reload.
    pub fn new(path: impl Into<PathBuf>, fail_open: bool) -> Self {
        Self {
            path: path.into(),
            fail_open,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Target for FileTarget {
    fn fail_open(&self) -> bool {
        self.fail_open
    }

    fn content(&self) -> Result<Vec<u8>, FetchError> {
        trace!(path = ?self.path, "reading file target");
        fs::read(&self.path).map_err(|source| FetchError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
