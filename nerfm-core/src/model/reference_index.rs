//! ``src/model/reference_index.rs``
//! ============================================================================
//! # Reference Index: Ordinals over a Directory Listing
//!
//! A reference (NER) is a 1-based position into one listing snapshot. The
//! snapshot is taken right before resolution and never reused after the
//! directory may have changed; a stale reference can silently point at a
//! different entry.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::AppError;
use crate::fs::file_system::FileSystem;

/// Entry names of one directory, in filesystem order. Names are kept as the
/// platform returns them; only display goes through a lossy conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryListing {
    directory: PathBuf,
    entries: Vec<OsString>,
}

impl DirectoryListing {
    pub fn new(directory: PathBuf, entries: Vec<OsString>) -> Self {
        Self { directory, entries }
    }

    /// Fresh snapshot of `directory`.
    pub fn read<F: FileSystem + ?Sized>(fs: &F, directory: &Path) -> Result<Self, AppError> {
        let entries = fs.list_entries(directory).map_err(|e| {
            AppError::file_operation_failed("list", directory, e)
        })?;
        debug!(directory = %directory.display(), entries = entries.len(), "Listed directory");

        Ok(Self::new(directory.to_path_buf(), entries))
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn entries(&self) -> &[OsString] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn resolve(&self, reference: usize) -> Result<&OsStr, AppError> {
        resolve(reference, &self.entries)
    }

    /// Absolute path of the referenced entry.
    pub fn resolve_path(&self, reference: usize) -> Result<PathBuf, AppError> {
        self.resolve(reference).map(|name| self.directory.join(name))
    }

    /// `(reference, name)` pairs in display order.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &OsStr)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, name)| (idx + 1, name.as_os_str()))
    }
}

/// Valid references are `1..=entries.len()`.
pub fn resolve(reference: usize, entries: &[OsString]) -> Result<&OsStr, AppError> {
    reference
        .checked_sub(1)
        .and_then(|idx| entries.get(idx))
        .map(OsString::as_os_str)
        .ok_or_else(|| AppError::out_of_range(reference, entries.len()))
}
