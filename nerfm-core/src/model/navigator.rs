//! ``src/model/navigator.rs``
//! ============================================================================
//! # `Navigator`: Current Directory Tracking
//!
//! Owns the session's current directory. Only `descend` and `ascend` mutate
//! it, and `ascend` never climbs above the root the session started in.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Navigator {
    root: PathBuf,
    current: PathBuf,
}

impl Navigator {
    /// Start at `root`, which is also the boundary `ascend` stops at.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            current: root.clone(),
            root,
        }
    }

    pub fn current(&self) -> &Path {
        &self.current
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_at_root(&self) -> bool {
        self.current == self.root
    }

    /// Move into `current/name`. Callers check that the target is a directory.
    pub fn descend(&mut self, name: impl AsRef<Path>) -> &Path {
        self.current.push(name);
        debug!(cwd = %self.current.display(), "Descended");
        &self.current
    }

    /// Move to the parent, failing at the session root.
    pub fn ascend(&mut self) -> Result<&Path, AppError> {
        if self.is_at_root() {
            return Err(AppError::RootBoundary(self.current.clone()));
        }

        if !self.current.pop() {
            return Err(AppError::RootBoundary(self.current.clone()));
        }

        debug!(cwd = %self.current.display(), "Ascended");
        Ok(&self.current)
    }
}
