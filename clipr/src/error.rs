//! Clipboard error types

use compact_str::CompactString;
use thiserror::Error;

pub type ClipResult<T> = Result<T, ClipError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipError {
    #[error("Nothing is staged on the clipboard")]
    NoPendingClipboard,

    #[error("Invalid clipboard source path: {0}")]
    InvalidPath(CompactString),

    #[error("Clipboard configuration error: {0}")]
    ConfigError(CompactString),
}

impl ClipError {
    /// Create invalid path error with path conversion
    #[inline]
    pub fn invalid_path(path: &std::path::Path) -> Self {
        Self::InvalidPath(CompactString::from(path.to_string_lossy()))
    }

    #[inline]
    pub fn config_error(message: impl Into<CompactString>) -> Self {
        Self::ConfigError(message.into())
    }
}
