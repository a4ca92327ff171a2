//! src/error.rs
//! ============================================================================
//! # `AppError`: Unified Error Type for the Browser Shell
//!
//! Every core operation returns `Result<T, AppError>`. All variants are
//! recoverable at the command boundary: the shell prints them and keeps going.

use clipr::ClipError;
use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Ordinal outside the bounds of the listing it was resolved against.
    #[error("Invalid reference {reference}: the listing has {len} entries")]
    OutOfRangeReference { reference: usize, len: usize },

    /// Ascend attempted at the session root.
    #[error("Already at the root directory {0:?}: there is no parent to go to")]
    RootBoundary(PathBuf),

    /// Paste with nothing staged.
    #[error("Nothing to paste: no file has been copied or cut")]
    NoPendingClipboard,

    /// I/O error while duplicating a staged source; partial output may remain.
    #[error("Copy of {source_path:?} to {destination:?} failed (partial output may remain): {source}")]
    CopyFailure {
        source_path: PathBuf,
        destination: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The annotation side-file could not be read or written; nothing was applied.
    #[error("Annotation file {path:?} unusable: {reason}")]
    AnnotationIo { path: PathBuf, reason: String },

    /// A name given alongside a reference does not match the referenced entry.
    #[error("Name {given:?} does not match reference {reference} ({expected:?})")]
    NameMismatch {
        reference: usize,
        expected: String,
        given: String,
    },

    #[error("Not a directory: {0:?}")]
    NotADirectory(PathBuf),

    /// Input validation errors
    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },

    /// File operation specific errors
    #[error("File operation '{operation}' failed on {path:?}: {reason}")]
    FileOperationFailed {
        operation: String, // "delete", "mkdir", "touch", "find", "view"
        path: PathBuf,
        reason: String,
    },

    #[error(transparent)]
    Clipboard(ClipError),

    /// Standard IO error, auto-converted from `io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Config file I/O error with path.
    #[error("Failed to access config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AppError {
    pub fn out_of_range(reference: usize, len: usize) -> Self {
        Self::OutOfRangeReference { reference, len }
    }

    pub fn copy_failure<P1, P2>(source_path: P1, destination: P2, source: io::Error) -> Self
    where
        P1: Into<PathBuf>,
        P2: Into<PathBuf>,
    {
        Self::CopyFailure {
            source_path: source_path.into(),
            destination: destination.into(),
            source,
        }
    }

    pub fn annotation_io<P: Into<PathBuf>, S: ToString>(path: P, reason: S) -> Self {
        Self::AnnotationIo {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an input validation error
    pub fn invalid_input<S1: Into<String>, S2: Into<String>>(field: S1, message: S2) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a file operation failure error
    pub fn file_operation_failed<S1, P, S2>(operation: S1, path: P, reason: S2) -> Self
    where
        S1: Into<String>,
        P: Into<PathBuf>,
        S2: ToString,
    {
        Self::FileOperationFailed {
            operation: operation.into(),
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Short category name used in log records.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OutOfRangeReference { .. } => "out_of_range_reference",
            Self::RootBoundary(_) => "root_boundary",
            Self::NoPendingClipboard => "no_pending_clipboard",
            Self::CopyFailure { .. } => "copy_failure",
            Self::AnnotationIo { .. } => "annotation_io",
            Self::NameMismatch { .. } => "name_mismatch",
            Self::NotADirectory(_) => "not_a_directory",
            Self::InvalidInput { .. } => "invalid_input",
            Self::FileOperationFailed { .. } => "file_operation_failed",
            Self::Clipboard(_) => "clipboard",
            Self::Io(_) => "io",
            Self::Config(_) | Self::ConfigSerialize(_) | Self::ConfigIo { .. } => "config",
        }
    }
}

impl From<ClipError> for AppError {
    fn from(err: ClipError) -> Self {
        match err {
            ClipError::NoPendingClipboard => Self::NoPendingClipboard,
            other => Self::Clipboard(other),
        }
    }
}
