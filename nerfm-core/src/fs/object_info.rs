//! `src/fs/object_info.rs`
//! ============================================================
//! Per-entry classification for the listing and the `visu` command.
//!
//! An entry is a directory, a text file, or any other file. Text detection
//! probes only the head of the file, so a listing never reads whole files.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use bytesize::ByteSize;
use compact_str::CompactString;

use crate::fs::file_system::FileSystem;

/// Bytes inspected when deciding whether a file is text.
pub const TEXT_PROBE_BYTES: usize = 8 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Dir,
    TextFile,
    File,
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dir => write!(f, "Dir"),
            Self::TextFile => write!(f, "Text"),
            Self::File => write!(f, "File"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub path: PathBuf,
    pub name: CompactString,
    pub object_type: ObjectType,
}

impl ObjectInfo {
    /// Classify `dir/name`. Unreadable files are reported as plain files.
    pub fn from_entry<F: FileSystem + ?Sized>(
        fs: &F,
        dir: &Path,
        name: impl AsRef<OsStr>,
    ) -> Self {
        let name = name.as_ref();
        let path = dir.join(name);
        let object_type = if fs.is_dir(&path) {
            ObjectType::Dir
        } else if fs.is_file(&path) && is_text_file(fs, &path) {
            ObjectType::TextFile
        } else {
            ObjectType::File
        };

        Self {
            path,
            name: CompactString::new(name.to_string_lossy()),
            object_type,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.object_type == ObjectType::Dir
    }
}

/// UTF-8 with no control characters other than whitespace.
pub fn is_text_file<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> bool {
    match fs.read_head(path, TEXT_PROBE_BYTES) {
        Ok(head) => looks_like_text(&head, head.len() == TEXT_PROBE_BYTES),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Text probe failed");
            false
        }
    }
}

/// `truncated` tolerates a multi-byte character cut off at the end of the probe.
fn looks_like_text(bytes: &[u8], truncated: bool) -> bool {
    let valid = match std::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) if truncated && e.error_len().is_none() => {
            // valid_up_to() is a char boundary by construction
            match std::str::from_utf8(&bytes[..e.valid_up_to()]) {
                Ok(text) => text,
                Err(_) => return false,
            }
        }
        Err(_) => return false,
    };

    !valid.chars().any(|c| c.is_control() && !c.is_whitespace())
}

pub fn human_size(bytes: u64) -> String {
    ByteSize::b(bytes).to_string()
}
