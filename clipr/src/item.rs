use crate::error::{ClipError, ClipResult};
use std::path::{Path, PathBuf};

/// What a paste does with the source afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardIntent {
    /// Non-destructive; stays pending after a paste
    Copy,

    /// Destructive and one-shot; the source is removed once pasted or abandoned
    Cut,
}

impl ClipboardIntent {
    pub fn is_cut(self) -> bool {
        matches!(self, ClipboardIntent::Cut)
    }

    pub fn tag(self) -> &'static str {
        match self {
            ClipboardIntent::Copy => "copy",
            ClipboardIntent::Cut => "cut",
        }
    }
}

impl std::fmt::Display for ClipboardIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    File,
    Directory,
}

/// One file or directory captured at staging time, relative to the staged source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub relative_path: PathBuf,
    pub annotation: String,
}

impl ManifestEntry {
    pub fn new(relative_path: impl Into<PathBuf>, annotation: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            annotation: annotation.into(),
        }
    }

    pub fn is_annotated(&self) -> bool {
        !self.annotation.is_empty()
    }
}

/// Ordered (relative path, annotation) pairs replayed at paste time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    kind: SourceKind,
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Manifest of a single file: one entry named after the file.
    pub fn single_file(file_name: impl Into<PathBuf>, annotation: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::File,
            entries: vec![ManifestEntry::new(file_name, annotation)],
        }
    }

    /// Manifest of a directory subtree; the root itself uses an empty relative path.
    pub fn directory(entries: Vec<ManifestEntry>) -> Self {
        Self {
            kind: SourceKind::Directory,
            entries,
        }
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn annotated_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_annotated()).count()
    }

    /// Where `entry` lands once the source is duplicated to `destination_root`.
    pub fn destination_for(&self, entry: &ManifestEntry, destination_root: &Path) -> PathBuf {
        match self.kind {
            SourceKind::File => destination_root.to_path_buf(),
            SourceKind::Directory if entry.relative_path.as_os_str().is_empty() => {
                destination_root.to_path_buf()
            }
            SourceKind::Directory => destination_root.join(&entry.relative_path),
        }
    }

    /// Destination path and text for every annotated entry, in manifest order.
    pub fn associations<'a>(
        &'a self,
        destination_root: &'a Path,
    ) -> impl Iterator<Item = (PathBuf, &'a str)> + 'a {
        self.entries
            .iter()
            .filter(|entry| entry.is_annotated())
            .map(move |entry| {
                (
                    self.destination_for(entry, destination_root),
                    entry.annotation.as_str(),
                )
            })
    }
}

/// The single pending clipboard slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardEntry {
    pub source_path: PathBuf,
    pub intent: ClipboardIntent,
    pub manifest: Manifest,
}

impl ClipboardEntry {
    pub fn new(source_path: PathBuf, intent: ClipboardIntent, manifest: Manifest) -> ClipResult<Self> {
        if source_path.file_name().is_none() {
            return Err(ClipError::invalid_path(&source_path));
        }

        Ok(Self {
            source_path,
            intent,
            manifest,
        })
    }

    pub fn source_kind(&self) -> SourceKind {
        self.manifest.kind()
    }
}
