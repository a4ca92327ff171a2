use crate::config::ClipboardConfig;
use crate::error::{ClipError, ClipResult};
use crate::item::{ClipboardEntry, ClipboardIntent, SourceKind};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// A paste resolved against a target directory, before any byte is copied.
#[derive(Debug, Clone)]
pub struct PasteOperation {
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    pub intent: ClipboardIntent,
    pub source_kind: SourceKind,
    pub file_operation: FileOperation,
}

impl PasteOperation {
    pub fn new(
        entry: &ClipboardEntry,
        target_dir: &Path,
        config: &ClipboardConfig,
    ) -> ClipResult<Self> {
        let file_name = entry
            .source_path
            .file_name()
            .ok_or_else(|| ClipError::invalid_path(&entry.source_path))?;

        let destination_path = target_dir.join(destination_name(
            file_name,
            entry.intent,
            entry.source_kind(),
            &config.copy_suffix,
        ));

        let file_operation = match entry.intent {
            ClipboardIntent::Copy => FileOperation::Copy {
                source: entry.source_path.clone(),
                dest: destination_path.clone(),
            },
            ClipboardIntent::Cut => FileOperation::Move {
                source: entry.source_path.clone(),
                dest: destination_path.clone(),
            },
        };

        Ok(Self {
            source_path: entry.source_path.clone(),
            destination_path,
            intent: entry.intent,
            source_kind: entry.source_kind(),
            file_operation,
        })
    }

    /// A cut pasted onto its own location keeps the source.
    pub fn removes_source(&self) -> bool {
        self.intent.is_cut() && self.destination_path != self.source_path
    }
}

/// Name the pasted item gets in the target directory.
///
/// Cut keeps the name. Copy inserts `suffix` between stem and extension for files,
/// and appends it to directory names.
pub fn destination_name(
    file_name: &OsStr,
    intent: ClipboardIntent,
    kind: SourceKind,
    suffix: &str,
) -> OsString {
    if intent.is_cut() {
        return file_name.to_os_string();
    }

    let as_path = Path::new(file_name);
    let mut name = match (kind, as_path.file_stem(), as_path.extension()) {
        (SourceKind::File, Some(stem), Some(_)) => stem.to_os_string(),
        _ => file_name.to_os_string(),
    };
    name.push(suffix);

    if kind == SourceKind::File
        && let Some(extension) = as_path.extension()
    {
        name.push(".");
        name.push(extension);
    }

    name
}

#[derive(Debug, Clone)]
pub enum FileOperation {
    Copy { source: PathBuf, dest: PathBuf },
    Move { source: PathBuf, dest: PathBuf },
}

impl FileOperation {
    pub fn dest_path(&self) -> &PathBuf {
        match self {
            FileOperation::Copy { dest, .. } => dest,
            FileOperation::Move { dest, .. } => dest,
        }
    }

    pub fn operation_name(&self) -> &'static str {
        match self {
            FileOperation::Copy { .. } => "Copy",
            FileOperation::Move { .. } => "Move",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Manifest;

    fn name(file: &str, intent: ClipboardIntent, kind: SourceKind) -> String {
        destination_name(OsStr::new(file), intent, kind, "-copy")
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn copy_inserts_suffix_before_extension() {
        assert_eq!(name("a.txt", ClipboardIntent::Copy, SourceKind::File), "a-copy.txt");
        assert_eq!(
            name("archive.tar.gz", ClipboardIntent::Copy, SourceKind::File),
            "archive.tar-copy.gz"
        );
        assert_eq!(name("Makefile", ClipboardIntent::Copy, SourceKind::File), "Makefile-copy");
        assert_eq!(name(".bashrc", ClipboardIntent::Copy, SourceKind::File), ".bashrc-copy");
    }

    #[test]
    fn directories_get_suffix_appended() {
        assert_eq!(name("dir", ClipboardIntent::Copy, SourceKind::Directory), "dir-copy");
        assert_eq!(
            name("photos.2024", ClipboardIntent::Copy, SourceKind::Directory),
            "photos.2024-copy"
        );
    }

    #[test]
    fn cut_keeps_the_name() {
        assert_eq!(name("a.txt", ClipboardIntent::Cut, SourceKind::File), "a.txt");
        assert_eq!(name("dir", ClipboardIntent::Cut, SourceKind::Directory), "dir");
    }

    #[test]
    fn cut_onto_itself_does_not_remove_source() {
        let entry = ClipboardEntry::new(
            PathBuf::from("/root/a.txt"),
            ClipboardIntent::Cut,
            Manifest::single_file("a.txt", ""),
        )
        .unwrap();

        let same = PasteOperation::new(&entry, Path::new("/root"), &ClipboardConfig::default())
            .unwrap();
        assert_eq!(same.destination_path, PathBuf::from("/root/a.txt"));
        assert!(!same.removes_source());
        assert_eq!(same.file_operation.operation_name(), "Move");

        let elsewhere =
            PasteOperation::new(&entry, Path::new("/other"), &ClipboardConfig::default())
                .unwrap();
        assert!(elsewhere.removes_source());
    }

    #[test]
    fn copy_plan_uses_configured_suffix() {
        let entry = ClipboardEntry::new(
            PathBuf::from("/root/a.txt"),
            ClipboardIntent::Copy,
            Manifest::single_file("a.txt", ""),
        )
        .unwrap();
        let config = ClipboardConfig {
            copy_suffix: "_dup".to_string(),
        };

        let op = PasteOperation::new(&entry, Path::new("/t"), &config).unwrap();
        assert_eq!(op.destination_path, PathBuf::from("/t/a_dup.txt"));
        assert_eq!(op.file_operation.dest_path(), &op.destination_path);
        assert!(!op.removes_source());
    }
}
