//! ``src/controller/clipboard_manager.rs``
//! ============================================================================
//! # `ClipboardManager`: Copy, Cut and Paste with Annotation Carry-Over
//!
//! Wraps the pure [`clipr::Clipboard`] state machine and performs the
//! filesystem side of each transition through a [`FileSystemOperator`].
//!
//! - `stage` abandons the pending entry (deleting a pending cut's source),
//!   then snapshots the annotations of the new source into a manifest.
//! - `paste` duplicates the source, replays the manifest at the destination
//!   and, for a cut, removes the source and empties the slot.
//! - `abandon` is the explicit Pending -> Empty transition; the session calls
//!   it on exit.

use std::path::{Path, PathBuf};

use clipr::{
    Clipboard, ClipboardConfig, ClipboardEntry, ClipboardIntent, Manifest, ManifestEntry,
};
use tracing::{debug, info, instrument, warn};

use crate::error::AppError;
use crate::fs::file_system::FileSystem;
use crate::operators::file_system_operator::{CopyStats, FileSystemOperator};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub intent: ClipboardIntent,
    pub stats: CopyStats,
    pub annotations_copied: usize,
    pub source_removed: bool,
}

#[derive(Debug, Default)]
pub struct ClipboardManager {
    clipboard: Clipboard,
}

impl ClipboardManager {
    pub fn new(config: ClipboardConfig) -> Self {
        Self {
            clipboard: Clipboard::new(config),
        }
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn pending(&self) -> Option<&ClipboardEntry> {
        self.clipboard.pending()
    }

    /// Make `source` the pending entry.
    ///
    /// A pending cut is honoured first, so its source is gone even if building
    /// the new manifest fails; the slot is then left empty.
    #[instrument(level = "info", skip_all, fields(source = %source.display(), intent = %intent))]
    pub fn stage<F: FileSystem + ?Sized>(
        &mut self,
        ops: &FileSystemOperator<'_, F>,
        source: &Path,
        intent: ClipboardIntent,
    ) -> Result<&ClipboardEntry, AppError> {
        self.abandon(ops)?;

        if !ops.fs().exists(source) {
            return Err(AppError::file_operation_failed(
                intent.tag(),
                source,
                "path does not exist",
            ));
        }

        let manifest = build_manifest(ops, source)?;
        let entry = ClipboardEntry::new(source.to_path_buf(), intent, manifest)?;
        info!(
            entries = entry.manifest.len(),
            annotated = entry.manifest.annotated_count(),
            "Staged"
        );

        self.clipboard.stage(entry);
        self.clipboard.pending().ok_or(AppError::NoPendingClipboard)
    }

    /// Paste the pending entry into `target_dir`.
    ///
    /// Any failure while duplicating leaves the partial output in place and
    /// the clipboard untouched.
    #[instrument(level = "info", skip_all, fields(target = %target_dir.display()))]
    pub fn paste<F: FileSystem + ?Sized>(
        &mut self,
        ops: &FileSystemOperator<'_, F>,
        target_dir: &Path,
    ) -> Result<PasteReport, AppError> {
        let plan = self.clipboard.plan_paste(target_dir)?;
        debug!(
            operation = plan.file_operation.operation_name(),
            destination = %plan.file_operation.dest_path().display(),
            "Paste planned"
        );
        let source = plan.source_path.clone();
        let destination = plan.destination_path.clone();

        if plan.intent.is_cut() && destination == source {
            // already where it belongs
            debug!("Cut pasted onto its own location");
            self.clipboard.consume_cut();
            return Ok(PasteReport {
                source,
                destination,
                intent: plan.intent,
                stats: CopyStats::default(),
                annotations_copied: 0,
                source_removed: false,
            });
        }

        if plan.intent.is_cut() && destination.starts_with(&source) {
            return Err(AppError::invalid_input(
                "paste",
                format!("cannot move {source:?} into itself"),
            ));
        }

        let stats = ops.copy_tree(&source, &destination)?;

        let annotations_copied = match self.clipboard.pending() {
            Some(entry) => ops.store().copy_associations(&entry.manifest, &destination)?,
            None => 0,
        };

        let source_removed = plan.removes_source();
        if source_removed {
            ops.delete(&source)?;
            self.clipboard.consume_cut();
        }

        info!(
            destination = %destination.display(),
            files = stats.files,
            annotations_copied,
            source_removed,
            "Pasted"
        );

        Ok(PasteReport {
            source,
            destination,
            intent: plan.intent,
            stats,
            annotations_copied,
            source_removed,
        })
    }

    /// Pending -> Empty. A cut's source is deleted, since the user committed
    /// to moving it away.
    pub fn abandon<F: FileSystem + ?Sized>(
        &mut self,
        ops: &FileSystemOperator<'_, F>,
    ) -> Result<Option<ClipboardEntry>, AppError> {
        let Some(entry) = self.clipboard.abandon() else {
            return Ok(None);
        };

        if entry.intent.is_cut() && ops.fs().exists(&entry.source_path) {
            warn!(source = %entry.source_path.display(), "Abandoning pending cut, deleting its source");
            ops.delete(&entry.source_path)?;
        } else {
            debug!(source = %entry.source_path.display(), "Clipboard cleared");
        }

        Ok(Some(entry))
    }
}

/// Snapshot the annotations under `source`. The directory root itself gets
/// an empty relative path. Files and links to anything are single entries,
/// matching how `copy_tree` duplicates them.
fn build_manifest<F: FileSystem + ?Sized>(
    ops: &FileSystemOperator<'_, F>,
    source: &Path,
) -> Result<Manifest, AppError> {
    let walked = ops
        .fs()
        .walk(source)
        .map_err(|e| AppError::file_operation_failed("walk", source, e))?;

    if !walked.first().is_some_and(|root| root.is_dir) {
        let file_name = source
            .file_name()
            .ok_or_else(|| AppError::invalid_input("source", format!("{source:?} has no file name")))?;
        return Ok(Manifest::single_file(
            file_name,
            ops.store().lookup(source)?,
        ));
    }

    let annotations = ops
        .store()
        .lookup_many(walked.iter().map(|entry| entry.path.as_path()))?;

    let entries = walked
        .iter()
        .zip(annotations)
        .filter_map(|(entry, annotation)| {
            entry
                .path
                .strip_prefix(source)
                .ok()
                .map(|relative| ManifestEntry::new(relative, annotation))
        })
        .collect();

    Ok(Manifest::directory(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::file_system::{LocalFileSystem, WalkEntry};
    use crate::model::annotation_store::AnnotationStore;
    use clipr::ClipboardState;
    use std::{ffi::OsString, fs, io};
    use tempfile::TempDir;

    /// Delegates to the local filesystem but refuses to copy files with a given name.
    struct FailingCopy {
        poisoned: &'static str,
    }

    impl FileSystem for FailingCopy {
        fn list_entries(&self, dir: &Path) -> io::Result<Vec<OsString>> {
            LocalFileSystem.list_entries(dir)
        }
        fn is_dir(&self, path: &Path) -> bool {
            LocalFileSystem.is_dir(path)
        }
        fn is_file(&self, path: &Path) -> bool {
            LocalFileSystem.is_file(path)
        }
        fn exists(&self, path: &Path) -> bool {
            LocalFileSystem.exists(path)
        }
        fn read_text(&self, path: &Path) -> io::Result<String> {
            LocalFileSystem.read_text(path)
        }
        fn read_head(&self, path: &Path, limit: usize) -> io::Result<Vec<u8>> {
            LocalFileSystem.read_head(path, limit)
        }
        fn file_size(&self, path: &Path) -> io::Result<u64> {
            LocalFileSystem.file_size(path)
        }
        fn copy_file(&self, from: &Path, to: &Path) -> io::Result<u64> {
            if from.file_name().is_some_and(|n| n == self.poisoned) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "poisoned"));
            }
            LocalFileSystem.copy_file(from, to)
        }
        fn copy_link(&self, from: &Path, to: &Path) -> io::Result<()> {
            LocalFileSystem.copy_link(from, to)
        }
        fn create_dir(&self, path: &Path) -> io::Result<()> {
            LocalFileSystem.create_dir(path)
        }
        fn create_file(&self, path: &Path) -> io::Result<()> {
            LocalFileSystem.create_file(path)
        }
        fn remove_file(&self, path: &Path) -> io::Result<()> {
            LocalFileSystem.remove_file(path)
        }
        fn remove_empty_dir(&self, path: &Path) -> io::Result<()> {
            LocalFileSystem.remove_empty_dir(path)
        }
        fn walk(&self, root: &Path) -> io::Result<Vec<WalkEntry>> {
            LocalFileSystem.walk(root)
        }
    }

    struct Fixture {
        temp_dir: TempDir,
        store: AnnotationStore,
        manager: ClipboardManager,
    }

    impl Fixture {
        fn new() -> Self {
            let temp_dir = TempDir::new().unwrap();
            let root = temp_dir.path().join("root");
            fs::create_dir_all(root.join("dir")).unwrap();
            fs::create_dir_all(root.join("other")).unwrap();
            fs::write(root.join("dir").join("x.txt"), "payload").unwrap();
            fs::write(root.join("dir").join("z.txt"), "zzz").unwrap();
            fs::write(root.join("f.txt"), "file bytes").unwrap();
            let store = AnnotationStore::new(temp_dir.path().join("annotations.json"));
            Self {
                temp_dir,
                store,
                manager: ClipboardManager::default(),
            }
        }

        fn root(&self) -> PathBuf {
            self.temp_dir.path().join("root")
        }
    }

    #[test]
    fn copy_paste_twice_makes_two_independent_copies() {
        let mut fx = Fixture::new();
        let root = fx.root();
        let ops = FileSystemOperator::new(&LocalFileSystem, &fx.store);

        fx.manager.stage(&ops, &root.join("f.txt"), ClipboardIntent::Copy).unwrap();
        let first = fx.manager.paste(&ops, &root.join("other")).unwrap();
        assert_eq!(first.destination, root.join("other/f-copy.txt"));
        assert_eq!(fs::read(root.join("other/f-copy.txt")).unwrap(), b"file bytes");
        assert!(fx.manager.pending().is_some());

        let second = fx.manager.paste(&ops, &root.join("dir")).unwrap();
        assert_eq!(second.destination, root.join("dir/f-copy.txt"));
        assert!(root.join("f.txt").exists());
    }

    #[test]
    fn second_paste_into_same_directory_is_a_copy_failure() {
        let mut fx = Fixture::new();
        let root = fx.root();
        let ops = FileSystemOperator::new(&LocalFileSystem, &fx.store);

        fx.manager.stage(&ops, &root.join("f.txt"), ClipboardIntent::Copy).unwrap();
        fx.manager.paste(&ops, &root).unwrap();
        let err = fx.manager.paste(&ops, &root).unwrap_err();
        assert!(matches!(err, AppError::CopyFailure { .. }));
    }

    #[test]
    fn cut_paste_moves_file_and_annotation() {
        let mut fx = Fixture::new();
        let root = fx.root();
        fx.store.add(&root.join("f.txt"), "moved note").unwrap();
        let ops = FileSystemOperator::new(&LocalFileSystem, &fx.store);

        fx.manager.stage(&ops, &root.join("f.txt"), ClipboardIntent::Cut).unwrap();
        let report = fx.manager.paste(&ops, &root.join("other")).unwrap();

        assert!(report.source_removed);
        assert!(!root.join("f.txt").exists());
        assert_eq!(fs::read_to_string(root.join("other/f.txt")).unwrap(), "file bytes");
        assert_eq!(fx.store.lookup(&root.join("other/f.txt")).unwrap(), "moved note");
        assert_eq!(fx.store.lookup(&root.join("f.txt")).unwrap(), "");
        assert_eq!(fx.manager.clipboard().state(), &ClipboardState::Empty);
    }

    #[test]
    fn directory_copy_carries_nested_annotations() {
        let mut fx = Fixture::new();
        let root = fx.root();
        fx.store.add(&root.join("dir/x.txt"), "note").unwrap();
        fx.store.add(&root.join("dir"), "top").unwrap();
        let ops = FileSystemOperator::new(&LocalFileSystem, &fx.store);

        fx.manager.stage(&ops, &root.join("dir"), ClipboardIntent::Copy).unwrap();
        let report = fx.manager.paste(&ops, &root.join("other")).unwrap();

        assert_eq!(report.annotations_copied, 2);
        assert_eq!(fs::read(root.join("other/dir-copy/x.txt")).unwrap(), b"payload");
        assert_eq!(fx.store.lookup(&root.join("other/dir-copy/x.txt")).unwrap(), "note");
        assert_eq!(fx.store.lookup(&root.join("other/dir-copy")).unwrap(), "top");
        assert_eq!(fx.store.lookup(&root.join("dir/x.txt")).unwrap(), "note");
    }

    #[test]
    fn copy_failure_leaves_clipboard_and_partial_output() {
        let mut fx = Fixture::new();
        let root = fx.root();
        let failing = FailingCopy { poisoned: "z.txt" };
        let ops = FileSystemOperator::new(&failing, &fx.store);

        fx.manager.stage(&ops, &root.join("dir"), ClipboardIntent::Cut).unwrap();
        let before = fx.manager.clipboard().state().clone();

        let err = fx.manager.paste(&ops, &root.join("other")).unwrap_err();
        assert!(matches!(err, AppError::CopyFailure { .. }));
        assert_eq!(fx.manager.clipboard().state(), &before);
        // source kept, partial destination left behind
        assert!(root.join("dir/z.txt").exists());
        assert!(root.join("other/dir").is_dir());
    }

    #[test]
    fn staging_over_a_pending_cut_deletes_the_cut_source() {
        let mut fx = Fixture::new();
        let root = fx.root();
        fx.store.add(&root.join("dir/x.txt"), "gone").unwrap();
        let ops = FileSystemOperator::new(&LocalFileSystem, &fx.store);

        fx.manager.stage(&ops, &root.join("dir"), ClipboardIntent::Cut).unwrap();
        fx.manager.stage(&ops, &root.join("f.txt"), ClipboardIntent::Copy).unwrap();

        assert!(!root.join("dir").exists());
        assert_eq!(fx.store.lookup(&root.join("dir/x.txt")).unwrap(), "");
        assert_eq!(fx.manager.clipboard().intent(), Some(ClipboardIntent::Copy));
    }

    #[test]
    fn abandon_keeps_a_copy_source() {
        let mut fx = Fixture::new();
        let root = fx.root();
        let ops = FileSystemOperator::new(&LocalFileSystem, &fx.store);

        fx.manager.stage(&ops, &root.join("f.txt"), ClipboardIntent::Copy).unwrap();
        let abandoned = fx.manager.abandon(&ops).unwrap();
        assert!(abandoned.is_some());
        assert!(root.join("f.txt").exists());
        assert!(fx.manager.abandon(&ops).unwrap().is_none());
    }

    #[test]
    fn paste_with_nothing_staged() {
        let mut fx = Fixture::new();
        let root = fx.root();
        let ops = FileSystemOperator::new(&LocalFileSystem, &fx.store);

        assert!(matches!(
            fx.manager.paste(&ops, &root),
            Err(AppError::NoPendingClipboard)
        ));
    }

    #[test]
    fn cut_onto_its_own_location_keeps_the_source() {
        let mut fx = Fixture::new();
        let root = fx.root();
        fx.store.add(&root.join("f.txt"), "once").unwrap();
        let ops = FileSystemOperator::new(&LocalFileSystem, &fx.store);

        fx.manager.stage(&ops, &root.join("f.txt"), ClipboardIntent::Cut).unwrap();
        let report = fx.manager.paste(&ops, &root).unwrap();

        assert!(!report.source_removed);
        assert!(root.join("f.txt").exists());
        assert_eq!(fx.store.lookup(&root.join("f.txt")).unwrap(), "once");
        assert!(fx.manager.pending().is_none());
    }

    #[test]
    fn cut_into_own_subtree_is_rejected() {
        let mut fx = Fixture::new();
        let root = fx.root();
        fs::create_dir(root.join("dir/inner")).unwrap();
        let ops = FileSystemOperator::new(&LocalFileSystem, &fx.store);

        fx.manager.stage(&ops, &root.join("dir"), ClipboardIntent::Cut).unwrap();
        let err = fx.manager.paste(&ops, &root.join("dir/inner")).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { .. }));
        assert!(root.join("dir/x.txt").exists());
        assert!(fx.manager.pending().is_some());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_copies_as_a_link() {
        let mut fx = Fixture::new();
        let root = fx.root();
        std::os::unix::fs::symlink(root.join("dir"), root.join("link")).unwrap();
        fx.store.add(&root.join("link"), "shortcut").unwrap();
        let ops = FileSystemOperator::new(&LocalFileSystem, &fx.store);

        let staged = fx.manager.stage(&ops, &root.join("link"), ClipboardIntent::Copy).unwrap();
        assert_eq!(staged.manifest.len(), 1);

        let report = fx.manager.paste(&ops, &root.join("other")).unwrap();
        let copied = root.join("other/link-copy");
        assert_eq!(report.destination, copied);
        assert!(fs::symlink_metadata(&copied).unwrap().file_type().is_symlink());
        assert_eq!(fs::read(copied.join("x.txt")).unwrap(), b"payload");
        assert_eq!(fx.store.lookup(&copied).unwrap(), "shortcut");
    }
}
