//! ``src/operators/file_system_operator.rs``
//! ============================================================================
//! # `FileSystemOperator`: Annotation-Aware Filesystem Mutations
//!
//! Every mutation that can invalidate an annotation goes through here, so the
//! side-file never outlives the paths it describes. The operator borrows its
//! collaborators for the length of one command.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::error::AppError;
use crate::fs::file_system::{FileSystem, WalkEntry};
use crate::fs::object_info::is_text_file;
use crate::model::annotation_store::AnnotationStore;

/// What `visu` shows for an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewOutput {
    Text(Vec<String>),
    DirectorySize { bytes: u64, files: usize },
    FileSize(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteReport {
    pub removed: usize,
    pub annotations_purged: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(PathBuf),
    AlreadyExists(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CopyStats {
    pub files: usize,
    pub directories: usize,
    pub bytes: u64,
}

pub struct FileSystemOperator<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    store: &'a AnnotationStore,
}

impl<'a, F: FileSystem + ?Sized> FileSystemOperator<'a, F> {
    pub fn new(fs: &'a F, store: &'a AnnotationStore) -> Self {
        Self { fs, store }
    }

    pub fn fs(&self) -> &'a F {
        self.fs
    }

    pub fn store(&self) -> &'a AnnotationStore {
        self.store
    }

    /// Remove a file or a whole subtree, then purge the annotations of every
    /// removed path. A partial failure purges only what was actually removed.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn delete(&self, path: &Path) -> Result<DeleteReport, AppError> {
        if !self.fs.exists(path) {
            return Err(AppError::file_operation_failed(
                "delete",
                path,
                "path does not exist",
            ));
        }

        let entries = self
            .fs
            .walk(path)
            .map_err(|e| AppError::file_operation_failed("delete", path, e))?;

        let mut removed: Vec<PathBuf> = Vec::with_capacity(entries.len());
        // children before parents
        for entry in entries.iter().rev() {
            let result = if entry.is_dir {
                self.fs.remove_empty_dir(&entry.path)
            } else {
                self.fs.remove_file(&entry.path)
            };

            if let Err(e) = result {
                warn!(
                    path = %entry.path.display(),
                    removed = removed.len(),
                    error = %e,
                    "Delete stopped part way"
                );
                self.store.delete_paths(&removed)?;
                return Err(AppError::file_operation_failed("delete", &entry.path, e));
            }
            removed.push(entry.path.clone());
        }

        let annotations_purged = self.store.delete_subtree(path)?;
        info!(removed = removed.len(), annotations_purged, "Deleted");

        Ok(DeleteReport {
            removed: removed.len(),
            annotations_purged,
        })
    }

    /// `mkdir`: existing entries are reported, not overwritten.
    #[instrument(level = "info", skip_all, fields(dir = %dir.display()))]
    pub fn create_directory(&self, dir: &Path, name: &str) -> Result<CreateOutcome, AppError> {
        validate_entry_name("mkdir", name)?;
        let path = dir.join(name);

        if self.fs.exists(&path) {
            debug!(path = %path.display(), "Directory already exists");
            return Ok(CreateOutcome::AlreadyExists(path));
        }

        self.fs
            .create_dir(&path)
            .map_err(|e| AppError::file_operation_failed("mkdir", &path, e))?;
        info!(path = %path.display(), "Directory created");
        Ok(CreateOutcome::Created(path))
    }

    /// `touch`: creates `<name>.txt`.
    #[instrument(level = "info", skip_all, fields(dir = %dir.display()))]
    pub fn create_text_file(&self, dir: &Path, name: &str) -> Result<CreateOutcome, AppError> {
        validate_entry_name("touch", name)?;
        let path = dir.join(format!("{name}.txt"));

        if self.fs.exists(&path) {
            debug!(path = %path.display(), "File already exists");
            return Ok(CreateOutcome::AlreadyExists(path));
        }

        self.fs
            .create_file(&path)
            .map_err(|e| AppError::file_operation_failed("touch", &path, e))?;
        info!(path = %path.display(), "Text file created");
        Ok(CreateOutcome::Created(path))
    }

    /// Regular files below `dir` whose name is exactly `name`, in walk order.
    #[instrument(level = "debug", skip_all, fields(dir = %dir.display()))]
    pub fn find(&self, dir: &Path, name: &str) -> Result<Vec<PathBuf>, AppError> {
        if name.is_empty() {
            return Err(AppError::invalid_input("find", "missing file name"));
        }

        let matches: Vec<PathBuf> = self
            .fs
            .walk(dir)
            .map_err(|e| AppError::file_operation_failed("find", dir, e))?
            .into_iter()
            .filter(|entry| !entry.is_dir && entry.path.file_name().is_some_and(|n| n == name))
            .filter(|entry| self.fs.is_file(&entry.path))
            .map(|entry| entry.path)
            .collect();

        debug!(matches = matches.len(), "Search finished");
        Ok(matches)
    }

    /// Text file lines, a directory's recursive size, or a file's size.
    #[instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub fn view(&self, path: &Path) -> Result<ViewOutput, AppError> {
        if self.fs.is_dir(path) {
            let entries = self
                .fs
                .walk(path)
                .map_err(|e| AppError::file_operation_failed("view", path, e))?;

            let mut bytes = 0u64;
            let mut files = 0usize;
            for entry in entries.iter().filter(|e| !e.is_dir && !e.is_symlink) {
                // dangling links and races are skipped, not fatal
                if let Ok(size) = self.fs.file_size(&entry.path) {
                    bytes += size;
                    files += 1;
                }
            }
            return Ok(ViewOutput::DirectorySize { bytes, files });
        }

        if is_text_file(self.fs, path) {
            match self.fs.read_text(path) {
                Ok(text) => return Ok(ViewOutput::Text(text.lines().map(str::to_owned).collect())),
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    debug!("Invalid UTF-8 past the probe window, showing size");
                }
                Err(e) => return Err(AppError::file_operation_failed("view", path, e)),
            }
        }

        self.fs
            .file_size(path)
            .map(ViewOutput::FileSize)
            .map_err(|e| AppError::file_operation_failed("view", path, e))
    }

    /// Duplicate `source` (file or subtree) at `destination`, which must not
    /// exist. The source walk is collected up front, so a destination inside
    /// the source is never copied into itself. Symlinks, including a symlinked
    /// `source`, are recreated as links. Stops at the first failure and leaves
    /// whatever was already written.
    #[instrument(level = "info", skip_all, fields(source = %source.display(), destination = %destination.display()))]
    pub fn copy_tree(&self, source: &Path, destination: &Path) -> Result<CopyStats, AppError> {
        if self.fs.exists(destination) {
            return Err(AppError::copy_failure(
                source,
                destination,
                std::io::Error::new(std::io::ErrorKind::AlreadyExists, "destination already exists"),
            ));
        }

        let entries = self
            .fs
            .walk(source)
            .map_err(|e| AppError::copy_failure(source, destination, e))?;

        let mut stats = CopyStats::default();
        for WalkEntry {
            path,
            is_dir,
            is_symlink,
            ..
        } in &entries
        {
            let target = match path.strip_prefix(source) {
                Ok(relative) if relative.as_os_str().is_empty() => destination.to_path_buf(),
                Ok(relative) => destination.join(relative),
                Err(_) => continue,
            };

            if *is_symlink {
                self.fs
                    .copy_link(path, &target)
                    .map_err(|e| AppError::copy_failure(path, &target, e))?;
                stats.files += 1;
            } else if *is_dir {
                self.fs
                    .create_dir(&target)
                    .map_err(|e| AppError::copy_failure(path, &target, e))?;
                stats.directories += 1;
            } else {
                stats.bytes += self
                    .fs
                    .copy_file(path, &target)
                    .map_err(|e| AppError::copy_failure(path, &target, e))?;
                stats.files += 1;
            }
        }

        info!(
            files = stats.files,
            directories = stats.directories,
            bytes = stats.bytes,
            "Tree copied"
        );
        Ok(stats)
    }
}

/// A single plain path component.
fn validate_entry_name(field: &str, name: &str) -> Result<(), AppError> {
    if name.is_empty() {
        return Err(AppError::invalid_input(field, "missing name"));
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(AppError::invalid_input(
            field,
            format!("{name:?} is not a plain entry name"),
        )),
    }
}
