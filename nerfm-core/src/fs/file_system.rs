//! ``src/fs/file_system.rs``
//!
//! # `FileSystem`: Filesystem Collaborator
//!
//! The raw primitives the core needs from its environment. `LocalFileSystem`
//! maps them onto `std::fs` and `walkdir`; tests substitute failing doubles.
//! Handles are opened and closed inside each call.

use std::{
    ffi::OsString,
    fs::{self, File},
    io::{self, Read},
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// One node of a recursive walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub depth: usize,
    pub is_dir: bool,
    pub is_symlink: bool,
}

pub trait FileSystem {
    /// Entry names of `dir`, in the order the platform returns them.
    fn list_entries(&self, dir: &Path) -> io::Result<Vec<OsString>>;

    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    fn exists(&self, path: &Path) -> bool;

    fn read_text(&self, path: &Path) -> io::Result<String>;

    /// At most `limit` leading bytes of a file.
    fn read_head(&self, path: &Path, limit: usize) -> io::Result<Vec<u8>>;

    fn file_size(&self, path: &Path) -> io::Result<u64>;

    /// Copy bytes to a path that must not exist yet.
    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<u64>;

    /// Recreate the symlink `from` at `to`, pointing at the same target.
    fn copy_link(&self, from: &Path, to: &Path) -> io::Result<()>;

    fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Create an empty file; fails if `path` exists.
    fn create_file(&self, path: &Path) -> io::Result<()>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    fn remove_empty_dir(&self, path: &Path) -> io::Result<()>;

    /// Pre-order walk of `root` (root first), fully collected before returning.
    /// Symlinks are reported, not followed, including a symlinked root.
    fn walk(&self, root: &Path) -> io::Result<Vec<WalkEntry>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn list_entries(&self, dir: &Path) -> io::Result<Vec<OsString>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            names.push(entry?.file_name());
        }
        Ok(names)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn exists(&self, path: &Path) -> bool {
        path.symlink_metadata().is_ok()
    }

    fn read_text(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn read_head(&self, path: &Path, limit: usize) -> io::Result<Vec<u8>> {
        let mut head = Vec::with_capacity(limit.min(64 * 1024));
        File::open(path)?.take(limit as u64).read_to_end(&mut head)?;
        Ok(head)
    }

    fn file_size(&self, path: &Path) -> io::Result<u64> {
        Ok(fs::metadata(path)?.len())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<u64> {
        let mut reader = File::open(from)?;
        let mut writer = File::create_new(to)?;
        let copied = io::copy(&mut reader, &mut writer)?;

        if let Ok(metadata) = reader.metadata() {
            // permissions are best effort; the bytes are what matters
            let _ = writer.set_permissions(metadata.permissions());
        }

        Ok(copied)
    }

    fn copy_link(&self, from: &Path, to: &Path) -> io::Result<()> {
        let target = fs::read_link(from)?;
        make_link(&target, to, from.is_dir())
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(path)
    }

    fn create_file(&self, path: &Path) -> io::Result<()> {
        File::create_new(path).map(|_| ())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_empty_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }

    fn walk(&self, root: &Path) -> io::Result<Vec<WalkEntry>> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(root)
            .follow_links(false)
            .follow_root_links(false)
        {
            let entry = entry?;
            entries.push(WalkEntry {
                is_dir: entry.file_type().is_dir(),
                is_symlink: entry.path_is_symlink(),
                depth: entry.depth(),
                path: entry.into_path(),
            });
        }
        Ok(entries)
    }
}

#[cfg(unix)]
fn make_link(target: &Path, link: &Path, _is_dir: bool) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn make_link(target: &Path, link: &Path, is_dir: bool) -> io::Result<()> {
    if is_dir {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}
