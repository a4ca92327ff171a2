//! ``src/model/annotation_store.rs``
//! ============================================================================
//! # `AnnotationStore`: Persistent Path to Note Mapping
//!
//! Annotations live in a JSON side-file holding an array of
//! `{"path": ..., "annotation": ...}` records. Every operation reads the whole
//! file and every mutation rewrites it, so concurrent sessions sharing one
//! file see each other's writes between commands. Writes go to a sibling temp
//! file first and are renamed into place.

use std::{
    fs,
    io::ErrorKind,
    path::{Component, Path, PathBuf},
};

use clipr::Manifest;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    #[serde(alias = "Path")]
    pub path: String,
    #[serde(rename = "annotation", alias = "Annotation")]
    pub text: String,
}

impl AnnotationRecord {
    pub fn new(path: &Path, text: impl Into<String>) -> Self {
        Self {
            path: key(path),
            text: text.into(),
        }
    }
}

type Records = IndexMap<String, String>;

#[derive(Debug, Clone)]
pub struct AnnotationStore {
    path: PathBuf,
}

impl AnnotationStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Location of the side-file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `text` to the note of `target`, creating it if absent.
    /// Returns the full note after the write.
    #[instrument(level = "debug", skip_all, fields(target = %target.display()))]
    pub fn add(&self, target: &Path, text: &str) -> Result<String, AppError> {
        let mut records = self.load()?;
        let entry = records.entry(key(target)).or_default();
        entry.push_str(text);
        let updated = entry.clone();

        self.save(&records)?;
        info!(target = %target.display(), len = updated.len(), "Annotation updated");
        Ok(updated)
    }

    /// The note of `target`, empty when there is none.
    pub fn lookup(&self, target: &Path) -> Result<String, AppError> {
        Ok(self.load()?.swap_remove(&key(target)).unwrap_or_default())
    }

    /// Notes for several paths from a single read, in input order.
    pub fn lookup_many<'a, I>(&self, targets: I) -> Result<Vec<String>, AppError>
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let records = self.load()?;
        Ok(targets
            .into_iter()
            .map(|target| records.get(&key(target)).cloned().unwrap_or_default())
            .collect())
    }

    /// Remove the note of `target`. Returns whether one existed.
    pub fn delete(&self, target: &Path) -> Result<bool, AppError> {
        let mut records = self.load()?;
        if records.shift_remove(&key(target)).is_none() {
            return Ok(false);
        }

        self.save(&records)?;
        debug!(target = %target.display(), "Annotation deleted");
        Ok(true)
    }

    /// Remove the notes of `root` and everything beneath it.
    /// `/r/ab` is not beneath `/r/a`.
    #[instrument(level = "debug", skip_all, fields(root = %root.display()))]
    pub fn delete_subtree(&self, root: &Path) -> Result<usize, AppError> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|path, _| !is_within(Path::new(path), root));
        let removed = before - records.len();

        if removed > 0 {
            self.save(&records)?;
            info!(root = %root.display(), removed, "Subtree annotations deleted");
        }
        Ok(removed)
    }

    /// Remove the notes of exactly these paths, leaving their descendants.
    pub fn delete_paths(&self, targets: &[PathBuf]) -> Result<usize, AppError> {
        let mut records = self.load()?;
        let before = records.len();
        for target in targets {
            records.shift_remove(&key(target));
        }
        let removed = before - records.len();

        if removed > 0 {
            self.save(&records)?;
        }
        Ok(removed)
    }

    /// Attach the manifest's notes to their locations under `destination`,
    /// appending to any note already there. One write for the whole manifest.
    #[instrument(level = "debug", skip_all, fields(destination = %destination.display()))]
    pub fn copy_associations(&self, manifest: &Manifest, destination: &Path) -> Result<usize, AppError> {
        let associations: Vec<_> = manifest.associations(destination).collect();
        if associations.is_empty() {
            return Ok(0);
        }

        let mut records = self.load()?;
        for (path, text) in &associations {
            records.entry(key(path)).or_default().push_str(text);
        }

        self.save(&records)?;
        info!(count = associations.len(), "Annotations carried to destination");
        Ok(associations.len())
    }

    /// Every record in file order.
    pub fn records(&self) -> Result<Vec<AnnotationRecord>, AppError> {
        Ok(self
            .load()?
            .into_iter()
            .map(|(path, text)| AnnotationRecord { path, text })
            .collect())
    }

    /// A missing or blank file is an empty store.
    fn load(&self) -> Result<Records, AppError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Records::new()),
            Err(e) => return Err(AppError::annotation_io(&self.path, e)),
        };

        if raw.trim().is_empty() {
            return Ok(Records::new());
        }

        let parsed: Vec<AnnotationRecord> =
            serde_json::from_str(&raw).map_err(|e| AppError::annotation_io(&self.path, e))?;

        let mut records = Records::with_capacity(parsed.len());
        for record in parsed {
            if records.contains_key(&record.path) {
                warn!(path = %record.path, "Duplicate annotation record ignored");
                continue;
            }
            records.insert(record.path, record.text);
        }
        Ok(records)
    }

    fn save(&self, records: &Records) -> Result<(), AppError> {
        let body: Vec<AnnotationRecord> = records
            .iter()
            .map(|(path, text)| AnnotationRecord {
                path: path.clone(),
                text: text.clone(),
            })
            .collect();
        let data = serde_json::to_vec_pretty(&body).map_err(|e| AppError::annotation_io(&self.path, e))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| AppError::annotation_io(&self.path, e))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &data)
            .map_err(|e| AppError::annotation_io(&self.path, format!("failed to write temp file: {e}")))?;
        fs::rename(&temp_path, &self.path)
            .map_err(|e| AppError::annotation_io(&self.path, format!("failed to rename temp file: {e}")))?;

        debug!(records = records.len(), "Annotation file written");
        Ok(())
    }
}

fn key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Component-wise prefix test, so partial segment matches are rejected.
fn is_within(path: &Path, root: &Path) -> bool {
    let mut path_parts = path.components().filter(|c| *c != Component::CurDir);
    root.components()
        .filter(|c| *c != Component::CurDir)
        .all(|part| path_parts.next() == Some(part))
}
