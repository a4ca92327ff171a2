//! ``src/controller/session.rs``
//! ============================================================================
//! # `Session`: One Interactive Browsing Session
//!
//! Owns the navigator, the clipboard, the annotation store and the filesystem
//! collaborator, plus the "current element" (the last reference the user
//! selected). Every command that names an entry re-lists the current
//! directory first and resolves against that fresh snapshot.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clipr::{ClipboardConfig, ClipboardIntent};
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::controller::clipboard_manager::ClipboardManager;
use crate::controller::commands::{Command, HELP_LINES, Verb};
use crate::error::AppError;
use crate::fs::file_system::{FileSystem, LocalFileSystem};
use crate::fs::object_info::human_size;
use crate::model::annotation_store::AnnotationStore;
use crate::model::navigator::Navigator;
use crate::model::reference_index::DirectoryListing;
use crate::operators::file_system_operator::{CreateOutcome, FileSystemOperator, ViewOutput};
use crate::view::listing::render_listing;

/// Output of one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub exit: bool,
}

impl Reply {
    pub fn line(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
            exit: false,
        }
    }

    pub fn lines(lines: Vec<String>) -> Self {
        Self { lines, exit: false }
    }

    fn exiting(mut self) -> Self {
        self.exit = true;
        self
    }
}

/// The entry a command acts on, resolved against a fresh listing. `name` is
/// for messages; `file_name` is what the filesystem knows it by.
struct Target {
    name: String,
    file_name: OsString,
    path: PathBuf,
}

pub struct Session<F: FileSystem = LocalFileSystem> {
    fs: F,
    navigator: Navigator,
    clipboard: ClipboardManager,
    store: AnnotationStore,
    current: Option<usize>,
    colored: bool,
    closed: bool,
}

impl Session<LocalFileSystem> {
    /// Session over the local filesystem, rooted at `root`.
    pub fn from_config(config: &Config, root: PathBuf) -> Self {
        Self::new(
            LocalFileSystem,
            root,
            AnnotationStore::new(config.annotation_file.clone()),
            config.clipboard.clone(),
        )
    }
}

impl<F: FileSystem> Session<F> {
    pub fn new(fs: F, root: PathBuf, store: AnnotationStore, clipboard: ClipboardConfig) -> Self {
        info!(root = %root.display(), annotations = %store.path().display(), "Session started");
        Self {
            fs,
            navigator: Navigator::new(root),
            clipboard: ClipboardManager::new(clipboard),
            store,
            current: None,
            colored: false,
            closed: false,
        }
    }

    #[must_use]
    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn clipboard(&self) -> &ClipboardManager {
        &self.clipboard
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn current_element(&self) -> Option<usize> {
        self.current
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn cwd(&self) -> &Path {
        self.navigator.current()
    }

    pub fn listing(&self) -> Result<DirectoryListing, AppError> {
        DirectoryListing::read(&self.fs, self.navigator.current())
    }

    /// Listing followed by the current element and its annotation.
    pub fn render(&self) -> Result<Vec<String>, AppError> {
        let listing = self.listing()?;
        let mut lines = render_listing(&self.fs, &listing, self.colored);
        lines.push(String::new());

        let selected = self
            .current
            .and_then(|reference| listing.resolve(reference).ok().map(|name| (reference, name)));

        match selected {
            Some((reference, name)) => {
                lines.push(format!(
                    "Current element: {reference} ({})",
                    name.to_string_lossy()
                ));
                let note = self.store.lookup(&listing.directory().join(name))?;
                if note.is_empty() {
                    lines.push("No annotation for the current element.".to_string());
                } else {
                    lines.push(format!("Current annotation: {note}"));
                }
            }
            None => lines.push("No current element.".to_string()),
        }
        Ok(lines)
    }

    /// Parse and run one input line.
    pub fn execute_line(&mut self, line: &str) -> Result<Reply, AppError> {
        let command: Command = line.parse()?;
        self.execute(&command)
    }

    #[instrument(level = "debug", skip_all, fields(verb = %command.verb, reference = ?command.reference))]
    pub fn execute(&mut self, command: &Command) -> Result<Reply, AppError> {
        if self.closed {
            return Ok(Reply::default().exiting());
        }

        let target = if command.verb.needs_entry() {
            Some(self.select(command)?)
        } else {
            None
        };

        let ops = FileSystemOperator::new(&self.fs, &self.store);

        let reply = match (command.verb, target) {
            (Verb::View, Some(target)) => {
                let output = ops.view(&target.path)?;
                Reply::lines(match output {
                    ViewOutput::Text(lines) => lines,
                    ViewOutput::DirectorySize { bytes, files } => vec![format!(
                        "Directory size: {} ({files} files)",
                        human_size(bytes)
                    )],
                    ViewOutput::FileSize(bytes) => {
                        vec![format!("File size: {}", human_size(bytes))]
                    }
                })
            }

            (Verb::Descend, Some(target)) => {
                if !self.fs.is_dir(&target.path) {
                    return Err(AppError::NotADirectory(target.path));
                }
                let cwd = self.navigator.descend(&target.file_name).display().to_string();
                self.current = None;
                Reply::line(format!("Now in {cwd}"))
            }

            (Verb::Ascend, _) => {
                let cwd = self.navigator.ascend()?.display().to_string();
                self.current = None;
                Reply::line(format!("Now in {cwd}"))
            }

            (verb @ (Verb::Copy | Verb::Cut), Some(target)) => {
                let intent = if verb == Verb::Cut {
                    ClipboardIntent::Cut
                } else {
                    ClipboardIntent::Copy
                };
                let entry = self.clipboard.stage(&ops, &target.path, intent)?;
                let annotated = entry.manifest.annotated_count();
                Reply::line(match intent {
                    ClipboardIntent::Copy => {
                        format!("Copied {} ({annotated} annotated)", target.name)
                    }
                    ClipboardIntent::Cut => {
                        format!("Cut {} ({annotated} annotated), paste to move it", target.name)
                    }
                })
            }

            (Verb::Paste, _) => {
                let report = self.clipboard.paste(&ops, self.navigator.current())?;
                self.current = None;
                let mut lines = vec![format!(
                    "Pasted {} ({} files, {})",
                    report.destination.display(),
                    report.stats.files,
                    human_size(report.stats.bytes)
                )];
                if report.annotations_copied > 0 {
                    lines.push(format!("{} annotations carried over", report.annotations_copied));
                }
                if report.source_removed {
                    lines.push(format!("{} was removed", report.source.display()));
                }
                Reply::lines(lines)
            }

            (Verb::Delete, Some(target)) => {
                let report = ops.delete(&target.path)?;
                self.current = None;
                Reply::line(format!(
                    "Deleted {} ({} entries, {} annotations)",
                    target.name, report.removed, report.annotations_purged
                ))
            }

            (verb @ (Verb::Mkdir | Verb::Touch), _) => {
                let name = required_argument(command)?;
                let cwd = self.navigator.current();
                let outcome = if verb == Verb::Mkdir {
                    ops.create_directory(cwd, name)?
                } else {
                    ops.create_text_file(cwd, name)?
                };
                self.current = None;
                Reply::line(match outcome {
                    CreateOutcome::Created(path) => format!("Created {}", path.display()),
                    CreateOutcome::AlreadyExists(path) => {
                        format!("{} already exists", path.display())
                    }
                })
            }

            (Verb::Find, _) => {
                let name = required_argument(command)?;
                let found = ops.find(self.navigator.current(), name)?;
                if found.is_empty() {
                    Reply::line(format!("No file named {name:?}"))
                } else {
                    Reply::lines(found.iter().map(|p| p.display().to_string()).collect())
                }
            }

            (Verb::Annotate, Some(target)) => {
                let text = required_argument(command)?;
                let note = self.store.add(&target.path, text)?;
                Reply::line(format!("Annotation for {}: {note}", target.name))
            }

            (Verb::Unannotate, Some(target)) => {
                if self.store.delete(&target.path)? {
                    Reply::line(format!("Annotation removed from {}", target.name))
                } else {
                    Reply::line(format!("{} has no annotation", target.name))
                }
            }

            (Verb::Note, Some(target)) => {
                let note = self.store.lookup(&target.path)?;
                if note.is_empty() {
                    Reply::line(format!("{} has no annotation", target.name))
                } else {
                    Reply::line(format!("{}: {note}", target.name))
                }
            }

            (Verb::Help, _) => Reply::lines(
                HELP_LINES
                    .iter()
                    .map(|(usage, text)| format!("{usage} : {text}"))
                    .collect(),
            ),

            (Verb::Exit, _) => {
                let mut reply = Reply::lines(self.shutdown()?);
                reply.lines.push("Goodbye!".to_string());
                reply.exiting()
            }

            // needs_entry() verbs always carry a target
            (_, None) => {
                return Err(AppError::invalid_input("reference", "no entry selected"));
            }
        };

        Ok(reply)
    }

    /// Abandon the clipboard, deleting the source of a pending cut. Safe to
    /// call more than once.
    pub fn shutdown(&mut self) -> Result<Vec<String>, AppError> {
        if self.closed {
            return Ok(Vec::new());
        }

        let ops = FileSystemOperator::new(&self.fs, &self.store);
        let abandoned = self.clipboard.abandon(&ops)?;
        self.closed = true;
        info!("Session closed");

        Ok(match abandoned {
            Some(entry) if entry.intent.is_cut() => {
                vec![format!("Pending cut of {} was discarded", entry.source_path.display())]
            }
            _ => Vec::new(),
        })
    }

    /// Resolve the command's reference (or the current element) against a
    /// fresh listing and check an optional name against it.
    fn select(&mut self, command: &Command) -> Result<Target, AppError> {
        let reference = command
            .reference
            .or(self.current)
            .ok_or_else(|| AppError::invalid_input("reference", "no entry selected"))?;

        let listing = self.listing()?;
        let file_name = listing.resolve(reference)?.to_os_string();
        let name = file_name.to_string_lossy().into_owned();

        if command.verb.checks_name()
            && let Some(given) = command.argument()
            && file_name.as_os_str() != given
        {
            return Err(AppError::NameMismatch {
                reference,
                expected: name,
                given: given.to_string(),
            });
        }

        if command.reference.is_some() {
            self.current = Some(reference);
        }
        debug!(reference, name = %name, "Resolved reference");

        Ok(Target {
            path: listing.directory().join(&file_name),
            name,
            file_name,
        })
    }
}

fn required_argument(command: &Command) -> Result<&str, AppError> {
    command
        .argument()
        .ok_or_else(|| AppError::invalid_input(command.verb.keyword(), "missing argument"))
}
