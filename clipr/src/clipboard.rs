use crate::config::ClipboardConfig;
use crate::error::{ClipError, ClipResult};
use crate::item::{ClipboardEntry, ClipboardIntent};
use crate::operations::PasteOperation;
use std::path::Path;

/// Tagged single-slot state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ClipboardState {
    #[default]
    Empty,
    Pending(ClipboardEntry),
}

/// Single-slot clipboard. Every transition is explicit; none of them touch the filesystem.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    state: ClipboardState,
    config: ClipboardConfig,
}

impl Clipboard {
    pub fn new(config: ClipboardConfig) -> Self {
        Self {
            state: ClipboardState::Empty,
            config,
        }
    }

    pub fn state(&self) -> &ClipboardState {
        &self.state
    }

    pub fn config(&self) -> &ClipboardConfig {
        &self.config
    }

    pub fn pending(&self) -> Option<&ClipboardEntry> {
        match &self.state {
            ClipboardState::Pending(entry) => Some(entry),
            ClipboardState::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.state, ClipboardState::Empty)
    }

    pub fn has_pending_cut(&self) -> bool {
        self.pending().is_some_and(|entry| entry.intent.is_cut())
    }

    /// Pending -> Empty. Returns whatever was staged so the caller can honour a cut.
    pub fn abandon(&mut self) -> Option<ClipboardEntry> {
        match std::mem::take(&mut self.state) {
            ClipboardState::Pending(entry) => Some(entry),
            ClipboardState::Empty => None,
        }
    }

    /// Put `entry` in the slot. The previous entry must have been abandoned first.
    pub fn stage(&mut self, entry: ClipboardEntry) {
        debug_assert!(self.is_empty(), "stage over a pending entry without abandoning it");
        self.state = ClipboardState::Pending(entry);
    }

    /// Resolve the pending entry against `target_dir`.
    pub fn plan_paste(&self, target_dir: &Path) -> ClipResult<PasteOperation> {
        let entry = self.pending().ok_or(ClipError::NoPendingClipboard)?;
        PasteOperation::new(entry, target_dir, &self.config)
    }

    /// Pending(Cut) -> Empty after the cut was pasted. A pending copy stays in place.
    pub fn consume_cut(&mut self) -> Option<ClipboardEntry> {
        if self.has_pending_cut() {
            self.abandon()
        } else {
            None
        }
    }

    pub fn intent(&self) -> Option<ClipboardIntent> {
        self.pending().map(|entry| entry.intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Manifest;
    use std::path::PathBuf;

    fn entry(path: &str, intent: ClipboardIntent) -> ClipboardEntry {
        let path = PathBuf::from(path);
        let name = path.file_name().unwrap().to_os_string();
        ClipboardEntry::new(path, intent, Manifest::single_file(name, "")).unwrap()
    }

    #[test]
    fn paste_without_stage_is_rejected() {
        let clipboard = Clipboard::default();
        assert!(clipboard.is_empty());
        assert_eq!(
            clipboard.plan_paste(Path::new("/t")).unwrap_err(),
            ClipError::NoPendingClipboard
        );
    }

    #[test]
    fn abandon_returns_the_pending_cut() {
        let mut clipboard = Clipboard::default();
        clipboard.stage(entry("/r/a.txt", ClipboardIntent::Cut));
        assert!(clipboard.has_pending_cut());

        let abandoned = clipboard.abandon().unwrap();
        assert_eq!(abandoned.source_path, PathBuf::from("/r/a.txt"));
        assert!(abandoned.intent.is_cut());
        assert!(clipboard.is_empty());
        assert!(clipboard.abandon().is_none());
    }

    #[test]
    fn consume_cut_leaves_copies_pending() {
        let mut clipboard = Clipboard::default();
        clipboard.stage(entry("/r/a.txt", ClipboardIntent::Copy));

        assert!(clipboard.consume_cut().is_none());
        assert_eq!(clipboard.intent(), Some(ClipboardIntent::Copy));

        clipboard.abandon();
        clipboard.stage(entry("/r/b.txt", ClipboardIntent::Cut));
        assert!(clipboard.consume_cut().is_some());
        assert_eq!(clipboard.state(), &ClipboardState::Empty);
    }

    #[test]
    fn plan_uses_the_pending_entry() {
        let mut clipboard = Clipboard::default();
        clipboard.stage(entry("/r/a.txt", ClipboardIntent::Copy));

        let plan = clipboard.plan_paste(Path::new("/t")).unwrap();
        assert_eq!(plan.destination_path, PathBuf::from("/t/a-copy.txt"));
        // planning is not a transition
        assert!(clipboard.pending().is_some());
    }
}
