//! # clipr - Single-Slot Clipboard for File Managers
//!
//! Models the copy/cut clipboard of an interactive file browser: one pending
//! source at a time, an intent, and a manifest of the annotations captured
//! when the source was staged.
//!
//! The crate performs no I/O. Callers build the manifest, drive the
//! `Empty | Pending` transitions, and execute the planned [`PasteOperation`].

pub mod clipboard;
pub mod config;
pub mod error;
pub mod item;
pub mod operations;

// Re-export main types for easy use
pub use clipboard::{Clipboard, ClipboardState};
pub use config::ClipboardConfig;
pub use error::{ClipError, ClipResult};
pub use item::{ClipboardEntry, ClipboardIntent, Manifest, ManifestEntry, SourceKind};
pub use operations::{FileOperation, PasteOperation, destination_name};
