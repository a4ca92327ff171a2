//! ``src/view/listing.rs``
//! ============================================================================
//! # Listing View
//!
//! Renders a directory listing as `<n> || <name>` lines. Directories are
//! yellow, text files green, anything else red. Colour is optional so piped
//! output and tests get plain text.

use std::path::Path;

use crossterm::style::{Color, Stylize};

use crate::fs::file_system::FileSystem;
use crate::fs::object_info::{ObjectInfo, ObjectType};
use crate::model::reference_index::DirectoryListing;

pub const SEPARATOR: &str = "-------------------------------------------------------------------------";

const fn color_for(object_type: ObjectType) -> Color {
    match object_type {
        ObjectType::Dir => Color::Yellow,
        ObjectType::TextFile => Color::Green,
        ObjectType::File => Color::Red,
    }
}

/// Format one numbered entry.
pub fn format_entry(reference: usize, info: &ObjectInfo, colored: bool) -> String {
    let name = info.name.as_str();
    if colored {
        format!("{reference} || {}", name.with(color_for(info.object_type)))
    } else {
        format!("{reference} || {name}")
    }
}

/// Classify and format every entry of `listing`.
pub fn render_listing<F: FileSystem + ?Sized>(
    fs: &F,
    listing: &DirectoryListing,
    colored: bool,
) -> Vec<String> {
    let mut lines = Vec::with_capacity(listing.len() + 2);
    lines.push(format_header(listing.directory(), colored));

    if listing.is_empty() {
        lines.push("(empty directory)".to_string());
    }

    lines.extend(listing.numbered().map(|(reference, name)| {
        let info = ObjectInfo::from_entry(fs, listing.directory(), name);
        format_entry(reference, &info, colored)
    }));
    lines
}

fn format_header(directory: &Path, colored: bool) -> String {
    let header = format!("Contents of {}", directory.display());
    if colored { header.bold().to_string() } else { header }
}
