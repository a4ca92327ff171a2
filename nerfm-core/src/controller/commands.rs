//! ``src/controller/commands.rs``
//! ============================================================================
//! # Command Grammar
//!
//! One input line is `[<NER>] <verb> [argument]`. The argument is the rest of
//! the line, so annotation text may contain spaces. A line holding only a
//! number views that entry.

use std::{fmt, str::FromStr};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    View,
    Descend,
    Ascend,
    Copy,
    Cut,
    Paste,
    Delete,
    Mkdir,
    Touch,
    Find,
    Annotate,
    Unannotate,
    Note,
    Help,
    Exit,
}

impl Verb {
    /// Acts on a referenced entry, either given on the line or remembered.
    pub fn needs_entry(self) -> bool {
        matches!(
            self,
            Self::View
                | Self::Descend
                | Self::Copy
                | Self::Cut
                | Self::Delete
                | Self::Annotate
                | Self::Unannotate
                | Self::Note
        )
    }

    /// The argument, when present, must equal the referenced entry's name.
    pub fn checks_name(self) -> bool {
        matches!(self, Self::View | Self::Descend | Self::Copy | Self::Cut)
    }

    pub fn requires_argument(self) -> bool {
        matches!(self, Self::Mkdir | Self::Touch | Self::Find | Self::Annotate)
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::View => "visu",
            Self::Descend => ".",
            Self::Ascend => "..",
            Self::Copy => "copy",
            Self::Cut => "cut",
            Self::Paste => "paste",
            Self::Delete => "delete",
            Self::Mkdir => "mkdir",
            Self::Touch => "touch",
            Self::Find => "find",
            Self::Annotate => "+",
            Self::Unannotate => "-",
            Self::Note => "note",
            Self::Help => "help",
            Self::Exit => "exit",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Verb {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let verb = match s {
            "visu" => Self::View,
            "." => Self::Descend,
            ".." => Self::Ascend,
            "copy" => Self::Copy,
            "cut" => Self::Cut,
            "paste" | "past" => Self::Paste,
            "delete" => Self::Delete,
            "mkdir" => Self::Mkdir,
            "touch" => Self::Touch,
            "find" => Self::Find,
            "+" => Self::Annotate,
            "-" => Self::Unannotate,
            "note" => Self::Note,
            "help" => Self::Help,
            "exit" => Self::Exit,
            other => {
                return Err(AppError::invalid_input(
                    "command",
                    format!("unknown command {other:?}, type help"),
                ));
            }
        };
        Ok(verb)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub reference: Option<usize>,
    pub verb: Verb,
    pub argument: Option<String>,
}

impl Command {
    pub fn new(reference: Option<usize>, verb: Verb, argument: Option<&str>) -> Self {
        Self {
            reference,
            verb,
            argument: argument.map(str::to_owned),
        }
    }

    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }
}

impl FromStr for Command {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(AppError::invalid_input("command", "empty command"));
        }

        let (first, rest) = split_token(line);
        let (reference, rest) = match first.parse::<usize>() {
            Ok(reference) => (Some(reference), rest),
            Err(_) => (None, line),
        };

        let (verb, argument) = if rest.is_empty() {
            (Verb::View, None)
        } else {
            let (keyword, argument) = split_token(rest);
            (keyword.parse::<Verb>()?, Some(argument).filter(|a| !a.is_empty()))
        };

        if verb.requires_argument() && argument.is_none() {
            return Err(AppError::invalid_input(
                verb.keyword(),
                match verb {
                    Verb::Annotate => "missing annotation text",
                    Verb::Mkdir => "missing directory name",
                    _ => "missing file name",
                },
            ));
        }

        Ok(Self::new(reference, verb, argument))
    }
}

/// First whitespace-delimited token and the trimmed remainder.
fn split_token(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim()),
        None => (s, ""),
    }
}

pub const HELP_LINES: &[(&str, &str)] = &[
    ("[<NER>] copy", "copy the entry; pasting it adds \"-copy\" to the name"),
    ("[<NER>] cut", "cut the entry; it moves on paste"),
    ("paste", "paste the copied or cut entry into the current directory"),
    ("..", "go up one directory"),
    ("[<NER>] .", "enter the entry if it is a directory"),
    ("mkdir <name>", "create a directory"),
    ("touch <name>", "create <name>.txt"),
    ("[<NER>] visu", "show a text file, or the size of anything else"),
    ("find <name>", "search the current directory tree for files named <name>"),
    ("[<NER>] delete", "delete the entry and its annotations"),
    ("[<NER>] + <text>", "append text to the entry's annotation"),
    ("[<NER>] -", "remove the entry's annotation"),
    ("[<NER>] note", "show the entry's annotation"),
    ("help", "show this summary"),
    ("exit", "leave; a pending cut deletes its source"),
];
