use crate::error::{ClipError, ClipResult};
use serde::{Deserialize, Serialize};
use std::path::is_separator;

pub const DEFAULT_COPY_SUFFIX: &str = "-copy";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardConfig {
    /// Inserted between stem and extension when a copy is pasted
    pub copy_suffix: String,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            copy_suffix: DEFAULT_COPY_SUFFIX.to_string(),
        }
    }
}

impl ClipboardConfig {
    /// Reject suffixes that would produce an empty rename or escape the target directory.
    pub fn validate(&self) -> ClipResult<()> {
        if self.copy_suffix.is_empty() {
            return Err(ClipError::config_error("copy_suffix must not be empty"));
        }

        if self.copy_suffix.chars().any(is_separator) {
            return Err(ClipError::config_error(format!(
                "copy_suffix must not contain a path separator: {:?}",
                self.copy_suffix
            )));
        }

        Ok(())
    }
}
