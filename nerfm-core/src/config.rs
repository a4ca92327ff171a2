//! src/config.rs
//! ============================================================================
//! # Config: Application Configuration Loader and Saver
//!
//! User-editable settings stored as TOML in the platform config directory
//! found through [`directories`](https://docs.rs/directories).
//!
//! ## Features
//! - XDG-compliant config discovery (Linux, macOS, Windows)
//! - Missing file is created with defaults on first run
//! - Missing keys fall back to defaults, so old files keep loading
//!
//! ## Example
//! ```rust,ignore
//! let config = Config::load_from(&Config::config_path())?;
//! let root = config.resolve_root()?;
//! ```

use clipr::ClipboardConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::error::AppError;
use crate::logging::LoggerConfig;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "nerfm";
const APPLICATION: &str = "nerfm";

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const ANNOTATION_FILE_NAME: &str = "annotations.json";

/// Main configuration struct for the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory the session starts in and cannot ascend above.
    /// Unset means the process working directory.
    pub root_dir: Option<PathBuf>,

    pub annotation_file: PathBuf,

    pub clipboard: ClipboardConfig,

    pub logging: LoggerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: None,
            annotation_file: default_annotation_file(),
            clipboard: ClipboardConfig::default(),
            logging: LoggerConfig::default(),
        }
    }
}

impl Config {
    /// Loads config from `path`, writing the defaults there if it does not exist.
    ///
    /// Runs before logging is installed, so it reports nothing itself.
    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        let config = if path.exists() {
            let text = fs::read_to_string(path).map_err(|source| AppError::ConfigIo {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str::<Self>(&text)?
        } else {
            let default_config = Self::default();
            default_config.save_to(path)?;
            default_config
        };

        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        let io_err = |source: io::Error| AppError::ConfigIo {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        fs::write(path, toml_str).map_err(io_err)?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.clipboard.validate()?;

        if self.annotation_file.as_os_str().is_empty() {
            return Err(AppError::invalid_input(
                "annotation_file",
                "must not be empty",
            ));
        }

        Ok(())
    }

    /// Absolute session root, checked to be a directory.
    pub fn resolve_root(&self) -> Result<PathBuf, AppError> {
        let root = match &self.root_dir {
            Some(dir) => std::path::absolute(dir)?,
            None => std::env::current_dir()?,
        };

        if !root.is_dir() {
            return Err(AppError::NotADirectory(root));
        }
        Ok(root)
    }

    /// Returns the canonical config file path using `directories::ProjectDirs`,
    /// or `config.toml` in the working directory when there is no home.
    pub fn config_path() -> PathBuf {
        config_path_in(project_dirs().as_ref())
    }
}

fn config_path_in(dirs: Option<&ProjectDirs>) -> PathBuf {
    dirs.map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

fn default_annotation_file() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join(ANNOTATION_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(ANNOTATION_FILE_NAME))
}

pub(crate) fn default_log_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogRotation;
    use tempfile::TempDir;

    #[test]
    fn first_load_creates_the_file_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join(CONFIG_FILE_NAME);

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.clipboard.copy_suffix, "-copy");
        assert!(config.root_dir.is_none());

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.annotation_file, config.annotation_file);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "root_dir = \"/srv/files\"\n\n[clipboard]\ncopy_suffix = \"_bak\"\n\n[logging]\nrotation = \"never\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.root_dir, Some(PathBuf::from("/srv/files")));
        assert_eq!(config.clipboard.copy_suffix, "_bak");
        assert!(matches!(config.logging.rotation, LogRotation::Never));
        assert_eq!(config.logging.log_level, "info");
    }

    #[test]
    fn invalid_suffix_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[clipboard]\ncopy_suffix = \"a/b\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, AppError::Clipboard(_)));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "root_dir = [").unwrap();

        assert!(matches!(Config::load_from(&path), Err(AppError::Config(_))));
    }

    #[test]
    fn root_must_be_a_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("plain.txt");
        fs::write(&file, "x").unwrap();

        let config = Config {
            root_dir: Some(file),
            ..Config::default()
        };
        assert!(matches!(config.resolve_root(), Err(AppError::NotADirectory(_))));

        let config = Config {
            root_dir: Some(temp_dir.path().to_path_buf()),
            ..Config::default()
        };
        assert_eq!(config.resolve_root().unwrap(), temp_dir.path());
    }

    #[test]
    fn config_path_falls_back_to_working_directory() {
        assert_eq!(config_path_in(None), PathBuf::from(CONFIG_FILE_NAME));
        if let Some(dirs) = project_dirs() {
            assert_eq!(
                config_path_in(Some(&dirs)),
                dirs.config_dir().join(CONFIG_FILE_NAME)
            );
        }
    }
}
