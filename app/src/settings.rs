//! User settings read from `settings.toml`.
//!
//! Every key is optional; missing keys take the built-in defaults.
//!
//! ```toml
//! excluded_directories = [".venv", "__pycache__", "tests", "build"]
//! exclude_hidden = true
//! default_permissions = "755"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use directories_next::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::fs_op::Mode;
use crate::tree::{TreeOptions, DEFAULT_EXCLUDED};

pub const SETTINGS_FILE: &str = "settings.toml";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid default_permissions {0:?}")]
    Permissions(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub excluded_directories: Vec<String>,
    pub exclude_hidden: bool,
    /// Octal (`"755"`) or symbolic (`"rwxr-xr-x"`) mode for new folders.
    pub default_permissions: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            excluded_directories: DEFAULT_EXCLUDED.iter().map(|s| s.to_string()).collect(),
            exclude_hidden: true,
            default_permissions: "755".to_string(),
        }
    }
}

impl Settings {
    pub fn tree_options(&self) -> TreeOptions {
        TreeOptions {
            excluded: self.excluded_directories.iter().cloned().collect(),
            exclude_hidden: self.exclude_hidden,
            ..TreeOptions::default()
        }
    }

    pub fn default_mode(&self) -> Result<Mode, SettingsError> {
        self.default_permissions
            .parse()
            .map_err(|_| SettingsError::Permissions(self.default_permissions.clone()))
    }
}

/// Location of the per-user settings file, if a config directory exists.
pub fn default_settings_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pathwiz").map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
}

/// Load settings from `path`, or from the per-user location when `None`.
///
/// An explicit path must exist. A missing per-user file yields defaults.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, SettingsError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_settings_path() {
            Some(p) if p.exists() => p,
            _ => {
                debug!("No settings file found, using defaults");
                return Ok(Settings::default());
            }
        },
    };
    let raw = fs::read_to_string(&path).map_err(|source| SettingsError::Io {
        path: path.clone(),
        source,
    })?;
    let settings = toml::from_str(&raw).map_err(|source| SettingsError::Parse {
        path: path.clone(),
        source,
    })?;
    debug!("Loaded settings from {}", path.display());
    Ok(settings)
}
