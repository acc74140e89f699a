//! Persisted application preferences.
//!
//! Stored as TOML under the `.visor` root. Only lightweight UI preferences
//! live here: where the last model was opened from and a bounded list of
//! recently loaded models. Model files themselves are never copied.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;

/// Default filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Maximum number of entries kept in the recent-models list.
pub const MAX_RECENT_MODELS: usize = 8;

/// Application preferences loaded from disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    /// Directory the file dialog opens in, set from the last loaded model.
    #[serde(default)]
    pub last_model_dir: Option<PathBuf>,
    /// Most recently loaded model paths, newest first.
    #[serde(default)]
    pub recent_models: Vec<PathBuf>,
}

impl AppConfig {
    /// Record a freshly loaded model, updating the dialog directory and the
    /// recent list (deduplicated, newest first, bounded).
    pub fn note_loaded_model(&mut self, path: &Path) {
        self.last_model_dir = path.parent().map(Path::to_path_buf);
        self.recent_models.retain(|entry| entry != path);
        self.recent_models.insert(0, path.to_path_buf());
        self.recent_models.truncate(MAX_RECENT_MODELS);
    }
}

/// Errors that may occur while loading or saving app configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The parent directory for the config file could not be created.
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Reading the config file failed.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Writing the config file failed.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The config file exists but is not valid TOML for this schema.
    #[error("Invalid config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Serializing the config to TOML failed.
    #[error("Failed to serialize config for {path}: {source}")]
    Serialize {
        path: PathBuf,
        source: toml::ser::Error,
    },
    /// No suitable config directory found.
    #[error("No suitable config directory found")]
    NoConfigDir,
}

/// Resolve the configuration file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = app_dirs::app_root_dir().map_err(map_app_dir_error)?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load configuration from disk, returning defaults if the file is missing.
pub fn load_or_default() -> Result<AppConfig, ConfigError> {
    let path = config_path()?;
    load_from(&path)
}

/// Load configuration from a specific path, defaulting when absent.
pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Persist configuration, overwriting any previous contents.
pub fn save(config: &AppConfig) -> Result<(), ConfigError> {
    let path = config_path()?;
    save_to_path(config, &path)
}

/// Save configuration to a specific path, creating parent directories as needed.
pub fn save_to_path(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = toml::to_string_pretty(config).map_err(|source| ConfigError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, data).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn map_app_dir_error(error: app_dirs::AppDirError) -> ConfigError {
    match error {
        app_dirs::AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        app_dirs::AppDirError::CreateDir { path, source } => ConfigError::CreateDir { path, source },
    }
}
