//! Configuration management

use crate::error::{DiaryError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the optional config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "diarist.toml";

/// Environment variable overriding the storage directory.
pub const DIR_ENV_VAR: &str = "DIARIST_DIR";

pub const DEFAULT_STORAGE_DIR: &str = "diary-entries";
pub const DEFAULT_EXTENSION: &str = ".diary";
pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding one file per entry.
    pub storage_dir: PathBuf,
    /// Extension of entry files, including the leading dot.
    pub extension: String,
    /// Idle period before a pending auto-save runs.
    pub autosave_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            extension: DEFAULT_EXTENSION.to_string(),
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY_MS,
        }
    }
}

impl Config {
    /// Config with default values and the given storage directory
    pub fn with_storage_dir(storage_dir: impl Into<PathBuf>) -> Self {
        Config {
            storage_dir: storage_dir.into(),
            ..Config::default()
        }
    }

    /// Load config from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            DiaryError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve configuration for a working directory.
    ///
    /// Precedence, highest first: `dir_override`, the `DIARIST_DIR` environment
    /// variable, `diarist.toml` in `cwd`, built-in defaults. A relative storage
    /// directory is resolved against `cwd`.
    pub fn resolve(cwd: &Path, dir_override: Option<PathBuf>) -> Result<Self> {
        let config_path = cwd.join(CONFIG_FILE_NAME);
        let mut config = if config_path.is_file() {
            Self::load_from_file(&config_path)?
        } else {
            Config::default()
        };

        if let Some(dir) = dir_override {
            config.storage_dir = dir;
        } else if let Some(dir) = std::env::var_os(DIR_ENV_VAR).filter(|d| !d.is_empty()) {
            config.storage_dir = PathBuf::from(dir);
        }

        if config.storage_dir.is_relative() {
            config.storage_dir = cwd.join(&config.storage_dir);
        }

        Ok(config)
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    fn validate(&self) -> Result<()> {
        if !self.extension.starts_with('.') || self.extension.len() < 2 {
            return Err(DiaryError::Configuration(format!(
                "Invalid extension '{}': expected a leading dot, e.g. \".diary\"",
                self.extension
            )));
        }
        Ok(())
    }
}
