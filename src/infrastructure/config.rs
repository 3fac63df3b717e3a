// src/infrastructure/config.rs
use crate::application::WorkspaceOptions;
use crate::constants::{DEFAULT_CUSTOM_FOLDER_ID, PREVIEW_CHAR_LIMIT, UNKNOWN_SOURCE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const STORE_FILE_NAME: &str = "store.json";
const APP_DIR: &str = "termnote";

/// TOML configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub workspace: WorkspaceConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct StoreConfig {
    /// Store file; empty means the platform data directory
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct WorkspaceConfig {
    #[serde(default = "default_folder")]
    pub default_folder: String,
    #[serde(default = "default_unknown_source")]
    pub unknown_source: String,
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

fn default_folder() -> String { DEFAULT_CUSTOM_FOLDER_ID.to_string() }
fn default_unknown_source() -> String { UNKNOWN_SOURCE.to_string() }
fn default_preview_chars() -> usize { PREVIEW_CHAR_LIMIT }

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            default_folder: default_folder(),
            unknown_source: default_unknown_source(),
            preview_chars: default_preview_chars(),
        }
    }
}

impl From<&WorkspaceConfig> for WorkspaceOptions {
    fn from(config: &WorkspaceConfig) -> Self {
        Self {
            default_folder: config.default_folder.clone(),
            unknown_source: config.unknown_source.clone(),
            preview_chars: config.preview_chars,
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .context("Failed to parse TOML config")?;

        Ok(config)
    }

    /// Explicit path if given, else the user config file if it exists, else defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => {
                debug!(?path, "Loading user config");
                Self::load(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .context("Failed to serialize config to TOML")?;

        if let Some(parent) = path.as_ref().parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        std::fs::write(path.as_ref(), toml_string)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Create default configuration file at path
    pub fn create_default(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    /// Store file to open: `--store` wins over the config, which wins over the data dir
    pub fn resolve_store_path(&self, cli_override: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = cli_override {
            return Ok(path.to_path_buf());
        }
        if !self.store.path.is_empty() {
            return Ok(PathBuf::from(&self.store.path));
        }
        let data_dir = dirs::data_dir().context("Could not find data directory")?;
        Ok(data_dir.join(APP_DIR).join(STORE_FILE_NAME))
    }

    pub fn workspace_options(&self) -> WorkspaceOptions {
        WorkspaceOptions::from(&self.workspace)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE_NAME))
}
