use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{CmdvaultError, Result};

/// File name searched for in the working directory
pub const LOCAL_CONFIG_FILE: &str = "cmdvault.toml";

/// Main configuration structure for cmdvault
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Database location and collection naming
    #[serde(default)]
    pub storage: StorageConfig,
    /// How records are rendered in tables and exports
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path of the sled database, relative to the working directory
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    /// Name of the collection holding command records
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            collection: default_collection(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("commands.db")
}

fn default_collection() -> String {
    "commands".to_string()
}

/// Display configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// chrono format string used for the Date Added column and exports
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timestamp_format: default_timestamp_format(),
        }
    }
}

fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

impl Config {
    /// Parse a config file from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CmdvaultError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content)
            .map_err(|e| CmdvaultError::Config(format!("Failed to parse config: {e}")))
    }

    /// Load the explicit config file if given, otherwise the first of
    /// `./cmdvault.toml` and `<config dir>/cmdvault/config.toml` that exists,
    /// otherwise defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            tracing::info!("Loading config from: {}", path.display());
            return Self::from_file(path);
        }

        let default_paths = [
            Some(PathBuf::from(LOCAL_CONFIG_FILE)),
            dirs::config_dir().map(|c| c.join("cmdvault").join("config.toml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }
}
