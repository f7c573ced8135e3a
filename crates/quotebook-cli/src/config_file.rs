//! Persistent CLI configuration.

use std::env;
use std::path::{Path, PathBuf};

use quotebook_core::config::SyncSettings;
use quotebook_core::util::normalize_text_option;
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "config.json";
const APP_DIR_NAME: &str = "quotebook";

pub const ENDPOINT_ENV: &str = "QUOTEBOOK_ENDPOINT";
pub const DB_PATH_ENV: &str = "QUOTEBOOK_DB_PATH";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub db_path: Option<String>,
    #[serde(default)]
    pub sync: SyncSettings,
}

const fn default_config_version() -> u32 {
    1
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            version: default_config_version(),
            db_path: None,
            sync: SyncSettings::default(),
        }
    }
}

fn app_dir(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

pub fn default_config_path() -> PathBuf {
    app_dir(dirs::config_dir()).join(CONFIG_FILE_NAME)
}

pub fn default_db_path() -> PathBuf {
    app_dir(dirs::data_dir()).join("quotebook.db")
}

impl CliConfig {
    /// Load from `path`, or the default location, then apply env overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        let path = path.map_or_else(default_config_path, Path::to_path_buf);
        let mut config = Self::load_from_path(&path)?;
        config.apply_env_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
        let mut config = serde_json::from_str::<Self>(&raw)
            .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
        config.normalize();
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                )
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)
            .map_err(|error| format!("Failed to serialize config: {error}"))?;
        std::fs::write(path, serialized)
            .map_err(|error| format!("Failed to write config at {}: {}", path.display(), error))
    }

    /// Environment values win over the file; blank values are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = normalize_text_option(lookup(ENDPOINT_ENV)) {
            self.sync.endpoint = endpoint;
        }
        if let Some(db_path) = normalize_text_option(lookup(DB_PATH_ENV)) {
            self.db_path = Some(db_path);
        }
    }

    /// Database path: the explicit flag first, then config/env, then the data dir.
    pub fn resolve_db_path(&self, cli_db_path: Option<PathBuf>) -> PathBuf {
        cli_db_path
            .or_else(|| self.db_path.as_ref().map(PathBuf::from))
            .unwrap_or_else(default_db_path)
    }

    fn normalize(&mut self) {
        self.db_path = normalize_text_option(self.db_path.take());
        self.sync.endpoint = self.sync.endpoint.trim().to_string();
    }
}
