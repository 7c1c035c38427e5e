use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::EntitySet;

const APP_NAME: &str = "schedule-delta";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Which collections the store tracks.
    pub entity_set: EntitySet,
    /// Tracing filter used when `RUST_LOG` is not set.
    pub log_filter: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            entity_set: EntitySet::Full,
            log_filter: None,
            pretty: true,
        }
    }
}

impl SessionConfig {
    /// Load configuration from `path`, or from the user's config directory
    /// when no path is given. Returns the default config if the file doesn't
    /// exist or fails to parse.
    pub fn load(path: Option<&Path>) -> Self {
        let resolved = match path {
            Some(path) => Ok(path.to_path_buf()),
            None => default_config_path(),
        };
        match resolved.and_then(|path| Self::load_from(&path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit file. A missing file is not an
    /// error and yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;

        let config = serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save the configuration, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SessionConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let config = SessionConfig {
            entity_set: EntitySet::TasksOnly,
            log_filter: Some("schedule_delta=trace".to_string()),
            pretty: false,
        };
        config.save_to(&path).unwrap();
        assert_eq!(SessionConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{"entity_set": "tasks_only"}"#).unwrap();
        let config = SessionConfig::load_from(&path).unwrap();
        assert_eq!(config.entity_set, EntitySet::TasksOnly);
        assert!(config.pretty);
    }

    #[test]
    fn test_unparseable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "not json").unwrap();
        assert!(SessionConfig::load_from(&path).is_err());
    }
}
