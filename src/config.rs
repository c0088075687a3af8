use crate::favorites::{FavoritesOptions, DEFAULT_FAVORITES_KEY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const CONFIG_ENV: &str = "PROPERTY_SCOUT_CONFIG";
pub const DATA_DIR_ENV: &str = "PROPERTY_SCOUT_DATA_DIR";
pub const CATALOG_ENV: &str = "PROPERTY_SCOUT_CATALOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Directory holding persisted state such as favorites
    pub data_dir: PathBuf,
    /// JSON catalog to browse. The built-in sample listings when unset.
    pub catalog_path: Option<PathBuf>,
    pub favorites_key: String,
    pub write_attempts: u32,
    pub retry_backoff_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            catalog_path: None,
            favorites_key: DEFAULT_FAVORITES_KEY.to_string(),
            write_attempts: 3,
            retry_backoff_ms: 200,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("property-scout"))
        .unwrap_or_else(|| PathBuf::from(".property-scout"))
}

impl Config {
    /// Load from the file named by `PROPERTY_SCOUT_CONFIG` (if any), then
    /// apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides(|name| std::env::var_os(name).map(PathBuf::from)))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!("Reading config from {}", path.display());
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<PathBuf>) -> Self {
        if let Some(dir) = lookup(DATA_DIR_ENV) {
            self.data_dir = dir;
        }
        if let Some(path) = lookup(CATALOG_ENV) {
            self.catalog_path = Some(path);
        }
        self
    }

    pub fn favorites_options(&self) -> FavoritesOptions {
        FavoritesOptions {
            key: self.favorites_key.clone(),
            write_attempts: self.write_attempts,
            retry_backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.favorites_key, "favorites");
        assert!(config.catalog_path.is_none());
        assert!(config.data_dir.ends_with("property-scout") || config.data_dir.ends_with(".property-scout"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "favoritesKey": "saved", "writeAttempts": 5 }"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.favorites_key, "saved");
        assert_eq!(config.write_attempts, 5);
        assert_eq!(config.retry_backoff_ms, 200);

        let options = config.favorites_options();
        assert_eq!(options.key, "saved");
        assert_eq!(options.retry_backoff, Duration::from_millis(200));
    }

    #[test]
    fn test_bad_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "nope").unwrap();
        assert!(matches!(Config::from_file(&path), Err(ConfigError::Parse { .. })));
        assert!(matches!(
            Config::from_file(&dir.path().join("missing.json")),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default().with_env_overrides(|name| match name {
            DATA_DIR_ENV => Some(PathBuf::from("/tmp/scout")),
            CATALOG_ENV => Some(PathBuf::from("listings.json")),
            _ => None,
        });
        assert_eq!(config.data_dir, PathBuf::from("/tmp/scout"));
        assert_eq!(config.catalog_path, Some(PathBuf::from("listings.json")));
    }
}
