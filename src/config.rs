//! Configuration file support for py3ready
//!
//! Reads configuration from `~/.config/py3ready/config.json`:
//!
//! ```json
//! {
//!   "registry_url": "https://pypi.org",
//!   "overrides_url": "https://example.com/overrides.json",
//!   "cache_capacity": 1024,
//!   "timeout_secs": 30,
//!   "overrides": ["some-internal-package"]
//! }
//! ```
//!
//! Every field is optional.

use crate::cache::DEFAULT_CAPACITY;
use crate::lookup::DEFAULT_REGISTRY_URL;
use crate::overrides::DEFAULT_OVERRIDES_URL;
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No config directory: set XDG_CONFIG_HOME or HOME")]
    NoConfigDir,

    #[error("Cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Top-level configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the package registry
    #[serde(default = "default_registry_url")]
    pub registry_url: String,

    /// Location of the curated overrides document
    #[serde(default = "default_overrides_url")]
    pub overrides_url: String,

    /// Maximum number of projects remembered per run
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Request timeout in seconds (0 disables the timeout)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Additional projects to treat as supporting Python 3
    #[serde(default)]
    pub overrides: Vec<String>,
}

fn default_registry_url() -> String {
    DEFAULT_REGISTRY_URL.to_string()
}

fn default_overrides_url() -> String {
    DEFAULT_OVERRIDES_URL.to_string()
}

fn default_cache_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_url: default_registry_url(),
            overrides_url: default_overrides_url(),
            cache_capacity: default_cache_capacity(),
            timeout_secs: default_timeout_secs(),
            overrides: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from the default path or return defaults if not found
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_path()?)
    }

    /// Load configuration from `path`, returning defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The request timeout, or `None` when disabled
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Returns the config file path: `$XDG_CONFIG_HOME/py3ready/config.json`,
/// or `~/.config/py3ready/config.json` when that is unset.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    config_path_in(std::env::var_os("XDG_CONFIG_HOME"), dirs::home_dir())
}

fn config_path_in(
    xdg_config_home: Option<OsString>,
    home: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    let base = xdg_config_home
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home.map(|h| h.join(".config")))
        .ok_or(ConfigError::NoConfigDir)?;
    Ok(base.join("py3ready").join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.registry_url, "https://pypi.org");
        assert_eq!(config.cache_capacity, 1024);
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert!(config.overrides.is_empty());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.registry_url, DEFAULT_REGISTRY_URL);
        assert_eq!(config.overrides_url, DEFAULT_OVERRIDES_URL);
        assert_eq!(config.cache_capacity, DEFAULT_CAPACITY);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "registry_url": "https://mirror.example.com",
            "overrides_url": "https://example.com/overrides.json",
            "cache_capacity": 16,
            "timeout_secs": 0,
            "overrides": ["internal-tool", "Legacy_Lib"]
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.registry_url, "https://mirror.example.com");
        assert_eq!(config.overrides_url, "https://example.com/overrides.json");
        assert_eq!(config.cache_capacity, 16);
        assert_eq!(config.timeout(), None);
        assert_eq!(config.overrides, vec!["internal-tool", "Legacy_Lib"]);
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.registry_url, DEFAULT_REGISTRY_URL);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"cache_capacity": 8}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.cache_capacity, 8);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ nope").unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_config_path_prefers_xdg() {
        let path = config_path_in(
            Some(OsString::from("/xdg")),
            Some(PathBuf::from("/home/me")),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/xdg/py3ready/config.json"));
    }

    #[test]
    fn test_config_path_falls_back_to_home() {
        let path = config_path_in(Some(OsString::new()), Some(PathBuf::from("/home/me"))).unwrap();
        assert_eq!(path, PathBuf::from("/home/me/.config/py3ready/config.json"));
    }

    #[test]
    fn test_config_path_without_any_directory() {
        let err = config_path_in(None, None).unwrap_err();
        assert!(matches!(err, ConfigError::NoConfigDir));
        assert!(err.to_string().contains("XDG_CONFIG_HOME"));
    }

    #[test]
    fn test_config_path() {
        let path = config_path().unwrap();
        assert!(path.to_string_lossy().contains("py3ready/config.json"));
    }
}
