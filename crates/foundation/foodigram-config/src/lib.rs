//! # Foodigram Config
//!
//! Application configuration, resolved in three layers:
//!
//! 1. Built-in defaults
//! 2. An optional YAML file
//! 3. `FOODIGRAM_*` environment variables
//!
//! Later layers win.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub const ENV_API_URL: &str = "FOODIGRAM_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "FOODIGRAM_TIMEOUT_SECS";
pub const ENV_CATALOG: &str = "FOODIGRAM_CATALOG";
pub const ENV_STORAGE: &str = "FOODIGRAM_STORAGE";

/// Result type for configuration loading
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Resolved application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the backend (auth, profile, social endpoints)
    pub api_url: String,

    /// Per-request timeout for the session client
    pub request_timeout_secs: u64,

    /// Catalog document to load at startup
    pub catalog_path: PathBuf,

    /// Durable key/value storage file
    pub storage_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_secs: 10,
            catalog_path: PathBuf::from("data/catalog.json"),
            storage_path: default_storage_path(),
        }
    }
}

/// `<data dir>/foodigram/storage.json`, or the working directory as a fallback
pub fn default_storage_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("foodigram")
        .join("storage.json")
}

impl AppConfig {
    /// Resolve the full configuration from the process environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let vars: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with("FOODIGRAM_"))
            .collect();
        Self::resolve(file, &vars)
    }

    /// Resolve with an explicit variable map
    pub fn resolve(file: Option<&Path>, vars: &HashMap<String, String>) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(vars)?;
        config.validate()?;

        info!(api_url = %config.api_url, catalog = %config.catalog_path.display(), "configuration resolved");
        Ok(config)
    }

    /// Read a YAML file on top of the defaults; missing keys keep their default
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: AppConfig = serde_yaml::from_str(&content).map_err(|source| Error::Yaml {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    fn apply_overrides(&mut self, vars: &HashMap<String, String>) -> Result<()> {
        if let Some(url) = vars.get(ENV_API_URL) {
            self.api_url = url.clone();
        }

        if let Some(raw) = vars.get(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = raw.trim().parse().map_err(|e| {
                warn!("Invalid {ENV_TIMEOUT_SECS} value: {raw}");
                Error::InvalidValue {
                    key: ENV_TIMEOUT_SECS.to_string(),
                    reason: format!("{e}"),
                }
            })?;
        }

        if let Some(path) = vars.get(ENV_CATALOG) {
            self.catalog_path = PathBuf::from(path);
        }

        if let Some(path) = vars.get(ENV_STORAGE) {
            self.storage_path = PathBuf::from(path);
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        Url::parse(&self.api_url).map_err(|e| Error::InvalidValue {
            key: "api_url".to_string(),
            reason: e.to_string(),
        })?;

        if self.request_timeout_secs == 0 {
            return Err(Error::InvalidValue {
                key: "request_timeout_secs".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
