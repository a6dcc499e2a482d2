//! Configuration File Loading
//!
//! Loads the engine configuration from disk, searching a fixed set of
//! locations and falling back to defaults when nothing is found.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::EngineConfig;
use crate::error::{Error, Result};

/// Configuration file loader
pub struct ConfigLoader {
    /// Search paths for configuration files, in priority order
    search_paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigLoader {
    /// Create a loader with the default search paths
    pub fn new() -> Self {
        Self {
            search_paths: Self::default_search_paths(),
        }
    }

    /// Load configuration, falling back to defaults when no file exists
    pub fn load() -> Result<EngineConfig> {
        let loader = Self::new();

        for path in &loader.search_paths {
            if path.is_file() {
                debug!("loading configuration from {}", path.display());
                let config = Self::load_from_path(path)?;
                config.validate()?;
                return Ok(config);
            }
        }

        debug!("no configuration file found, using defaults");
        Ok(EngineConfig::default())
    }

    /// Load configuration from an explicit path
    pub fn load_from_path(path: &Path) -> Result<EngineConfig> {
        let contents = fs::read_to_string(path).map_err(|e| Error::ConfigLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        match Self::detect_format(path) {
            ConfigFormat::Toml => {
                toml::from_str(&contents).map_err(|e| Error::ConfigParseFailed {
                    format: "TOML".to_string(),
                    reason: e.to_string(),
                })
            }
            ConfigFormat::Json => {
                serde_json::from_str(&contents).map_err(|e| Error::ConfigParseFailed {
                    format: "JSON".to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    fn detect_format(path: &Path) -> ConfigFormat {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }

    fn default_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(explicit) = env::var_os("SHELLPILOT_CONFIG") {
            paths.push(PathBuf::from(explicit));
        }

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("shellpilot").join("config.toml"));
        }

        paths.push(PathBuf::from("shellpilot.toml"));
        paths
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
