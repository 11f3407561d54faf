//! # Config Loader — loads and validates TOML configuration
//!
//! Reads `phishlens.toml` (or a custom path) and deserializes into typed
//! config structs. Missing sections fall back to defaults so a partial file
//! is always valid.

use crate::error::{LensError, LensResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Top-level PhishLens configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LensConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace | debug | info | warn | error
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the JSON API.
    pub bind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Whether store snapshots are written at all.
    pub enabled: bool,
    /// Directory snapshot files are written to.
    pub data_dir: String,
    /// lz4-compress snapshot payloads.
    pub compress: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8088".into(),
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            data_dir: "./phishlens-data".into(),
            compress: true,
        }
    }
}

impl LensConfig {
    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> LensResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            LensError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: LensConfig = toml::from_str(&raw)
            .map_err(|e| LensError::Config(format!("invalid config {}: {}", path.display(), e)))?;
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Write the configuration out as pretty TOML.
    pub fn save(&self, path: impl AsRef<Path>) -> LensResult<()> {
        let rendered = toml::to_string_pretty(self)
            .map_err(|e| LensError::Config(format!("failed to render config: {}", e)))?;
        std::fs::write(path.as_ref(), rendered)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = LensConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert!(config.persistence.enabled);
        assert!(config.server.bind.contains(':'));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: LensConfig = toml::from_str("[general]\nlog_level = \"debug\"\n").unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.server.bind, ServerConfig::default().bind);
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = std::env::temp_dir().join("phishlens_config_test");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("phishlens.toml");

        let mut config = LensConfig::default();
        config.server.bind = "0.0.0.0:9000".into();
        config.save(&path).unwrap();

        let loaded = LensConfig::load(&path).unwrap();
        assert_eq!(loaded.server.bind, "0.0.0.0:9000");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
