//! Application configuration management.
//!
//! Settings persist as TOML in the XDG config directory; a missing file means
//! defaults.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::catalog::client::{DEFAULT_BASE_URL, DEFAULT_SEARCH_PATH, DEFAULT_USER_AGENT};

/// Catalog access settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub search_path: String,
    pub user_agent: String,
    /// Delay after each search request (ms)
    pub search_delay_ms: u64,
    /// Delay after each detail page request (ms)
    pub detail_delay_ms: u64,
    /// Request timeout; None keeps the HTTP client's default
    pub request_timeout_secs: Option<u64>,
    /// Look past the first result section of a kind when matching
    pub match_all_sections: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            search_path: DEFAULT_SEARCH_PATH.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            search_delay_ms: 750,
            detail_delay_ms: 1000,
            request_timeout_secs: None,
            match_all_sections: false,
        }
    }
}

/// Export loading settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Sessions this short or shorter are dropped as previews
    pub min_duration_secs: i64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            min_duration_secs: crate::io::DEFAULT_MIN_DURATION_SECS,
        }
    }
}

impl LoaderConfig {
    pub fn min_duration(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::seconds(self.min_duration_secs.max(0))
    }
}

/// Enrichment cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Custom database file (None uses the XDG data directory)
    pub database_path: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            database_path: None,
        }
    }
}

/// Log settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Custom log directory (None uses the XDG data directory)
    pub log_dir: Option<PathBuf>,
    /// trace/debug/info/warn/error
    pub log_level: String,
    pub enable_file_logging: bool,
    /// Write file logs as JSON lines
    pub json_file_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            log_level: "info".to_string(),
            enable_file_logging: false,
            json_file_format: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub log: LogConfig,
}

pub fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "watchlens", "watchlens").context("Failed to get project directories")
}

/// Loads and saves [`AppConfig`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Manager for the default XDG location.
    pub fn new() -> Result<Self> {
        let config_file = project_dirs()?.config_dir().join("config.toml");
        debug!("Config file path: {}", config_file.display());
        Self::with_path(config_file)
    }

    /// Manager for an explicit config file.
    pub fn with_path(config_path: impl Into<PathBuf>) -> Result<Self> {
        let config_path = config_path.into();
        if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        Ok(Self { config_path })
    }

    pub fn load_config(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            info!(
                "Config file not found, using default settings: {}",
                self.config_path.display()
            );
            return Ok(AppConfig::default());
        }

        let config_content = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config: AppConfig = toml::from_str(&config_content).with_context(|| {
            format!(
                "Failed to parse config file: {}",
                self.config_path.display()
            )
        })?;

        info!(
            "✅ Configuration loaded from: {}",
            self.config_path.display()
        );
        Ok(config)
    }

    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        let config_content =
            toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, config_content).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        info!("💾 Configuration saved to: {}", self.config_path.display());
        Ok(())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn config_exists(&self) -> bool {
        self.config_path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("config.toml")).unwrap();
        assert!(!manager.config_exists());
        assert_eq!(manager.load_config().unwrap(), AppConfig::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("nested/config.toml")).unwrap();

        let mut config = AppConfig::default();
        config.catalog.search_delay_ms = 0;
        config.catalog.request_timeout_secs = Some(20);
        config.cache.enabled = false;
        manager.save_config(&config).unwrap();

        assert_eq!(manager.load_config().unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[catalog]\nmatch_all_sections = true\n").unwrap();

        let config = ConfigManager::with_path(&path).unwrap().load_config().unwrap();
        assert!(config.catalog.match_all_sections);
        assert_eq!(config.catalog.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.loader.min_duration_secs, 300);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[catalog\n").unwrap();
        assert!(ConfigManager::with_path(&path).unwrap().load_config().is_err());
    }
}
