//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::APP_BINARY_NAME;

/// Environment variable that overrides the backend URL.
pub const BACKEND_ENV_VAR: &str = "CODESEARCH_BACKEND";

/// Backend used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Theme display mode preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemeMode {
    /// Automatically detect OS theme (dark/light)
    #[default]
    Auto,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the codesearch server
    #[serde(default = "default_backend_url")]
    pub url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    /// Request timeout as a duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// UI preferences configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Theme mode preference (Auto, Dark, Light)
    #[serde(default)]
    pub theme_mode: ThemeMode,
    /// Display help on startup
    #[serde(default)]
    pub show_help_on_startup: bool,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level filter; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file; defaults to `codesearch.log` in the config directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/codesearch/config.toml`
/// - macOS: `~/Library/Application Support/codesearch/config.toml`
/// - Windows: `%APPDATA%\codesearch\config.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Backend connection
    #[serde(default)]
    pub backend: BackendConfig,
    /// UI preferences
    #[serde(default)]
    pub ui: UiConfig,
    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory.
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_BINARY_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Checks if the config file exists on disk.
    #[must_use]
    pub fn exists() -> bool {
        Self::config_file_path().is_ok_and(|path| path.exists())
    }

    /// Loads configuration from the default location, falling back to defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from `path`, falling back to defaults if it is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Saves configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Validates and atomically writes the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| {
                format!("Failed to create config directory: {}", dir.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        let temp_path = path.with_extension("toml.tmp");
        fs::write(&temp_path, content).with_context(|| {
            format!("Failed to write temp config file: {}", temp_path.display())
        })?;

        // Atomic rename
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to rename temp config file to: {}", path.display()))?;

        Ok(())
    }

    /// Validates configuration values.
    ///
    /// Checks:
    /// - backend URL is http(s)
    /// - timeout is non-zero
    /// - log level is a known level name
    pub fn validate(&self) -> Result<()> {
        let url = &self.backend.url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("Backend URL must start with http:// or https://: {url}");
        }

        if self.backend.timeout_secs == 0 {
            anyhow::bail!("Backend timeout must be at least 1 second");
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            anyhow::bail!(
                "Unknown log level '{}' (expected one of: {})",
                self.logging.level,
                LOG_LEVELS.join(", ")
            );
        }

        Ok(())
    }

    /// Applies a backend URL override, validating the result.
    pub fn override_backend(&mut self, url: Option<String>) -> Result<()> {
        if let Some(url) = url.filter(|url| !url.is_empty()) {
            tracing::debug!(%url, "backend overridden");
            self.backend.url = url;
            self.validate()?;
        }
        Ok(())
    }

    /// Applies the `CODESEARCH_BACKEND` environment variable, if set.
    pub fn apply_env(&mut self) -> Result<()> {
        self.override_backend(std::env::var(BACKEND_ENV_VAR).ok())
            .with_context(|| format!("Invalid {BACKEND_ENV_VAR}"))
    }

    /// Resolved log file location.
    pub fn log_file(&self) -> Result<PathBuf> {
        match &self.logging.file {
            Some(file) => Ok(file.clone()),
            None => Ok(Self::config_dir()?.join(format!("{APP_BINARY_NAME}.log"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_new() {
        let config = Config::new();
        assert_eq!(config.backend.url, DEFAULT_BACKEND_URL);
        assert_eq!(config.backend.timeout(), Duration::from_secs(30));
        assert_eq!(config.ui.theme_mode, ThemeMode::Auto);
        assert!(!config.ui.show_help_on_startup);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::new();
        config.backend.url = "localhost:8080".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.backend.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.logging.level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::new();
        config.backend.url = "https://search.example.com".to_string();
        config.ui.theme_mode = ThemeMode::Light;
        config.save_to(&config_file).unwrap();

        assert!(!config_file.with_extension("toml.tmp").exists());
        let loaded = Config::load_from(&config_file).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = Config::load_from(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::new());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        fs::write(&config_file, "[backend]\nurl = \"http://cs:9000\"\n").unwrap();

        let loaded = Config::load_from(&config_file).unwrap();
        assert_eq!(loaded.backend.url, "http://cs:9000");
        assert_eq!(loaded.backend.timeout_secs, 30);
        assert_eq!(loaded.logging.level, "info");
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        fs::write(&config_file, "[backend]\ntimeout_secs = 0\n").unwrap();
        assert!(Config::load_from(&config_file).is_err());

        fs::write(&config_file, "not toml [").unwrap();
        assert!(Config::load_from(&config_file).is_err());
    }

    #[test]
    fn test_override_backend() {
        let mut config = Config::new();
        config.override_backend(None).unwrap();
        config.override_backend(Some(String::new())).unwrap();
        assert_eq!(config.backend.url, DEFAULT_BACKEND_URL);

        config
            .override_backend(Some("http://other:1234".to_string()))
            .unwrap();
        assert_eq!(config.backend.url, "http://other:1234");

        assert!(config.override_backend(Some("ftp://x".to_string())).is_err());
    }

    #[test]
    fn test_explicit_log_file() {
        let mut config = Config::new();
        config.logging.file = Some(PathBuf::from("/tmp/cs.log"));
        assert_eq!(config.log_file().unwrap(), PathBuf::from("/tmp/cs.log"));
    }
}
