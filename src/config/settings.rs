//! Application settings and paths.
//!
//! Settings live in `settings.json` under the XDG config directory and
//! supply the defaults for every `scan` flag left unspecified.

use crate::error::{ConfigError, ConfigResult};
use crate::scanner::ScanConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/zenithscan)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the platform configuration directory. Nothing is created.
    pub fn new() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "zenithscan", "zenithscan")
            .ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide scan defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Host scanned when `--host` is omitted.
    pub default_host: String,
    /// First port of the default range.
    pub default_start_port: u32,
    /// Last port of the default range.
    pub default_end_port: u32,
    /// High-value ports always merged into the range.
    pub default_extra_ports: Vec<u32>,
    /// Default worker pool size.
    pub default_concurrency: usize,
    /// Default connect timeout in milliseconds.
    pub default_timeout_ms: u64,
    /// Default output format (plain, json, csv).
    pub default_output_format: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_host: "127.0.0.1".to_string(),
            default_start_port: 1,
            default_end_port: 1024,
            default_extra_ports: ScanConfig::DEFAULT_EXTRA_PORTS.to_vec(),
            default_concurrency: 100,
            default_timeout_ms: 500,
            default_output_format: "plain".to_string(),
        }
    }
}

impl AppSettings {
    /// Load settings from the default location, or defaults if absent.
    pub fn load() -> ConfigResult<Self> {
        let file = Paths::new()?.settings_file();

        if !file.exists() {
            debug!(path = %file.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from `path` if given, otherwise from the default location.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let settings =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Write settings to `path`, creating parent directories.
    ///
    /// Refuses to replace an existing file unless `overwrite` is set.
    pub fn save_to(&self, path: &Path, overwrite: bool) -> ConfigResult<()> {
        if path.exists() && !overwrite {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFailed {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Build a scan configuration for `host` from these defaults.
    pub fn scan_config(&self, host: impl Into<String>) -> ScanConfig {
        ScanConfig::new(host)
            .with_range(self.default_start_port, self.default_end_port)
            .with_extra_ports(self.default_extra_ports.clone())
            .with_concurrency(self.default_concurrency)
            .with_timeout(Duration::from_millis(self.default_timeout_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.default_concurrency, 100);
        assert_eq!(settings.default_timeout_ms, 500);
        assert_eq!(settings.default_extra_ports.len(), 7);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "default_end_port": 2048, "default_extra_ports": [] }"#).unwrap();

        let settings = AppSettings::load_from(&path).unwrap();
        assert_eq!(settings.default_end_port, 2048);
        assert!(settings.default_extra_ports.is_empty());
        assert_eq!(settings.default_host, "127.0.0.1");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = AppSettings {
            default_concurrency: 32,
            ..AppSettings::default()
        };

        settings.save_to(&path, false).unwrap();
        assert_eq!(AppSettings::load_from(&path).unwrap(), settings);

        let again = settings.save_to(&path, false);
        assert!(matches!(again, Err(ConfigError::AlreadyExists(_))));
        settings.save_to(&path, true).unwrap();
    }

    #[test]
    fn test_malformed_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            AppSettings::load_from(&path),
            Err(ConfigError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_scan_config_from_settings() {
        let settings = AppSettings::default();
        let config = settings.scan_config("10.0.0.1");
        assert_eq!(config.host, "10.0.0.1");
        assert_eq!((config.start_port, config.end_port), (1, 1024));
        assert_eq!(config.connect_timeout, Duration::from_millis(500));
    }
}
