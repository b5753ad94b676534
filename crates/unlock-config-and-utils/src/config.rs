//! Configuration management for the unlock tool.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Default account service URL (can be overridden at compile time via MIUNLOCK_ACCOUNT_URL).
pub const DEFAULT_ACCOUNT_URL: &str = match option_env!("MIUNLOCK_ACCOUNT_URL") {
    Some(url) => url,
    None => "https://account.xiaomi.com",
};

/// Default unlock-authorization service URL (can be overridden at compile time via
/// MIUNLOCK_UNLOCK_API_URL).
pub const DEFAULT_UNLOCK_API_URL: &str = match option_env!("MIUNLOCK_UNLOCK_API_URL") {
    Some(url) => url,
    None => "https://unlock.update.miui.com",
};

/// Default log level. Interactive prompts share the terminal with stderr logs.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Main tool configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Account authentication service base URL.
    #[serde(default = "default_account_url")]
    pub account_url: String,
    /// Unlock-authorization service base URL.
    #[serde(default = "default_unlock_api_url")]
    pub unlock_api_url: String,
    /// Explicit device-control executable path. Resolved automatically when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fastboot_path: Option<String>,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_account_url() -> String {
    DEFAULT_ACCOUNT_URL.to_string()
}

fn default_unlock_api_url() -> String {
    DEFAULT_UNLOCK_API_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            account_url: default_account_url(),
            unlock_api_url: default_unlock_api_url(),
            fastboot_path: None,
        }
    }
}

impl Config {
    /// Load configuration from the config file, falling back to defaults.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the config file.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    /// Only log_level can be overridden at runtime.
    fn load_from_env(&mut self) {
        if let Ok(log_level) = std::env::var("MIUNLOCK_LOG_LEVEL") {
            if !log_level.trim().is_empty() {
                self.log_level = log_level.trim().to_string();
            }
        }
    }

    /// Account service URL, parsed.
    pub fn account_url(&self) -> CoreResult<Url> {
        parse_service_url(&self.account_url)
    }

    /// Unlock-authorization service URL, parsed.
    pub fn unlock_api_url(&self) -> CoreResult<Url> {
        parse_service_url(&self.unlock_api_url)
    }
}

fn parse_service_url(raw: &str) -> CoreResult<Url> {
    let url = Url::parse(raw).map_err(CoreError::from)?;
    if url.cannot_be_a_base() {
        return Err(CoreError::Config(format!("{raw} cannot be used as a base URL")));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.account_url, DEFAULT_ACCOUNT_URL);
        assert_eq!(config.unlock_api_url, DEFAULT_UNLOCK_API_URL);
        assert!(config.fastboot_path.is_none());
    }

    #[test]
    fn test_config_load_from_file_fills_missing_fields() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");

        std::fs::write(
            &config_path,
            r#"{ "log_level": "debug", "fastboot_path": "/opt/pt/fastboot" }"#,
        )
        .unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.fastboot_path.as_deref(), Some("/opt/pt/fastboot"));
        assert_eq!(config.account_url, DEFAULT_ACCOUNT_URL);
    }

    #[test]
    fn test_config_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let config = Config {
            unlock_api_url: "http://127.0.0.1:9000".to_string(),
            ..Config::default()
        };
        config.save(&paths).unwrap();

        let loaded = Config::load_from_file(&paths.config_file()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_nonexistent_uses_defaults() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let config = Config::load(&paths).unwrap();
        assert_eq!(config.account_url, DEFAULT_ACCOUNT_URL);
    }

    #[test]
    fn test_config_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());
        std::fs::write(paths.config_file(), "{ not json").unwrap();

        let err = Config::load(&paths).unwrap_err();
        assert_eq!(err.code(), "config_json");
    }

    #[test]
    fn test_config_urls_parse() {
        let config = Config::default();
        assert_eq!(config.account_url().unwrap().scheme(), "https");
        assert_eq!(config.unlock_api_url().unwrap().scheme(), "https");
    }

    #[test]
    fn test_config_invalid_url() {
        let config = Config {
            account_url: "not a valid url".to_string(),
            ..Config::default()
        };
        assert!(config.account_url().is_err());

        let config = Config {
            unlock_api_url: "mailto:someone@example.com".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.unlock_api_url(), Err(CoreError::Config(_))));
    }
}
