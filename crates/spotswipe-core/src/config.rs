use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Result, anyhow};

use crate::backend::DEFAULT_TIMEOUT;
use crate::environment::{resolve_backend_base, Environment};
use crate::state::Theme;

/// Environment variable overriding the backend base URL.
pub const BACKEND_URL_VAR: &str = "SPOTSWIPE_BACKEND_URL";

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    pub environment: Option<String>,
    pub backend_url: Option<String>,
    pub theme: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        Ok(())
    }

    pub fn environment(&self) -> Environment {
        Environment::detect(self.environment.as_deref())
    }

    /// Backend base URL: env override, then config, then the environment default.
    pub fn backend_base(&self) -> String {
        let env_url = std::env::var(BACKEND_URL_VAR).ok();
        resolve_base(env_url.as_deref(), self.backend_url.as_deref(), self.environment())
    }

    pub fn theme(&self) -> Theme {
        self.theme
            .as_deref()
            .and_then(Theme::from_str)
            .unwrap_or_default()
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Directory holding config, credentials and the log file.
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("spotswipe"))
    }

    fn get_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }
}

fn resolve_base(
    env_url: Option<&str>,
    configured: Option<&str>,
    environment: Environment,
) -> String {
    env_url
        .or(configured)
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| resolve_backend_base(environment))
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert!(config.backend_url.is_none());
        assert_eq!(config.request_timeout(), DEFAULT_TIMEOUT);
        assert_eq!(config.theme(), Theme::Dark);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("spotswipe").join("config.json");

        let config = Config {
            theme: Some("light".to_string()),
            request_timeout_secs: Some(3),
            ..Config::new()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.theme(), Theme::Light);
        assert_eq!(loaded.request_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_zero_timeout_falls_back() {
        let config = Config {
            request_timeout_secs: Some(0),
            ..Config::new()
        };
        assert_eq!(config.request_timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_base_precedence() {
        assert_eq!(
            resolve_base(Some("http://env:1/"), Some("http://cfg:2"), Environment::Production),
            "http://env:1"
        );
        assert_eq!(
            resolve_base(None, Some("http://cfg:2"), Environment::Production),
            "http://cfg:2"
        );
        assert_eq!(
            resolve_base(None, Some("  "), Environment::Development),
            resolve_backend_base(Environment::Development)
        );
        assert!(resolve_base(None, None, Environment::Production).contains("render.com"));
    }
}
