//! Configuration loader/writer.
//!
//! Settings live in `~/.ghotidle/config.toml` (the directory can be moved
//! with the `GHOTIDLE_DIR` environment variable). A missing file is created
//! with defaults on first run, so there is always something on disk for the
//! player to edit.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// How long the event loop waits for a key before redrawing. Animations
    /// (toast fades, loading dots) tick at this cadence.
    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_poll_timeout_ms() -> u64 {
    50
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            poll_timeout_ms: default_poll_timeout_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            let config = Config::default();
            config.save()?;
            return Ok(config);
        }
        let contents = fs::read_to_string(&path)
            .context(format!("Failed to read config file: {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .context(format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, contents).context("Failed to write config file")?;
        Ok(())
    }

    /// Base ghotidle directory (~/.ghotidle), honoring `GHOTIDLE_DIR`.
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(custom_dir) = std::env::var("GHOTIDLE_DIR") {
            return Ok(PathBuf::from(custom_dir));
        }
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".ghotidle"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("ghotidle.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.base_url, "http://localhost:8000");
        assert_eq!(config.ui.poll_timeout_ms, 50);
    }

    #[test]
    fn partial_file_fills_missing_sections() {
        let config: Config = toml::from_str(
            r#"
            [server]
            base_url = "https://ghoti.example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.base_url, "https://ghoti.example.com");
        assert_eq!(config.ui.poll_timeout_ms, 50);
    }

    #[test]
    fn round_trips_through_toml() {
        let mut config = Config::default();
        config.server.base_url = "http://10.0.0.5:9000".to_string();
        config.ui.poll_timeout_ms = 16;

        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.server.base_url, "http://10.0.0.5:9000");
        assert_eq!(back.ui.poll_timeout_ms, 16);
    }
}
