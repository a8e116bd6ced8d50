//! User-level configuration for reelcheck
//!
//! Supports loading config from:
//! - Environment variables
//! - ~/.config/reelcheck/config.toml
//!
//! The `--endpoint` CLI flag outranks both; that resolution happens at
//! the command layer.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UserConfig {
    #[serde(default)]
    pub service: ServiceConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Base URL of the compliance-auditing service
    pub endpoint: Option<String>,

    /// Seconds to wait for an audit before giving up
    pub timeout_secs: Option<u64>,
}

impl UserConfig {
    /// Load config from all sources, with priority:
    /// 1. Environment variables (highest)
    /// 2. User config (~/.config/reelcheck/config.toml)
    pub fn load() -> Result<Self> {
        let mut config = UserConfig::default();

        if let Some(user_config) = Self::from_file() {
            config.merge(user_config);
        }

        // Environment variables override the file
        if let Ok(endpoint) = std::env::var("REELCHECK_ENDPOINT") {
            config.service.endpoint = Some(endpoint);
        }

        Ok(config)
    }

    /// Read the config file alone, without environment overrides.
    /// `config set` edits this view so env values never leak to disk.
    pub fn from_file() -> Option<Self> {
        Self::user_config_path()
            .filter(|p| p.exists())
            .and_then(|p| std::fs::read_to_string(&p).ok())
            .and_then(|content| toml::from_str::<UserConfig>(&content).ok())
    }

    /// Get the user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("reelcheck").join("config.toml"))
    }

    /// Merge another config into this one (other takes priority)
    fn merge(&mut self, other: UserConfig) {
        if other.service.endpoint.is_some() {
            self.service.endpoint = other.service.endpoint;
        }
        if other.service.timeout_secs.is_some() {
            self.service.timeout_secs = other.service.timeout_secs;
        }
    }

    /// Effective service endpoint
    pub fn endpoint(&self) -> &str {
        self.service.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    /// Effective request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.service.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Write this config to the user config file, creating the
    /// directory if needed.
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::user_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, toml::to_string_pretty(self)?)?;
        Ok(config_path)
    }

    /// Initialize user config directory and create example config
    pub fn init_user_config() -> Result<PathBuf> {
        let config_path = Self::user_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if !config_path.exists() {
            let example = r#"# Reelcheck User Configuration

[service]
# Base URL of the compliance-auditing service
# endpoint = "http://localhost:8000"

# Seconds to wait for an audit before giving up
# timeout_secs = 120
"#;
            std::fs::write(&config_path, example)?;
        }

        Ok(config_path)
    }
}
