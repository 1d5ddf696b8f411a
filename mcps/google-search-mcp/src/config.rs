//! Configuration loading for google-search-mcp
//!
//! Process-level settings (endpoint, timeout, user agent) are loaded once:
//! 1. Environment variable GOOGLE_SEARCH_BASE_URL (endpoint override)
//! 2. Environment variable GOOGLE_SEARCH_CONFIG_PATH
//! 3. ~/.binks/google-search.toml
//! 4. Default values
//!
//! Credentials are NOT part of this config. They are read from the
//! environment on every tool call (see [`crate::credentials`]).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default Custom Search JSON API endpoint
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Custom Search API settings
    #[serde(default)]
    pub api: ApiConfig,
}

/// Custom Search API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Endpoint URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("google-search-mcp/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_path() {
            Some(path) if path.exists() => {
                tracing::info!("Loading config from: {}", path.display());
                Self::from_file(&path)?
            }
            Some(_) => {
                tracing::info!("Config file not found, using defaults");
                Self::default()
            }
            None => {
                tracing::info!("No config path specified, using defaults");
                Self::default()
            }
        };

        if let Ok(url) = std::env::var("GOOGLE_SEARCH_BASE_URL") {
            if !url.is_empty() {
                config.api.base_url = url;
            }
        }

        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config from {:?}", path))
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("GOOGLE_SEARCH_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".binks").join("google-search.toml"))
    }
}
