//! Configuration management for sqlview.
//!
//! Handles loading configuration from TOML files and environment variables:
//! where the engine API lives, how long requests may take, and how many
//! items each paginated view shows.

use crate::error::{ConsoleError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Default location of the engine API.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Main configuration structure for sqlview.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Engine API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Page sizes for the paginated views.
    #[serde(default)]
    pub pagination: PaginationConfig,
}

/// Engine API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL, e.g. `http://localhost:5000/api`.
    #[serde(default = "default_api_url")]
    pub url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Returns the request timeout. Zero is rejected since reqwest would
    /// then fail every request immediately.
    pub fn timeout(&self) -> Result<Duration> {
        if self.timeout_secs == 0 {
            return Err(ConsoleError::config("timeout_secs must be at least 1 second"));
        }
        Ok(Duration::from_secs(self.timeout_secs))
    }

    /// Validates the base URL and returns it without a trailing slash.
    pub fn base_url(&self) -> Result<String> {
        let url = Url::parse(&self.url)
            .map_err(|e| ConsoleError::config(format!("Invalid API URL '{}': {e}", self.url)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConsoleError::config(format!(
                "Invalid scheme '{}'. Expected 'http' or 'https'",
                url.scheme()
            )));
        }

        Ok(self.url.trim_end_matches('/').to_string())
    }

    /// Applies `SQLVIEW_API_URL` and `SQLVIEW_TIMEOUT_SECS` over file values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("SQLVIEW_API_URL") {
            self.url = url;
        }
        if let Ok(secs) = std::env::var("SQLVIEW_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                self.timeout_secs = secs;
            }
        }
    }
}

/// Page sizes for the three paginated views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationConfig {
    #[serde(default = "default_results_page_size")]
    pub results_page_size: usize,

    #[serde(default = "default_tables_page_size")]
    pub tables_page_size: usize,

    #[serde(default = "default_examples_page_size")]
    pub examples_page_size: usize,
}

fn default_results_page_size() -> usize {
    10
}

fn default_tables_page_size() -> usize {
    5
}

fn default_examples_page_size() -> usize {
    3
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            results_page_size: default_results_page_size(),
            tables_page_size: default_tables_page_size(),
            examples_page_size: default_examples_page_size(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sqlview")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConsoleError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            ConsoleError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
