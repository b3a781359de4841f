//! Top-level application configuration.
//!
//! Configuration is stored in `.groupdesk/config.yaml` (or under
//! `$GROUPDESK_ROOT`) and includes:
//! - The backend base URL and request timeout
//! - Page size for listings
//! - An optional bearer token

use std::env;
use std::fmt;
use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{GroupdeskError, Result};
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::paths::groupdesk_root;

pub const BASE_URL_ENV: &str = "GROUPDESK_BASE_URL";
pub const TOKEN_ENV: &str = "GROUPDESK_TOKEN";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend base URL (default: http://localhost:8080)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Rows per page in listings (default: 5)
    #[serde(default = "default_page_size")]
    pub page_size: NonZeroUsize,

    /// Authentication
    #[serde(default, skip_serializing_if = "AuthConfig::is_empty")]
    pub auth: AuthConfig,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_page_size() -> NonZeroUsize {
    DEFAULT_PAGE_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            page_size: default_page_size(),
            auth: AuthConfig::default(),
        }
    }
}

/// Authentication configuration
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AuthConfig {
    fn is_empty(&self) -> bool {
        self.token.is_none()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        groupdesk_root().join("config.yaml")
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            GroupdeskError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Base URL from environment or config file
    pub fn effective_base_url(&self) -> String {
        if let Ok(url) = env::var(BASE_URL_ENV)
            && !url.is_empty()
        {
            return url;
        }
        self.base_url.clone()
    }

    /// Bearer token from environment or config file
    pub fn token(&self) -> Option<String> {
        if let Ok(token) = env::var(TOKEN_ENV)
            && !token.is_empty()
        {
            return Some(token);
        }
        self.auth.token.clone()
    }

    /// Get a value by key for `config get`
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "base_url" => Ok(self.base_url.clone()),
            "timeout" => Ok(self.timeout.to_string()),
            "page_size" => Ok(self.page_size.to_string()),
            "auth.token" => self
                .auth
                .token
                .clone()
                .ok_or_else(|| GroupdeskError::Config("auth.token is not set".to_string())),
            _ => Err(unknown_key(key)),
        }
    }

    /// Set a value by key for `config set`
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "base_url" => {
                let parsed = url::Url::parse(value).map_err(|e| {
                    GroupdeskError::Config(format!("invalid base_url '{value}': {e}"))
                })?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(GroupdeskError::Config(format!(
                        "invalid base_url '{value}': scheme must be http or https"
                    )));
                }
                self.base_url = value.trim_end_matches('/').to_string();
            }
            "timeout" => {
                self.timeout = value.parse().map_err(|_| {
                    GroupdeskError::Config(format!("invalid timeout '{value}', expected seconds"))
                })?;
            }
            "page_size" => {
                self.page_size = value.parse().map_err(|_| {
                    GroupdeskError::Config(format!(
                        "invalid page_size '{value}', expected a positive integer"
                    ))
                })?;
            }
            "auth.token" => {
                self.auth.token = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> GroupdeskError {
    GroupdeskError::Config(format!(
        "unknown config key '{key}', expected one of: base_url, timeout, page_size, auth.token"
    ))
}
