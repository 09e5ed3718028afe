use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{DebtError, Result};

pub const DEFAULT_API_BASE_URL: &str = "https://study.logiper.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_URL: &str = "DEBT_TRACKER_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "DEBT_TRACKER_TIMEOUT_SECS";
pub const ENV_TOKEN_FILE: &str = "DEBT_TRACKER_TOKEN_FILE";

/// client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// base url of the remote service, without a trailing slash
    pub api_base_url: String,
    pub timeout_secs: u64,
    /// where the cli keeps the session token between runs
    pub token_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token_file: None,
        }
    }
}

impl ClientConfig {
    /// defaults overridden by `DEBT_TRACKER_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// same as [`ClientConfig::from_env`] with an explicit variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            config.api_base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS).filter(|v| !v.trim().is_empty()) {
            config.timeout_secs = raw.trim().parse().map_err(|_| DebtError::InvalidConfiguration {
                message: format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got {raw:?}"),
            })?;
        }
        if let Some(path) = lookup(ENV_TOKEN_FILE).filter(|v| !v.trim().is_empty()) {
            config.token_file = Some(PathBuf::from(path));
        }

        config.normalized()
    }

    /// load from a json file; absent keys keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| DebtError::InvalidConfiguration {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: ClientConfig = serde_json::from_str(text).map_err(|e| DebtError::InvalidConfiguration {
            message: format!("invalid config json: {e}"),
        })?;
        config.normalized()
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Result<Self> {
        self.api_base_url = url.into();
        self.normalized()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// configured token file, or `~/.debt-tracker/token.json`
    pub fn token_path(&self) -> PathBuf {
        if let Some(path) = &self.token_file {
            return path.clone();
        }
        match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(".debt-tracker").join("token.json"),
            None => PathBuf::from(".debt-tracker-token.json"),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.api_base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(DebtError::InvalidConfiguration {
                message: format!("api base url must start with http:// or https://, got {url:?}"),
            });
        }
        if self.timeout_secs == 0 {
            return Err(DebtError::InvalidConfiguration {
                message: "timeout must be at least one second".to_string(),
            });
        }
        Ok(())
    }

    fn normalized(mut self) -> Result<Self> {
        let trimmed = self.api_base_url.trim().trim_end_matches('/').to_string();
        self.api_base_url = trimmed;
        self.validate()?;
        Ok(self)
    }
}
