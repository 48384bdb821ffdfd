//! Upstream API configuration.
//!
//! The API key is never compiled in. It comes from the environment (a `.env`
//! file is honoured by the binary) or from a JSON file:
//!
//! ```json
//! {
//!   "api_key": "...",
//!   "base_url": "https://api.data.gov.in/resource/9ef84268-d588-465a-a308-a864a43d0070",
//!   "timeout_secs": 30,
//!   "connect_timeout_secs": 10
//! }
//! ```

use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// data.gov.in "current daily price of various commodities" resource.
pub const DEFAULT_BASE_URL: &str =
    "https://api.data.gov.in/resource/9ef84268-d588-465a-a308-a864a43d0070";

pub const API_KEY_VAR: &str = "MANDI_API_KEY";
pub const BASE_URL_VAR: &str = "MANDI_BASE_URL";
pub const TIMEOUT_VAR: &str = "MANDI_TIMEOUT_SECS";
pub const CONNECT_TIMEOUT_VAR: &str = "MANDI_CONNECT_TIMEOUT_SECS";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Reads the config from `MANDI_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{path}'"))?;
        let config: ApiConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file '{path}'"))?;
        config.validate()?;
        Ok(config)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(API_KEY_VAR)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .with_context(|| format!("{API_KEY_VAR} must be set"))?;

        let mut config = Self::new(api_key);
        if let Some(url) = lookup(BASE_URL_VAR).filter(|u| !u.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }
        if let Some(secs) = lookup(TIMEOUT_VAR) {
            config.timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("{TIMEOUT_VAR} must be a whole number of seconds"))?;
        }
        if let Some(secs) = lookup(CONNECT_TIMEOUT_VAR) {
            config.connect_timeout_secs = secs.trim().parse().with_context(|| {
                format!("{CONNECT_TIMEOUT_VAR} must be a whole number of seconds")
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            bail!("api_key must not be empty");
        }
        if self.timeout_secs == 0 || self.connect_timeout_secs == 0 {
            bail!("timeouts must be greater than zero");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
