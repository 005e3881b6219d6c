//! Provider configuration
//!
//! Built from the provider block's attributes or from the environment.

use std::time::Duration;

use stratus_core::resource::{Attributes, Value};
use thiserror::Error;

/// Errors in provider configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("api_token is required (set it in the provider block or CLOUDFLARE_API_TOKEN)")]
    MissingToken,

    #[error("Invalid provider configuration: {0}")]
    Invalid(String),
}

/// Settings needed to reach the Cloudflare API
#[derive(Clone)]
pub struct ProviderConfig {
    pub api_token: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ProviderConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.cloudflare.com/client/v4";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub const ENV_API_TOKEN: &'static str = "CLOUDFLARE_API_TOKEN";
    pub const ENV_BASE_URL: &'static str = "CLOUDFLARE_API_BASE_URL";

    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create a config from provider block attributes
    ///
    /// Recognized keys: `api_token`, `base_url`, `timeout_seconds`.
    /// A missing `api_token` falls back to the environment.
    pub fn from_attributes(attributes: &Attributes) -> Result<Self, ConfigError> {
        let get_string = |key: &str| match attributes.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        };

        let api_token = get_string("api_token")
            .or_else(|| std::env::var(Self::ENV_API_TOKEN).ok())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let mut config = Self::new(api_token);
        if let Some(base_url) = get_string("base_url") {
            config = config.with_base_url(base_url);
        }
        match attributes.get("timeout_seconds") {
            Some(Value::Int(secs)) if *secs > 0 => {
                config = config.with_timeout(Duration::from_secs(*secs as u64));
            }
            Some(other) => {
                return Err(ConfigError::Invalid(format!(
                    "timeout_seconds must be a positive integer, got {:?}",
                    other
                )));
            }
            None => {}
        }
        Ok(config)
    }

    /// Create a config from `CLOUDFLARE_API_TOKEN` and `CLOUDFLARE_API_BASE_URL`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_token = lookup(Self::ENV_API_TOKEN)
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let mut config = Self::new(api_token);
        if let Some(base_url) = lookup(Self::ENV_BASE_URL).filter(|u| !u.is_empty()) {
            config = config.with_base_url(base_url);
        }
        Ok(config)
    }
}
