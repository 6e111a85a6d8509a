//! Gateway configuration.
//!
//! The API key is resolved once, at construction, from an explicit override or
//! the `POLYGON_API_KEY` environment variable. The base URL defaults to the
//! public Polygon host and may be pointed elsewhere with `POLYGON_BASE_URL`.

use std::fmt::{Debug, Formatter};

use crate::ConfigurationError;

pub const API_KEY_ENV: &str = "POLYGON_API_KEY";
pub const BASE_URL_ENV: &str = "POLYGON_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "https://api.polygon.io";

/// Read-only configuration shared by every lookup of a tool instance.
#[derive(Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    api_key: String,
    base_url: String,
}

impl GatewayConfig {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigurationError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigurationError::MissingCredential { var: API_KEY_ENV });
        }
        Ok(Self {
            api_key,
            base_url: String::from(DEFAULT_BASE_URL),
        })
    }

    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::resolve(None, |name| std::env::var(name).ok())
    }

    /// Resolve with an optional explicit key taking precedence over the environment.
    pub fn resolve(
        api_key_override: Option<String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigurationError> {
        let api_key = load_credential(api_key_override, &env)?;
        let config = Self::new(api_key)?;
        match env(BASE_URL_ENV).filter(|value| !value.trim().is_empty()) {
            Some(base_url) => Ok(config.with_base_url(base_url)),
            None => Ok(config),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Debug for GatewayConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Pick the override when present, else the environment; blank values count as missing.
pub fn load_credential(
    api_key_override: Option<String>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigurationError> {
    api_key_override
        .filter(|value| !value.trim().is_empty())
        .or_else(|| env(API_KEY_ENV).filter(|value| !value.trim().is_empty()))
        .ok_or(ConfigurationError::MissingCredential { var: API_KEY_ENV })
}
