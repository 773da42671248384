//! Client configuration.

use std::time::Duration;

use kmem_core::defaults;

use crate::error::{Error, Result};

/// Configuration shared by the async and blocking clients.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Service root, e.g. `http://localhost:9001`.
    pub base_url: String,
    /// Access token. `None` sends no auth header.
    pub token: Option<String>,
    /// Placed before the token with a space. Empty sends the bare token.
    pub token_prefix: String,
    /// Header carrying the token.
    pub auth_header_name: String,
    /// Index used by the convenience methods when the caller names none.
    pub default_index: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Verify TLS certificates.
    pub verify_ssl: bool,
    /// Fail with `UnexpectedStatus` on statuses an operation does not list.
    pub raise_on_unexpected_status: bool,
    /// Extra headers sent on every call.
    pub headers: Vec<(String, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::BASE_URL.to_string(),
            token: None,
            token_prefix: defaults::TOKEN_PREFIX.to_string(),
            auth_header_name: defaults::AUTH_HEADER.to_string(),
            default_index: defaults::INDEX.to_string(),
            timeout_seconds: defaults::TIMEOUT_SECS,
            verify_ssl: defaults::VERIFY_SSL,
            raise_on_unexpected_status: defaults::RAISE_ON_UNEXPECTED_STATUS,
            headers: Vec::new(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Read `KM_*` environment variables. Unset or unparsable values keep
    /// their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = Self::default();
        Self {
            base_url: get(defaults::ENV_BASE_URL).unwrap_or(base.base_url),
            token: get(defaults::ENV_TOKEN).filter(|t| !t.is_empty()),
            token_prefix: get(defaults::ENV_TOKEN_PREFIX).unwrap_or(base.token_prefix),
            default_index: get(defaults::ENV_DEFAULT_INDEX).unwrap_or(base.default_index),
            timeout_seconds: get(defaults::ENV_TIMEOUT)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(base.timeout_seconds),
            verify_ssl: get(defaults::ENV_VERIFY_SSL)
                .and_then(|s| parse_flag(&s))
                .unwrap_or(base.verify_ssl),
            raise_on_unexpected_status: get(defaults::ENV_RAISE_ON_UNEXPECTED_STATUS)
                .and_then(|s| parse_flag(&s))
                .unwrap_or(base.raise_on_unexpected_status),
            ..base
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_token_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.token_prefix = prefix.into();
        self
    }

    pub fn with_auth_header_name(mut self, name: impl Into<String>) -> Self {
        self.auth_header_name = name.into();
        self
    }

    pub fn with_default_index(mut self, index: impl Into<String>) -> Self {
        self.default_index = index.into();
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    pub fn with_raise_on_unexpected_status(mut self, raise: bool) -> Self {
        self.raise_on_unexpected_status = raise;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Value of the auth header, if a token is configured.
    pub fn auth_value(&self) -> Option<String> {
        self.token.as_ref().map(|token| {
            if self.token_prefix.is_empty() {
                token.clone()
            } else {
                format!("{} {}", self.token_prefix, token)
            }
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::Config("base URL is empty".to_string()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "base URL must start with http:// or https://: {}",
                self.base_url
            )));
        }
        if self.auth_header_name.trim().is_empty() {
            return Err(Error::Config("auth header name is empty".to_string()));
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
