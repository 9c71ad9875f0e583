//! Provider configuration.
//!
//! Resolved once at process startup and passed into [`TermAcquirer`](crate::TermAcquirer), so
//! request handling never reads environment variables.

use crate::{ProviderError, ProviderResult};
use std::time::Duration;

/// Default base URL of the remote term provider.
pub const DEFAULT_PROVIDER_URL: &str = "https://api.medical-terms-simplified.org/v1";

/// Default timeout applied to each provider request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct ProviderConfig {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl ProviderConfig {
    /// Create a new `ProviderConfig`.
    ///
    /// A blank `api_key` is treated as absent, which leaves the remote provider unconfigured.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidConfig` if `base_url` is not an absolute http(s) URL or
    /// `timeout` is zero.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> ProviderResult<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        let parsed = reqwest::Url::parse(&base_url).map_err(|e| {
            ProviderError::InvalidConfig(format!("provider URL {base_url:?} is invalid: {e}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ProviderError::InvalidConfig(
                "provider URL must use http or https".into(),
            ));
        }

        if timeout.is_zero() {
            return Err(ProviderError::InvalidConfig(
                "provider timeout must be greater than zero".into(),
            ));
        }

        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        Ok(Self {
            base_url,
            api_key,
            timeout,
        })
    }

    /// Build a config from optional raw environment values, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidConfig` if a value is present but invalid.
    pub fn from_env_values(
        base_url: Option<String>,
        api_key: Option<String>,
        timeout_secs: Option<String>,
    ) -> ProviderResult<Self> {
        let base_url = base_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PROVIDER_URL.into());

        let timeout_secs = match timeout_secs.map(|v| v.trim().to_string()) {
            Some(value) if !value.is_empty() => value.parse::<u64>().map_err(|_| {
                ProviderError::InvalidConfig(format!(
                    "provider timeout {value:?} is not a whole number of seconds"
                ))
            })?,
            _ => DEFAULT_TIMEOUT_SECS,
        };

        Self::new(base_url, api_key, Duration::from_secs(timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether a remote provider can be called at all.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
