use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Upstream vendors this crate ships an adapter for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Finnhub,
    AlphaVantage,
}

impl ProviderKind {
    /// Stable identifier. Prefixes the provider's environment variables.
    pub fn id(&self) -> &'static str {
        match self {
            ProviderKind::Finnhub => "finnhub",
            ProviderKind::AlphaVantage => "alpha_vantage",
        }
    }

    /// Human-readable provider name.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Finnhub => "Finnhub",
            ProviderKind::AlphaVantage => "Alpha Vantage",
        }
    }

    /// Public API root for the vendor.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Finnhub => "https://finnhub.io/api/v1",
            ProviderKind::AlphaVantage => "https://www.alphavantage.co/query",
        }
    }

    /// Free-tier request allowance, per minute.
    pub fn default_rate_limit_per_minute(&self) -> u32 {
        match self {
            ProviderKind::Finnhub => 60,
            ProviderKind::AlphaVantage => 5,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Per-provider settings.
///
/// `rate_limit_per_minute` and `timeout` are reported for diagnostics only.
/// Nothing throttles requests and the HTTP client keeps its default timeout.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
    pub rate_limit_per_minute: u32,
    pub timeout: Duration,
}

impl ProviderConfig {
    /// Config with the vendor's default base URL and limits.
    pub fn new(kind: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: kind.default_base_url().to_string(),
            rate_limit_per_minute: kind.default_rate_limit_per_minute(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Override the base URL (tests point this at a local mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Whether an adapter should be built from this config.
    pub fn has_credentials(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

// Keep the key out of logs.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Probe result for one configured provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderStatus {
    pub name: String,
    pub available: bool,
    /// True for the provider under the registry cursor.
    pub current: bool,
}
