use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use stockwatch_market_data::{ProviderConfig, ProviderKind};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub finnhub: ProviderConfig,
    pub alpha_vantage: ProviderConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = env_or("SW_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .context("Invalid SW_LISTEN_ADDR")?;
        let cors_allow = env_or("SW_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = env_or("SW_REQUEST_TIMEOUT_MS", "30000")
            .parse()
            .context("Invalid SW_REQUEST_TIMEOUT_MS")?;

        Ok(Self {
            listen_addr,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            finnhub: provider_from_env(ProviderKind::Finnhub),
            alpha_vantage: provider_from_env(ProviderKind::AlphaVantage),
        })
    }

    /// Provider configs in selection order. Finnhub is tried first.
    pub fn providers(&self) -> Vec<(ProviderKind, ProviderConfig)> {
        vec![
            (ProviderKind::Finnhub, self.finnhub.clone()),
            (ProviderKind::AlphaVantage, self.alpha_vantage.clone()),
        ]
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// `FINNHUB_API_KEY`, `ALPHA_VANTAGE_BASE_URL` and so on.
fn provider_var(kind: ProviderKind, suffix: &str) -> String {
    format!("{}_{}", kind.id().to_uppercase(), suffix)
}

fn provider_from_env(kind: ProviderKind) -> ProviderConfig {
    let api_key = std::env::var(provider_var(kind, "API_KEY")).unwrap_or_default();
    let config = ProviderConfig::new(kind, api_key);
    match std::env::var(provider_var(kind, "BASE_URL")) {
        Ok(url) if !url.trim().is_empty() => config.with_base_url(url.trim()),
        _ => config,
    }
}
