//! Stock provider abstractions and implementations.
//!
//! This module contains:
//! - The `StockProvider` trait that every upstream adapter implements
//! - Concrete adapters for Finnhub and Alpha Vantage
//!
//! Adapters translate vendor responses into the canonical [`Quote`] and
//! [`QuoteDetail`] records. Choosing which adapter serves a request is the
//! registry's job, not theirs.
//!
//! [`Quote`]: crate::models::Quote
//! [`QuoteDetail`]: crate::models::QuoteDetail

mod traits;

pub mod alpha_vantage;
pub mod finnhub;

use std::sync::Arc;

use crate::models::{ProviderConfig, ProviderKind};

pub use alpha_vantage::AlphaVantageProvider;
pub use finnhub::FinnhubProvider;
pub use traits::{StockProvider, MAX_SEARCH_RESULTS, PROBE_SYMBOL};

/// Build the adapter for a vendor.
pub fn build_provider(kind: ProviderKind, config: &ProviderConfig) -> Arc<dyn StockProvider> {
    match kind {
        ProviderKind::Finnhub => Arc::new(FinnhubProvider::new(config)),
        ProviderKind::AlphaVantage => Arc::new(AlphaVantageProvider::new(config)),
    }
}

/// Render a request URL for logs with the credential parameter masked.
///
/// Works on decoded query pairs, so keys that need percent-encoding are
/// masked too.
pub(crate) fn redacted_url(url: &reqwest::Url, key_param: &str) -> String {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if name == key_param {
                "***".to_string()
            } else {
                value.into_owned()
            };
            (name.into_owned(), value)
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
