//! Provider registry and selector.
//!
//! The registry owns the ordered adapter list, fixed at construction, and a
//! cursor naming the preferred adapter. The cursor is shared by every caller:
//! concurrent requests that each see the current adapter fail may both scan
//! and both store the same result, which is harmless because the scan order
//! is deterministic.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use log::{debug, info, warn};

use crate::errors::MarketDataError;
use crate::models::{ProviderConfig, ProviderKind, ProviderStatus};
use crate::provider::{build_provider, StockProvider};

/// Chooses which adapter serves the next request.
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn StockProvider>>,
    current: AtomicUsize,
}

impl ProviderRegistry {
    /// Create a registry over an ordered, non-empty adapter list.
    pub fn new(providers: Vec<Arc<dyn StockProvider>>) -> Result<Self, MarketDataError> {
        if providers.is_empty() {
            return Err(MarketDataError::Configuration(
                "No stock data providers configured".to_string(),
            ));
        }

        info!(
            "Stock provider registry initialized with {} provider(s): {}",
            providers.len(),
            providers
                .iter()
                .map(|p| p.name())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self {
            providers,
            current: AtomicUsize::new(0),
        })
    }

    /// Build adapters in the given order, skipping entries without an API key.
    pub fn from_config(
        configs: &[(ProviderKind, ProviderConfig)],
    ) -> Result<Self, MarketDataError> {
        let providers = configs
            .iter()
            .filter(|(kind, config)| {
                if !config.has_credentials() {
                    info!("{} ({}) has no API key, skipping", kind, kind.id());
                }
                config.has_credentials()
            })
            .map(|(kind, config)| build_provider(*kind, config))
            .collect();

        Self::new(providers)
    }

    /// Number of configured adapters.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Always false once constructed.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Index of the preferred adapter.
    pub fn current_index(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }

    /// The configured adapters, in selection order.
    pub fn providers(&self) -> &[Arc<dyn StockProvider>] {
        &self.providers
    }

    /// Return an adapter that passes its probe.
    ///
    /// The adapter under the cursor is probed first and returned as-is when
    /// it answers. Otherwise every adapter, the current one included, is
    /// probed in index order from 0 and the cursor is pinned to the first that answers. There is
    /// no cool-down: a failed adapter is probed again on the next call.
    pub async fn current_provider(&self) -> Result<Arc<dyn StockProvider>, MarketDataError> {
        let index = self.current_index();
        let provider = &self.providers[index];

        if provider.is_available().await {
            return Ok(Arc::clone(provider));
        }

        warn!("{} is unavailable, scanning for a fallback", provider.name());

        // The current adapter is probed again in order, so a flapping one can
        // still be picked up by this call
        for (candidate_index, candidate) in self.providers.iter().enumerate() {
            if candidate.is_available().await {
                self.current.store(candidate_index, Ordering::SeqCst);
                info!("Failed over to {}", candidate.name());
                return Ok(Arc::clone(candidate));
            }

            debug!("{} is unavailable", candidate.name());
        }

        warn!("No stock data provider is available");
        Err(MarketDataError::ServiceUnavailable)
    }

    /// Like [`current_provider`](Self::current_provider), but falls back to
    /// the first adapter when none answers, so the caller sees that
    /// adapter's own error instead of a generic outage.
    pub async fn provider_with_fallback(&self) -> Arc<dyn StockProvider> {
        match self.current_provider().await {
            Ok(provider) => provider,
            Err(_) => {
                warn!(
                    "All providers failed their probe, using {} anyway",
                    self.providers[0].name()
                );
                Arc::clone(&self.providers[0])
            }
        }
    }

    /// Advance the cursor by one, wrapping, without probing.
    ///
    /// Returns the name of the newly current adapter.
    pub fn switch_to_next_provider(&self) -> &str {
        let count = self.providers.len();
        let previous = self
            .current
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |index| {
                Some((index + 1) % count)
            })
            .unwrap_or_else(|index| index);
        let next = (previous + 1) % count;

        let name = self.providers[next].name();
        info!("Switched stock data provider to {}", name);
        name
    }

    /// Probe every adapter concurrently. Leaves the cursor alone.
    pub async fn provider_status(&self) -> Vec<ProviderStatus> {
        let current = self.current_index();
        let probes = join_all(self.providers.iter().map(|p| p.is_available())).await;

        self.providers
            .iter()
            .zip(probes)
            .enumerate()
            .map(|(index, (provider, available))| ProviderStatus {
                name: provider.name().to_string(),
                available,
                current: index == current,
            })
            .collect()
    }
}
