//! Quote service.
//!
//! The one entry point the rest of the system calls. It asks the registry for
//! an adapter and forwards the request. When the registry reports that no
//! adapter is reachable, the service answers from a small built-in catalog
//! instead of failing. Every other error reaches the caller unchanged.

mod mock_catalog;

use std::sync::Arc;

use async_trait::async_trait;
use log::warn;

use crate::errors::MarketDataError;
use crate::models::{ProviderStatus, Quote, QuoteDetail};
use crate::provider::StockProvider;
use crate::registry::ProviderRegistry;

#[async_trait]
pub trait QuoteServiceTrait: Send + Sync {
    async fn search_stocks(&self, query: &str) -> Result<Vec<Quote>, MarketDataError>;

    async fn get_stock_detail(&self, symbol: &str) -> Result<QuoteDetail, MarketDataError>;

    async fn get_stock_quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;

    async fn get_provider_status(&self) -> Vec<ProviderStatus>;

    /// Rotate to the next adapter and return its name.
    fn switch_provider(&self) -> String;
}

#[derive(Clone)]
pub struct QuoteService {
    registry: Arc<ProviderRegistry>,
}

impl QuoteService {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// `None` means every adapter failed its probe.
    async fn select(&self) -> Result<Option<Arc<dyn StockProvider>>, MarketDataError> {
        match self.registry.current_provider().await {
            Ok(provider) => Ok(Some(provider)),
            Err(e) if e.is_service_unavailable() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl QuoteServiceTrait for QuoteService {
    async fn search_stocks(&self, query: &str) -> Result<Vec<Quote>, MarketDataError> {
        match self.select().await? {
            Some(provider) => provider.search_stocks(query).await,
            None => {
                warn!("No provider available, serving mock search results for '{}'", query);
                Ok(mock_catalog::search(query))
            }
        }
    }

    async fn get_stock_detail(&self, symbol: &str) -> Result<QuoteDetail, MarketDataError> {
        match self.select().await? {
            Some(provider) => provider.get_stock_detail(symbol).await,
            None => {
                warn!("No provider available, serving mock detail for {}", symbol);
                mock_catalog::detail(symbol)
                    .ok_or_else(|| MarketDataError::NotFound(symbol.to_string()))
            }
        }
    }

    async fn get_stock_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        match self.select().await? {
            Some(provider) => provider.get_stock_quote(symbol).await,
            None => {
                warn!("No provider available, serving mock quote for {}", symbol);
                mock_catalog::quote(symbol)
                    .ok_or_else(|| MarketDataError::NotFound(symbol.to_string()))
            }
        }
    }

    async fn get_provider_status(&self) -> Vec<ProviderStatus> {
        self.registry.provider_status().await
    }

    fn switch_provider(&self) -> String {
        self.registry.switch_to_next_provider().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{as_dyn, FakeProvider};

    fn service_of(providers: &[Arc<FakeProvider>]) -> QuoteService {
        let registry = ProviderRegistry::new(as_dyn(providers)).unwrap();
        QuoteService::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn test_forwards_to_current_provider() {
        let first = FakeProvider::new("first", true);
        let service = service_of(&[first.clone()]);

        let quote = service.get_stock_quote("AAPL").await.unwrap();

        assert_eq!(quote.name, "first");
        assert_eq!(first.data_calls(), 1);
    }

    #[tokio::test]
    async fn test_uses_failover_provider() {
        let first = FakeProvider::new("first", false);
        let second = FakeProvider::new("second", true);
        let service = service_of(&[first.clone(), second.clone()]);

        let detail = service.get_stock_detail("MSFT").await.unwrap();

        assert_eq!(detail.quote.name, "second");
        assert_eq!(first.data_calls(), 0);
        assert_eq!(service.registry().current_index(), 1);
    }

    #[tokio::test]
    async fn test_search_falls_back_to_mock_catalog() {
        let first = FakeProvider::new("first", false);
        let second = FakeProvider::new("second", false);
        let service = service_of(&[first.clone(), second.clone()]);

        let results = service.search_stocks("appl").await.unwrap();

        assert!(!results.is_empty());
        for quote in &results {
            assert!(
                quote.symbol.to_lowercase().contains("appl")
                    || quote.name.to_lowercase().contains("appl")
            );
        }
        assert_eq!(first.data_calls() + second.data_calls(), 0);
    }

    #[tokio::test]
    async fn test_search_without_mock_match_returns_three() {
        let service = service_of(&[FakeProvider::new("first", false)]);

        let results = service.search_stocks("qqqqq").await.unwrap();
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn test_detail_and_quote_fall_back_to_mock_catalog() {
        let service = service_of(&[
            FakeProvider::new("first", false),
            FakeProvider::new("second", false),
        ]);

        let detail = service.get_stock_detail("TSLA").await.unwrap();
        assert_eq!(detail.quote.name, "Tesla, Inc.");
        assert_eq!(detail.sector.as_deref(), Some("Consumer Cyclical"));

        let quote = service.get_stock_quote("MSFT").await.unwrap();
        assert_eq!(quote.name, "Microsoft Corporation");
    }

    #[tokio::test]
    async fn test_unknown_symbol_during_outage_is_not_found() {
        let service = service_of(&[FakeProvider::new("first", false)]);

        let result = service.get_stock_quote("ZZZZ").await;
        assert!(matches!(result, Err(MarketDataError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_provider_errors_are_not_masked() {
        let service = service_of(&[FakeProvider::new("first", true)]);

        let result = service.get_stock_quote("ZZZZ").await;
        assert!(matches!(result, Err(MarketDataError::NotFound(_))));

        let result = service.get_stock_detail("FAIL").await;
        assert!(matches!(
            result,
            Err(MarketDataError::UpstreamRequestFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_switch_and_status() {
        let service = service_of(&[
            FakeProvider::new("first", true),
            FakeProvider::new("second", false),
        ]);

        assert_eq!(service.switch_provider(), "second");

        let status = service.get_provider_status().await;
        assert_eq!(status.len(), 2);
        assert!(status[0].available);
        assert!(!status[0].current);
        assert!(!status[1].available);
        assert!(status[1].current);

        assert_eq!(service.switch_provider(), "first");
    }
}
