//! Stock provider trait definition.
//!
//! Every upstream vendor is one implementation of [`StockProvider`]. The
//! registry holds them as `Arc<dyn StockProvider>` and never needs to know
//! which vendor sits behind a slot.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{ProviderKind, Quote, QuoteDetail};

/// Symbol fetched by the availability probe.
pub const PROBE_SYMBOL: &str = "AAPL";

/// Upper bound on search candidates hydrated with a quote.
pub const MAX_SEARCH_RESULTS: usize = 10;

/// Trait for stock data providers.
///
/// All symbol inputs are expected trimmed and uppercased by the caller.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use stockwatch_market_data::provider::StockProvider;
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl StockProvider for MyProvider {
///     fn kind(&self) -> ProviderKind {
///         ProviderKind::Finnhub
///     }
///
///     // ... implement fetch methods
/// }
/// ```
#[async_trait]
pub trait StockProvider: Send + Sync {
    /// Which vendor this adapter talks to.
    fn kind(&self) -> ProviderKind;

    /// Human-readable name for logs and status reporting.
    fn name(&self) -> &str {
        self.kind().display_name()
    }

    /// Search the vendor's symbol index.
    ///
    /// Returns at most [`MAX_SEARCH_RESULTS`] quotes in vendor order. A
    /// candidate whose quote could not be fetched is returned as
    /// [`Quote::stub`] instead of failing the whole search.
    async fn search_stocks(&self, query: &str) -> Result<Vec<Quote>, MarketDataError>;

    /// Fetch a quote together with company profile fields.
    ///
    /// Fails when the quote fails. A failed profile leaves the descriptive
    /// fields absent.
    async fn get_stock_detail(&self, symbol: &str) -> Result<QuoteDetail, MarketDataError>;

    /// Fetch a single quote.
    async fn get_stock_quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;

    /// Lightweight availability probe. Never fails.
    async fn is_available(&self) -> bool {
        self.get_stock_quote(PROBE_SYMBOL).await.is_ok()
    }
}
