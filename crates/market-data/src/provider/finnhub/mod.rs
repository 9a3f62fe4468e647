//! Finnhub stock provider implementation.
//!
//! This module provides stock data from the Finnhub API:
//! - Symbol search via /search endpoint
//! - Latest quotes via /quote endpoint
//! - Company profiles via /stock/profile2 endpoint
//!
//! Finnhub free tier is limited to 60 API calls per minute.
//! API documentation: https://finnhub.io/docs/api

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::errors::MarketDataError;
use crate::models::{CompanyProfile, ProviderConfig, ProviderKind, Quote, QuoteDetail};
use crate::provider::{redacted_url, StockProvider, MAX_SEARCH_RESULTS};

const PROVIDER_ID: &str = "FINNHUB";

/// Security types kept from search results.
const SEARCHABLE_TYPES: &[&str] = &["Common Stock", "ETP", "ADR"];

// ============================================================================
// API Response Structures
// ============================================================================

/// Response from /quote endpoint
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    /// Current price
    c: Option<f64>,
    /// Change
    d: Option<f64>,
    /// Percent change
    dp: Option<f64>,
    /// Previous close
    pc: Option<f64>,
}

/// Response from /search endpoint
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<SearchItem>,
}

/// Individual search result item
#[derive(Debug, Deserialize)]
struct SearchItem {
    /// Full description/name
    #[serde(default)]
    description: String,
    /// Symbol for API calls
    symbol: String,
    /// Security type (e.g., "Common Stock", "ETP")
    #[serde(rename = "type", default)]
    security_type: String,
}

/// Response from /stock/profile2 endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    name: Option<String>,
    ticker: Option<String>,
    finnhub_industry: Option<String>,
    country: Option<String>,
    weburl: Option<String>,
    /// Market capitalization (in millions)
    market_capitalization: Option<f64>,
    employee_total: Option<f64>,
}

/// Error payload from Finnhub
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

// ============================================================================
// FinnhubProvider
// ============================================================================

/// Finnhub stock provider.
///
/// US listings only: search drops anything with an exchange suffix.
pub struct FinnhubProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FinnhubProvider {
    /// Create a new Finnhub provider from its config.
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Make a GET request to the Finnhub API.
    async fn fetch(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<String, MarketDataError> {
        let mut all_params: Vec<(&str, &str)> = params.to_vec();
        all_params.push(("token", &self.api_key));

        let url = reqwest::Url::parse_with_params(
            &format!("{}{}", self.base_url, endpoint),
            &all_params,
        )
        .map_err(|e| {
            MarketDataError::request_failed(PROVIDER_ID, format!("Failed to build URL: {}", e))
        })?;

        debug!("Finnhub request: {}", redacted_url(&url, "token"));

        let response = self.client.get(url).send().await.map_err(|e| {
            MarketDataError::request_failed(
                PROVIDER_ID,
                format!("Request failed: {}", e.without_url()),
            )
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            MarketDataError::request_failed(PROVIDER_ID, format!("Failed to read response: {}", e))
        })?;

        if let Some(message) = error_message(&body) {
            return Err(classify_error(&message));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::rate_limited(PROVIDER_ID));
        }

        if !status.is_success() {
            return Err(MarketDataError::request_failed(
                PROVIDER_ID,
                format!("HTTP {}", status),
            ));
        }

        Ok(body)
    }

    /// Fetch latest quote from /quote endpoint.
    ///
    /// The endpoint carries no company name, so the symbol stands in.
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let text = self.fetch("/quote", &[("symbol", symbol)]).await?;

        let response: QuoteResponse = serde_json::from_str(&text).map_err(|e| {
            MarketDataError::request_failed(
                PROVIDER_ID,
                format!("Failed to parse quote response: {}", e),
            )
        })?;

        // Finnhub answers unknown symbols with an all-zero quote
        let price = response.c.unwrap_or(0.0);
        let previous_close = response.pc.unwrap_or(0.0);
        if price == 0.0 && previous_close == 0.0 {
            return Err(MarketDataError::NotFound(symbol.to_string()));
        }

        Ok(Quote::new(
            symbol,
            symbol,
            price,
            response.d.unwrap_or(0.0),
            response.dp.unwrap_or(0.0),
            0.0, // /quote endpoint doesn't provide volume
        ))
    }

    /// Fetch company profile from /stock/profile2 endpoint.
    async fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile, MarketDataError> {
        let text = self.fetch("/stock/profile2", &[("symbol", symbol)]).await?;

        let response: ProfileResponse = serde_json::from_str(&text).map_err(|e| {
            MarketDataError::request_failed(
                PROVIDER_ID,
                format!("Failed to parse profile response: {}", e),
            )
        })?;

        // Empty object for unknown symbols
        if response.name.is_none() && response.ticker.is_none() {
            return Err(MarketDataError::NotFound(symbol.to_string()));
        }

        Ok(response.into_profile())
    }

    /// Fetch search candidates from /search endpoint.
    async fn search_candidates(&self, query: &str) -> Result<Vec<SearchItem>, MarketDataError> {
        let text = self.fetch("/search", &[("q", query)]).await?;

        let response: SearchResponse = serde_json::from_str(&text).map_err(|e| {
            MarketDataError::request_failed(
                PROVIDER_ID,
                format!("Failed to parse search response: {}", e),
            )
        })?;

        Ok(filter_candidates(response.result))
    }
}

impl ProfileResponse {
    fn into_profile(self) -> CompanyProfile {
        CompanyProfile {
            name: self.name,
            sector: self.finnhub_industry.clone(),
            industry: self.finnhub_industry,
            website: self.weburl.filter(|w| !w.is_empty()),
            headquarters: self.country.filter(|c| !c.is_empty()),
            employees: self
                .employee_total
                .filter(|e| e.is_finite() && *e > 0.0)
                .map(|e| e as u64),
            market_cap: self
                .market_capitalization
                .filter(|mc| mc.is_finite() && *mc > 0.0)
                .map(|mc| mc * 1_000_000.0), // Finnhub returns in millions
            ..Default::default()
        }
    }
}

/// Keep plain US listings of supported types, capped.
fn filter_candidates(items: Vec<SearchItem>) -> Vec<SearchItem> {
    items
        .into_iter()
        .filter(|item| SEARCHABLE_TYPES.contains(&item.security_type.as_str()))
        .filter(|item| !item.symbol.contains('.'))
        .take(MAX_SEARCH_RESULTS)
        .collect()
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|resp| resp.error)
}

fn classify_error(message: &str) -> MarketDataError {
    if message.to_lowercase().contains("limit") {
        MarketDataError::rate_limited(PROVIDER_ID)
    } else {
        MarketDataError::request_failed(PROVIDER_ID, message)
    }
}

#[async_trait]
impl StockProvider for FinnhubProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Finnhub
    }

    async fn search_stocks(&self, query: &str) -> Result<Vec<Quote>, MarketDataError> {
        let candidates = self.search_candidates(query).await?;

        let quotes = join_all(candidates.iter().map(|item| async move {
            match self.fetch_quote(&item.symbol).await {
                Ok(mut quote) => {
                    quote.name = item.description.clone();
                    quote
                }
                Err(e) => {
                    debug!("Finnhub: quote for {} unavailable: {}", item.symbol, e);
                    Quote::stub(&item.symbol, &item.description)
                }
            }
        }))
        .await;

        debug!("Finnhub: found {} search results for '{}'", quotes.len(), query);

        Ok(quotes)
    }

    async fn get_stock_detail(&self, symbol: &str) -> Result<QuoteDetail, MarketDataError> {
        let (quote, profile) = tokio::join!(self.fetch_quote(symbol), self.fetch_profile(symbol));

        let quote = quote?;
        match profile {
            Ok(profile) => Ok(QuoteDetail::with_profile(quote, profile)),
            Err(e) => {
                debug!("Finnhub: profile for {} unavailable: {}", symbol, e);
                Ok(QuoteDetail::from_quote(quote))
            }
        }
    }

    async fn get_stock_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        self.fetch_quote(symbol).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> FinnhubProvider {
        let config =
            ProviderConfig::new(ProviderKind::Finnhub, "test-key").with_base_url(server.uri());
        FinnhubProvider::new(&config)
    }

    async fn mount_quote(server: &MockServer, symbol: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/quote"))
            .and(query_param("symbol", symbol))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[test]
    fn test_provider_kind() {
        let config = ProviderConfig::new(ProviderKind::Finnhub, "key");
        let provider = FinnhubProvider::new(&config);
        assert_eq!(provider.kind(), ProviderKind::Finnhub);
        assert_eq!(provider.name(), "Finnhub");
    }

    #[test]
    fn test_filter_candidates() {
        let json = r#"{
            "count": 4,
            "result": [
                {"description": "APPLE INC", "displaySymbol": "AAPL", "symbol": "AAPL", "type": "Common Stock"},
                {"description": "APPLE INC", "displaySymbol": "AAPL.MX", "symbol": "AAPL.MX", "type": "Common Stock"},
                {"description": "APPLE CALL", "displaySymbol": "AAPL1", "symbol": "AAPL1", "type": "Warrant"},
                {"description": "SPDR S&P 500", "displaySymbol": "SPY", "symbol": "SPY", "type": "ETP"}
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let kept: Vec<String> = filter_candidates(response.result)
            .into_iter()
            .map(|item| item.symbol)
            .collect();
        assert_eq!(kept, vec!["AAPL", "SPY"]);
    }

    #[test]
    fn test_filter_candidates_caps_results() {
        let items = (0..25)
            .map(|i| SearchItem {
                description: format!("Company {}", i),
                symbol: format!("SYM{}", i),
                security_type: "Common Stock".to_string(),
            })
            .collect();

        assert_eq!(filter_candidates(items).len(), MAX_SEARCH_RESULTS);
    }

    #[test]
    fn test_profile_response_mapping() {
        let json = r#"{
            "country": "US",
            "currency": "USD",
            "finnhubIndustry": "Technology",
            "ipo": "1980-12-12",
            "marketCapitalization": 2900000.5,
            "name": "Apple Inc",
            "ticker": "AAPL",
            "weburl": "https://www.apple.com/",
            "employeeTotal": 161000
        }"#;

        let response: ProfileResponse = serde_json::from_str(json).unwrap();
        let profile = response.into_profile();

        assert_eq!(profile.name.as_deref(), Some("Apple Inc"));
        assert_eq!(profile.sector.as_deref(), Some("Technology"));
        assert_eq!(profile.industry.as_deref(), Some("Technology"));
        assert_eq!(profile.website.as_deref(), Some("https://www.apple.com/"));
        assert_eq!(profile.headquarters.as_deref(), Some("US"));
        assert_eq!(profile.employees, Some(161000));
        assert_eq!(profile.market_cap, Some(2_900_000.5 * 1_000_000.0));
    }

    #[test]
    fn test_classify_error() {
        assert!(matches!(
            classify_error("API limit reached. Please try again later."),
            MarketDataError::UpstreamRateLimited { .. }
        ));
        assert!(matches!(
            classify_error("Invalid API key"),
            MarketDataError::UpstreamRequestFailed { .. }
        ));
    }

    #[tokio::test]
    async fn test_get_stock_quote_maps_fields() {
        let server = MockServer::start().await;
        mount_quote(
            &server,
            "AAPL",
            json!({"c": 190.5, "d": 1.25, "dp": 0.66, "h": 191.0, "l": 188.0, "o": 189.0, "pc": 189.25, "t": 1700000000}),
        )
        .await;

        let provider = provider_for(&server);
        let quote = provider.get_stock_quote("AAPL").await.unwrap();

        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.price, 190.5);
        assert_eq!(quote.change, 1.25);
        assert_eq!(quote.change_percent, 0.66);
        assert_eq!(quote.volume, 0.0);
    }

    #[tokio::test]
    async fn test_get_stock_quote_substitutes_zero_for_missing_fields() {
        let server = MockServer::start().await;
        mount_quote(&server, "NEWCO", json!({"c": 12.0, "d": null, "dp": null, "pc": 0})).await;

        let provider = provider_for(&server);
        let quote = provider.get_stock_quote("NEWCO").await.unwrap();

        assert_eq!(quote.price, 12.0);
        assert_eq!(quote.change, 0.0);
        assert_eq!(quote.change_percent, 0.0);
    }

    #[tokio::test]
    async fn test_get_stock_quote_unknown_symbol_is_not_found() {
        let server = MockServer::start().await;
        mount_quote(
            &server,
            "ZZZZ",
            json!({"c": 0, "d": null, "dp": null, "h": 0, "l": 0, "o": 0, "pc": 0, "t": 0}),
        )
        .await;

        let provider = provider_for(&server);
        let result = provider.get_stock_quote("ZZZZ").await;

        assert!(matches!(result, Err(MarketDataError::NotFound(ref s)) if s == "ZZZZ"));
    }

    #[tokio::test]
    async fn test_rate_limit_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quote"))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_json(json!({"error": "API limit reached. Please try again later."})),
            )
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let result = provider.get_stock_quote("AAPL").await;

        assert!(matches!(
            result,
            Err(MarketDataError::UpstreamRateLimited { .. })
        ));
        assert!(!provider.is_available().await);
    }

    #[tokio::test]
    async fn test_server_error_is_request_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let result = provider.get_stock_quote("AAPL").await;

        assert!(matches!(
            result,
            Err(MarketDataError::UpstreamRequestFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_is_available_probes_aapl() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quote"))
            .and(query_param("symbol", "AAPL"))
            .and(query_param("token", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"c": 190.0, "pc": 189.0})))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        assert!(provider.is_available().await);
    }

    #[tokio::test]
    async fn test_search_stocks_hydrates_and_degrades_to_stub() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "apple"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 3,
                "result": [
                    {"description": "APPLE INC", "displaySymbol": "AAPL", "symbol": "AAPL", "type": "Common Stock"},
                    {"description": "APPLE HOSPITALITY REIT", "displaySymbol": "APLE", "symbol": "APLE", "type": "Common Stock"},
                    {"description": "APPLE INC", "displaySymbol": "APC.DE", "symbol": "APC.DE", "type": "Common Stock"}
                ]
            })))
            .mount(&server)
            .await;
        mount_quote(&server, "AAPL", json!({"c": 190.0, "d": 2.0, "dp": 1.06, "pc": 188.0})).await;
        Mock::given(method("GET"))
            .and(path("/quote"))
            .and(query_param("symbol", "APLE"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let results = provider.search_stocks("apple").await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].symbol, "AAPL");
        assert_eq!(results[0].name, "APPLE INC");
        assert_eq!(results[0].price, 190.0);
        assert_eq!(results[1], Quote::stub("APLE", "APPLE HOSPITALITY REIT"));
    }

    #[tokio::test]
    async fn test_get_stock_detail_merges_profile() {
        let server = MockServer::start().await;
        mount_quote(&server, "AAPL", json!({"c": 190.0, "d": 2.0, "dp": 1.06, "pc": 188.0})).await;
        Mock::given(method("GET"))
            .and(path("/stock/profile2"))
            .and(query_param("symbol", "AAPL"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Apple Inc",
                "ticker": "AAPL",
                "finnhubIndustry": "Technology",
                "weburl": "https://www.apple.com/",
                "country": "US",
                "marketCapitalization": 2900000.0
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let detail = provider.get_stock_detail("AAPL").await.unwrap();

        assert_eq!(detail.quote.name, "Apple Inc");
        assert_eq!(detail.quote.price, 190.0);
        assert_eq!(detail.quote.market_cap, Some(2.9e12));
        assert_eq!(detail.sector.as_deref(), Some("Technology"));
        assert_eq!(detail.website.as_deref(), Some("https://www.apple.com/"));
    }

    #[tokio::test]
    async fn test_get_stock_detail_without_profile() {
        let server = MockServer::start().await;
        mount_quote(&server, "AAPL", json!({"c": 190.0, "d": 2.0, "dp": 1.06, "pc": 188.0})).await;
        Mock::given(method("GET"))
            .and(path("/stock/profile2"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let detail = provider.get_stock_detail("AAPL").await.unwrap();

        assert_eq!(detail.quote.price, 190.0);
        assert_eq!(detail.quote.change, 2.0);
        assert!(detail.sector.is_none());
        assert!(detail.industry.is_none());
        assert!(detail.website.is_none());
    }

    #[tokio::test]
    async fn test_get_stock_detail_fails_when_quote_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quote"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/stock/profile2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Apple Inc", "ticker": "AAPL"})))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        assert!(provider.get_stock_detail("AAPL").await.is_err());
    }
}
