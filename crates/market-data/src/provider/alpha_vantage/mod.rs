//! Alpha Vantage stock provider implementation.
//!
//! This module provides stock data from the Alpha Vantage API:
//! - Symbol search via SYMBOL_SEARCH
//! - Latest quotes via GLOBAL_QUOTE
//! - Company fundamentals via OVERVIEW
//!
//! Note: Alpha Vantage free tier is limited to 5 API calls per minute, and
//! signals throttling with a 200 response carrying a `Note` or `Information`.

use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::{CompanyProfile, ProviderConfig, ProviderKind, Quote, QuoteDetail};
use crate::provider::{redacted_url, StockProvider, MAX_SEARCH_RESULTS};

const PROVIDER_ID: &str = "ALPHA_VANTAGE";

const SEARCH_REGION: &str = "United States";
const SEARCHABLE_TYPES: &[&str] = &["Equity", "ETF"];

/// Alpha Vantage stock provider.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

// ============================================================================
// Response structures for Alpha Vantage API
// ============================================================================

/// Messages Alpha Vantage puts at the top level of any response.
#[derive(Debug, Default, Deserialize)]
struct ApiMessages {
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

/// GLOBAL_QUOTE response
#[derive(Debug, Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct GlobalQuote {
    #[serde(rename = "01. symbol")]
    symbol: Option<String>,
    #[serde(rename = "05. price")]
    price: Option<String>,
    #[serde(rename = "06. volume")]
    volume: Option<String>,
    #[serde(rename = "09. change")]
    change: Option<String>,
    #[serde(rename = "10. change percent")]
    change_percent: Option<String>,
}

/// SYMBOL_SEARCH response
#[derive(Debug, Deserialize)]
struct SymbolSearchResponse {
    #[serde(rename = "bestMatches", default)]
    best_matches: Vec<SearchMatch>,
}

#[derive(Debug, Deserialize)]
struct SearchMatch {
    #[serde(rename = "1. symbol")]
    symbol: String,
    #[serde(rename = "2. name", default)]
    name: String,
    #[serde(rename = "3. type", default)]
    match_type: String,
    #[serde(rename = "4. region", default)]
    region: String,
}

/// OVERVIEW response
#[derive(Debug, Deserialize)]
struct CompanyOverviewResponse {
    #[serde(rename = "Symbol")]
    symbol: Option<String>,
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Description")]
    description: Option<String>,
    #[serde(rename = "Sector")]
    sector: Option<String>,
    #[serde(rename = "Industry")]
    industry: Option<String>,
    #[serde(rename = "OfficialSite")]
    official_site: Option<String>,
    #[serde(rename = "Address")]
    address: Option<String>,
    #[serde(rename = "FullTimeEmployees")]
    full_time_employees: Option<String>,
    #[serde(rename = "MarketCapitalization")]
    market_capitalization: Option<String>,
    #[serde(rename = "PERatio")]
    pe_ratio: Option<String>,
    #[serde(rename = "EPS")]
    eps: Option<String>,
}

impl GlobalQuote {
    fn is_empty(&self) -> bool {
        self.symbol.is_none() && self.price.is_none()
    }

    fn into_quote(self, symbol: &str) -> Quote {
        Quote::new(
            symbol,
            symbol,
            parse_number(self.price.as_deref()),
            parse_number(self.change.as_deref()),
            parse_number(self.change_percent.as_deref()),
            parse_number(self.volume.as_deref()),
        )
    }
}

impl CompanyOverviewResponse {
    fn into_profile(self) -> CompanyProfile {
        CompanyProfile {
            name: present(self.name),
            description: present(self.description),
            sector: present(self.sector),
            industry: present(self.industry),
            website: present(self.official_site),
            headquarters: present(self.address),
            employees: present(self.full_time_employees).and_then(|v| v.parse::<u64>().ok()),
            market_cap: parse_optional(self.market_capitalization.as_deref()),
            pe: parse_optional(self.pe_ratio.as_deref()),
            eps: parse_optional(self.eps.as_deref()),
            ..Default::default()
        }
    }
}

/// Alpha Vantage spells missing values as "None" or "-".
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| {
        let v = v.trim();
        !v.is_empty() && v != "None" && v != "-"
    })
}

/// Parse an optional numeric string, keeping absent values absent.
fn parse_optional(value: Option<&str>) -> Option<f64> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "None" && *v != "-")
        .and_then(|v| v.trim_end_matches('%').parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Parse a required numeric string, substituting 0 when absent or garbled.
fn parse_number(value: Option<&str>) -> f64 {
    parse_optional(value).unwrap_or(0.0)
}

// ============================================================================
// AlphaVantageProvider implementation
// ============================================================================

impl AlphaVantageProvider {
    /// Create a new Alpha Vantage provider from its config.
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        }
    }

    /// Make a request to the Alpha Vantage API.
    async fn fetch(&self, params: &[(&str, &str)]) -> Result<String, MarketDataError> {
        let mut all_params: Vec<(&str, &str)> = params.to_vec();
        all_params.push(("apikey", &self.api_key));

        let url = reqwest::Url::parse_with_params(&self.base_url, &all_params).map_err(|e| {
            MarketDataError::request_failed(PROVIDER_ID, format!("Failed to build URL: {}", e))
        })?;

        debug!("Alpha Vantage request: {}", redacted_url(&url, "apikey"));

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| {
                MarketDataError::request_failed(PROVIDER_ID, e.without_url().to_string())
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::rate_limited(PROVIDER_ID));
        }

        if !status.is_success() {
            return Err(MarketDataError::request_failed(
                PROVIDER_ID,
                format!("HTTP {}", status),
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|e| MarketDataError::request_failed(PROVIDER_ID, e.to_string()))?;

        let messages: ApiMessages = serde_json::from_str(&text).unwrap_or_default();
        Self::check_api_error(&messages)?;

        Ok(text)
    }

    /// Check for API-level errors in the response.
    fn check_api_error(messages: &ApiMessages) -> Result<(), MarketDataError> {
        if let Some(ref msg) = messages.error_message {
            return Err(MarketDataError::request_failed(PROVIDER_ID, msg.clone()));
        }

        for msg in [&messages.note, &messages.information].into_iter().flatten() {
            if is_rate_limit_message(msg) {
                return Err(MarketDataError::rate_limited(PROVIDER_ID));
            }
            warn!("Alpha Vantage notice: {}", msg);
        }

        Ok(())
    }

    /// Fetch latest quote using GLOBAL_QUOTE.
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let text = self
            .fetch(&[("function", "GLOBAL_QUOTE"), ("symbol", symbol)])
            .await?;

        let response: GlobalQuoteResponse = serde_json::from_str(&text).map_err(|e| {
            MarketDataError::request_failed(
                PROVIDER_ID,
                format!("Failed to parse quote response: {}", e),
            )
        })?;

        let global_quote = response.global_quote.ok_or_else(|| {
            MarketDataError::request_failed(PROVIDER_ID, "Response has no Global Quote")
        })?;

        if global_quote.is_empty() {
            return Err(MarketDataError::NotFound(symbol.to_string()));
        }

        Ok(global_quote.into_quote(symbol))
    }

    /// Fetch company overview using OVERVIEW.
    async fn fetch_company_overview(
        &self,
        symbol: &str,
    ) -> Result<CompanyProfile, MarketDataError> {
        let text = self
            .fetch(&[("function", "OVERVIEW"), ("symbol", symbol)])
            .await?;

        let response: CompanyOverviewResponse = serde_json::from_str(&text).map_err(|e| {
            MarketDataError::request_failed(
                PROVIDER_ID,
                format!("Failed to parse company overview response: {}", e),
            )
        })?;

        if response.symbol.is_none() {
            return Err(MarketDataError::NotFound(symbol.to_string()));
        }

        debug!("Alpha Vantage: fetched company overview for {}", symbol);

        Ok(response.into_profile())
    }

    /// Fetch search candidates using SYMBOL_SEARCH.
    async fn search_candidates(&self, query: &str) -> Result<Vec<SearchMatch>, MarketDataError> {
        let text = self
            .fetch(&[("function", "SYMBOL_SEARCH"), ("keywords", query)])
            .await?;

        let response: SymbolSearchResponse = serde_json::from_str(&text).map_err(|e| {
            MarketDataError::request_failed(
                PROVIDER_ID,
                format!("Failed to parse search response: {}", e),
            )
        })?;

        Ok(filter_matches(response.best_matches))
    }
}

fn is_rate_limit_message(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("call frequency") || message.contains("rate limit")
}

/// Keep US equities and ETFs, capped.
fn filter_matches(matches: Vec<SearchMatch>) -> Vec<SearchMatch> {
    matches
        .into_iter()
        .filter(|m| m.region == SEARCH_REGION)
        .filter(|m| SEARCHABLE_TYPES.contains(&m.match_type.as_str()))
        .take(MAX_SEARCH_RESULTS)
        .collect()
}

#[async_trait]
impl StockProvider for AlphaVantageProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::AlphaVantage
    }

    async fn search_stocks(&self, query: &str) -> Result<Vec<Quote>, MarketDataError> {
        let matches = self.search_candidates(query).await?;

        let quotes = join_all(matches.iter().map(|m| async move {
            match self.fetch_quote(&m.symbol).await {
                Ok(mut quote) => {
                    quote.name = m.name.clone();
                    quote
                }
                Err(e) => {
                    debug!("Alpha Vantage: quote for {} unavailable: {}", m.symbol, e);
                    Quote::stub(&m.symbol, &m.name)
                }
            }
        }))
        .await;

        Ok(quotes)
    }

    async fn get_stock_detail(&self, symbol: &str) -> Result<QuoteDetail, MarketDataError> {
        let (quote, profile) = tokio::join!(
            self.fetch_quote(symbol),
            self.fetch_company_overview(symbol)
        );

        let quote = quote?;
        match profile {
            Ok(profile) => Ok(QuoteDetail::with_profile(quote, profile)),
            Err(e) => {
                debug!("Alpha Vantage: overview for {} unavailable: {}", symbol, e);
                Ok(QuoteDetail::from_quote(quote))
            }
        }
    }

    async fn get_stock_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        self.fetch_quote(symbol).await
    }
}
