use serde::{Deserialize, Serialize};
use stockwatch_market_data as market_data;
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StockQuote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eps: Option<f64>,
}

impl From<market_data::Quote> for StockQuote {
    fn from(q: market_data::Quote) -> Self {
        Self {
            symbol: q.symbol,
            name: q.name,
            price: q.price,
            change: q.change,
            change_percent: q.change_percent,
            volume: q.volume,
            market_cap: q.market_cap,
            pe: q.pe,
            eps: q.eps,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StockDetail {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ceo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employees: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headquarters: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub founded: Option<String>,
}

impl From<market_data::QuoteDetail> for StockDetail {
    fn from(d: market_data::QuoteDetail) -> Self {
        let q = d.quote;
        Self {
            symbol: q.symbol,
            name: q.name,
            price: q.price,
            change: q.change,
            change_percent: q.change_percent,
            volume: q.volume,
            market_cap: q.market_cap,
            pe: q.pe,
            eps: q.eps,
            description: d.description,
            sector: d.sector,
            industry: d.industry,
            website: d.website,
            ceo: d.ceo,
            employees: d.employees,
            headquarters: d.headquarters,
            founded: d.founded,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
    pub name: String,
    pub available: bool,
    pub current: bool,
}

impl From<market_data::ProviderStatus> for ProviderStatus {
    fn from(s: market_data::ProviderStatus) -> Self {
        Self {
            name: s.name,
            available: s.available,
            current: s.current,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SwitchProviderResponse {
    pub current_provider: String,
}
