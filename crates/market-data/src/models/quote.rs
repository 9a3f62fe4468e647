use serde::{Deserialize, Serialize};

use super::profile::CompanyProfile;

/// Canonical stock quote.
///
/// Every required numeric field is a finite number. Adapters substitute `0.0`
/// for anything the vendor omits, so callers never see a missing price.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Ticker, uppercase (e.g., "AAPL")
    pub symbol: String,

    /// Company or fund name
    pub name: String,

    /// Last traded price
    pub price: f64,

    /// Absolute change since previous close
    pub change: f64,

    /// Percent change since previous close (1.5 means +1.5%)
    pub change_percent: f64,

    /// Traded volume for the session
    pub volume: f64,

    /// Market capitalization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,

    /// Price-to-earnings ratio
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe: Option<f64>,

    /// Earnings per share
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eps: Option<f64>,
}

impl Quote {
    /// Create a quote with the required price fields.
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        change: f64,
        change_percent: f64,
        volume: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            price: finite_or_zero(price),
            change: finite_or_zero(change),
            change_percent: finite_or_zero(change_percent),
            volume: finite_or_zero(volume),
            market_cap: None,
            pe: None,
            eps: None,
        }
    }

    /// Zero-valued entry used when a search candidate could not be hydrated.
    pub fn stub(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(symbol, name, 0.0, 0.0, 0.0, 0.0)
    }

    /// Set the optional valuation fields.
    pub fn with_valuation(
        mut self,
        market_cap: Option<f64>,
        pe: Option<f64>,
        eps: Option<f64>,
    ) -> Self {
        self.market_cap = market_cap.filter(|v| v.is_finite());
        self.pe = pe.filter(|v| v.is_finite());
        self.eps = eps.filter(|v| v.is_finite());
        self
    }
}

/// Quote plus descriptive company fields.
///
/// The descriptive fields are independently optional: each vendor fills what
/// its profile endpoint offers, and all of them stay absent when the profile
/// call fails.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDetail {
    #[serde(flatten)]
    pub quote: Quote,

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

impl QuoteDetail {
    /// Detail carrying only the base quote fields.
    pub fn from_quote(quote: Quote) -> Self {
        Self {
            quote,
            description: None,
            sector: None,
            industry: None,
            website: None,
            ceo: None,
            employees: None,
            headquarters: None,
            founded: None,
        }
    }

    /// Merge a company profile into the base quote.
    ///
    /// Profile name and valuation figures win over what the quote endpoint
    /// reported, since quote endpoints rarely carry them.
    pub fn with_profile(quote: Quote, profile: CompanyProfile) -> Self {
        let mut quote = quote;
        if let Some(name) = profile.name.filter(|n| !n.trim().is_empty()) {
            quote.name = name;
        }
        quote.market_cap = profile.market_cap.or(quote.market_cap);
        quote.pe = profile.pe.or(quote.pe);
        quote.eps = profile.eps.or(quote.eps);

        Self {
            quote,
            description: profile.description,
            sector: profile.sector,
            industry: profile.industry,
            website: profile.website,
            ceo: profile.ceo,
            employees: profile.employees,
            headquarters: profile.headquarters,
            founded: profile.founded,
        }
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
