//! Stockwatch Market Data Crate
//!
//! Stock search and quote lookups over interchangeable upstream providers,
//! with automatic failover between them.
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |   QuoteService   |  (mock catalog when every provider is down)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! | ProviderRegistry |  (probe current, scan the rest, pin the cursor)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |  StockProvider   |  (Finnhub, Alpha Vantage)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! | Quote / Detail   |  (canonical records)
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Quote`] - Price snapshot for one symbol
//! - [`QuoteDetail`] - Quote plus company profile fields
//! - [`ProviderConfig`] - API key and endpoint for one vendor
//! - [`ProviderRegistry`] - Adapter selection and failover
//! - [`QuoteService`] - Entry point used by the HTTP layer

pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;
pub mod service;

#[cfg(test)]
mod test_support;

pub use errors::MarketDataError;

// Re-export all public types from models
pub use models::{CompanyProfile, ProviderConfig, ProviderKind, ProviderStatus, Quote, QuoteDetail};

// Re-export provider types
pub use provider::{AlphaVantageProvider, FinnhubProvider, StockProvider};

pub use registry::ProviderRegistry;
pub use service::{QuoteService, QuoteServiceTrait};
