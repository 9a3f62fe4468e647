//! Error types for the market data crate.
//!
//! [`MarketDataError`] covers every failure an adapter, the provider registry
//! or the quote service can report. Only [`MarketDataError::ServiceUnavailable`]
//! is recovered locally (by the quote service, with mock data); every other
//! variant reaches the caller unchanged.

use thiserror::Error;

/// Errors that can occur during market data operations.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The upstream call failed: transport error, non-2xx status,
    /// unparsable body, or a vendor error payload.
    #[error("Upstream request failed: {provider} - {message}")]
    UpstreamRequestFailed {
        /// The provider that failed
        provider: String,
        /// What went wrong
        message: String,
    },

    /// The vendor signalled a rate limit or quota error.
    #[error("Upstream rate limited: {provider}")]
    UpstreamRateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The call succeeded but the vendor has no data for the symbol.
    #[error("Symbol not found: {0}")]
    NotFound(String),

    /// No configured provider passed its availability probe.
    #[error("No stock data provider is available")]
    ServiceUnavailable,

    /// The registry could not be built from the supplied configuration.
    /// Fatal at startup.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl MarketDataError {
    pub(crate) fn request_failed(provider: &str, message: impl Into<String>) -> Self {
        Self::UpstreamRequestFailed {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn rate_limited(provider: &str) -> Self {
        Self::UpstreamRateLimited {
            provider: provider.to_string(),
        }
    }

    /// Whether this error means every configured provider is down.
    ///
    /// The quote service answers these with mock data instead of failing.
    pub fn is_service_unavailable(&self) -> bool {
        matches!(self, Self::ServiceUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_service_unavailable_is_recoverable() {
        assert!(MarketDataError::ServiceUnavailable.is_service_unavailable());
        assert!(!MarketDataError::NotFound("ZZZZ".to_string()).is_service_unavailable());
        assert!(!MarketDataError::rate_limited("FINNHUB").is_service_unavailable());
        assert!(!MarketDataError::request_failed("FINNHUB", "HTTP 500").is_service_unavailable());
        assert!(!MarketDataError::Configuration("none".to_string()).is_service_unavailable());
    }

    #[test]
    fn test_error_display() {
        let error = MarketDataError::NotFound("INVALID".to_string());
        assert_eq!(format!("{}", error), "Symbol not found: INVALID");

        let error = MarketDataError::rate_limited("ALPHA_VANTAGE");
        assert_eq!(format!("{}", error), "Upstream rate limited: ALPHA_VANTAGE");

        let error = MarketDataError::request_failed("FINNHUB", "HTTP 503");
        assert_eq!(
            format!("{}", error),
            "Upstream request failed: FINNHUB - HTTP 503"
        );
    }
}
