use serde::{Deserialize, Serialize};

/// Company profile data from a provider's profile endpoint.
///
/// Never returned to callers on its own; adapters merge it into a
/// [`QuoteDetail`](super::QuoteDetail).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Company name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Business description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Business sector (e.g., "Technology")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,

    /// Industry within sector (e.g., "Consumer Electronics")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    /// Company website URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    /// Chief executive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ceo: Option<String>,

    /// Number of full-time employees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employees: Option<u64>,

    /// Headquarters location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headquarters: Option<String>,

    /// Founding year or date, as reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub founded: Option<String>,

    /// Market capitalization (absolute, not millions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,

    /// Price-to-earnings ratio
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe: Option<f64>,

    /// Earnings per share
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eps: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_profile_skips_absent_fields() {
        let profile = CompanyProfile {
            name: Some("Apple Inc.".to_string()),
            sector: Some("Technology".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["name"], "Apple Inc.");
        assert_eq!(json["sector"], "Technology");
        assert!(json.get("ceo").is_none());
        assert!(json.get("marketCap").is_none());
        assert!(json.get("market_cap").is_none());
    }
}
