//! Static sample data served when no provider is reachable.
//!
//! Values are a fixed snapshot and never refreshed.

use crate::models::{Quote, QuoteDetail};

/// Entries returned by search when nothing matches the query.
const DEFAULT_SEARCH_RESULTS: usize = 3;

struct MockStock {
    symbol: &'static str,
    name: &'static str,
    price: f64,
    change: f64,
    change_percent: f64,
    volume: f64,
    market_cap: f64,
    pe: f64,
    eps: f64,
    description: &'static str,
    sector: &'static str,
    industry: &'static str,
    website: &'static str,
    ceo: &'static str,
    employees: u64,
    headquarters: &'static str,
    founded: &'static str,
}

const CATALOG: &[MockStock] = &[
    MockStock {
        symbol: "AAPL",
        name: "Apple Inc.",
        price: 189.84,
        change: 2.15,
        change_percent: 1.15,
        volume: 52_164_500.0,
        market_cap: 2.95e12,
        pe: 29.6,
        eps: 6.42,
        description: "Designs, manufactures and markets smartphones, personal computers, tablets, wearables and accessories.",
        sector: "Technology",
        industry: "Consumer Electronics",
        website: "https://www.apple.com",
        ceo: "Tim Cook",
        employees: 161_000,
        headquarters: "Cupertino, California",
        founded: "1976",
    },
    MockStock {
        symbol: "MSFT",
        name: "Microsoft Corporation",
        price: 415.26,
        change: -1.34,
        change_percent: -0.32,
        volume: 18_342_900.0,
        market_cap: 3.09e12,
        pe: 36.1,
        eps: 11.5,
        description: "Develops and licenses software, cloud services, devices and business solutions.",
        sector: "Technology",
        industry: "Software - Infrastructure",
        website: "https://www.microsoft.com",
        ceo: "Satya Nadella",
        employees: 221_000,
        headquarters: "Redmond, Washington",
        founded: "1975",
    },
    MockStock {
        symbol: "GOOGL",
        name: "Alphabet Inc.",
        price: 171.93,
        change: 0.87,
        change_percent: 0.51,
        volume: 24_105_700.0,
        market_cap: 2.12e12,
        pe: 26.3,
        eps: 6.52,
        description: "Provides online advertising, search, cloud computing and consumer hardware through Google and other segments.",
        sector: "Communication Services",
        industry: "Internet Content & Information",
        website: "https://abc.xyz",
        ceo: "Sundar Pichai",
        employees: 182_502,
        headquarters: "Mountain View, California",
        founded: "1998",
    },
    MockStock {
        symbol: "AMZN",
        name: "Amazon.com, Inc.",
        price: 186.51,
        change: 1.92,
        change_percent: 1.04,
        volume: 37_512_300.0,
        market_cap: 1.94e12,
        pe: 52.4,
        eps: 3.56,
        description: "Operates an online retail marketplace, subscription services and the Amazon Web Services cloud platform.",
        sector: "Consumer Cyclical",
        industry: "Internet Retail",
        website: "https://www.amazon.com",
        ceo: "Andy Jassy",
        employees: 1_525_000,
        headquarters: "Seattle, Washington",
        founded: "1994",
    },
    MockStock {
        symbol: "NVDA",
        name: "NVIDIA Corporation",
        price: 903.63,
        change: 18.42,
        change_percent: 2.08,
        volume: 41_883_100.0,
        market_cap: 2.26e12,
        pe: 75.8,
        eps: 11.93,
        description: "Designs graphics processors, data center accelerators and system-on-chip units.",
        sector: "Technology",
        industry: "Semiconductors",
        website: "https://www.nvidia.com",
        ceo: "Jensen Huang",
        employees: 29_600,
        headquarters: "Santa Clara, California",
        founded: "1993",
    },
    MockStock {
        symbol: "TSLA",
        name: "Tesla, Inc.",
        price: 177.48,
        change: -4.11,
        change_percent: -2.26,
        volume: 86_230_400.0,
        market_cap: 5.66e11,
        pe: 45.2,
        eps: 3.93,
        description: "Designs, manufactures and sells electric vehicles and energy generation and storage systems.",
        sector: "Consumer Cyclical",
        industry: "Auto Manufacturers",
        website: "https://www.tesla.com",
        ceo: "Elon Musk",
        employees: 140_473,
        headquarters: "Austin, Texas",
        founded: "2003",
    },
    MockStock {
        symbol: "META",
        name: "Meta Platforms, Inc.",
        price: 476.2,
        change: 3.58,
        change_percent: 0.76,
        volume: 12_904_600.0,
        market_cap: 1.21e12,
        pe: 27.4,
        eps: 17.38,
        description: "Builds social media and messaging applications and virtual and augmented reality products.",
        sector: "Communication Services",
        industry: "Internet Content & Information",
        website: "https://about.meta.com",
        ceo: "Mark Zuckerberg",
        employees: 69_329,
        headquarters: "Menlo Park, California",
        founded: "2004",
    },
    MockStock {
        symbol: "JPM",
        name: "JPMorgan Chase & Co.",
        price: 198.48,
        change: 0.64,
        change_percent: 0.32,
        volume: 8_611_200.0,
        market_cap: 5.7e11,
        pe: 11.9,
        eps: 16.68,
        description: "Provides investment banking, commercial banking, asset management and consumer financial services.",
        sector: "Financial Services",
        industry: "Banks - Diversified",
        website: "https://www.jpmorganchase.com",
        ceo: "Jamie Dimon",
        employees: 309_926,
        headquarters: "New York, New York",
        founded: "1799",
    },
];

impl MockStock {
    fn to_quote(&self) -> Quote {
        Quote::new(
            self.symbol,
            self.name,
            self.price,
            self.change,
            self.change_percent,
            self.volume,
        )
        .with_valuation(Some(self.market_cap), Some(self.pe), Some(self.eps))
    }

    fn to_detail(&self) -> QuoteDetail {
        QuoteDetail {
            quote: self.to_quote(),
            description: Some(self.description.to_string()),
            sector: Some(self.sector.to_string()),
            industry: Some(self.industry.to_string()),
            website: Some(self.website.to_string()),
            ceo: Some(self.ceo.to_string()),
            employees: Some(self.employees),
            headquarters: Some(self.headquarters.to_string()),
            founded: Some(self.founded.to_string()),
        }
    }
}

/// Case-insensitive substring match on symbol or name.
///
/// Falls back to the first few entries when nothing matches.
pub(crate) fn search(query: &str) -> Vec<Quote> {
    let needle = query.to_lowercase();
    let matches: Vec<Quote> = CATALOG
        .iter()
        .filter(|stock| {
            stock.symbol.to_lowercase().contains(&needle)
                || stock.name.to_lowercase().contains(&needle)
        })
        .map(MockStock::to_quote)
        .collect();

    if matches.is_empty() {
        CATALOG
            .iter()
            .take(DEFAULT_SEARCH_RESULTS)
            .map(MockStock::to_quote)
            .collect()
    } else {
        matches
    }
}

pub(crate) fn detail(symbol: &str) -> Option<QuoteDetail> {
    find(symbol).map(MockStock::to_detail)
}

pub(crate) fn quote(symbol: &str) -> Option<Quote> {
    find(symbol).map(MockStock::to_quote)
}

fn find(symbol: &str) -> Option<&'static MockStock> {
    CATALOG.iter().find(|stock| stock.symbol == symbol)
}
