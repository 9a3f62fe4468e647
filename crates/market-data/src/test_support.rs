//! Scripted provider used by registry and service tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{ProviderKind, Quote, QuoteDetail};
use crate::provider::StockProvider;

pub(crate) struct FakeProvider {
    name: &'static str,
    available: AtomicBool,
    /// Probe answers consumed before `available` is consulted.
    probe_script: Mutex<VecDeque<bool>>,
    probes: AtomicUsize,
    data_calls: AtomicUsize,
}

impl FakeProvider {
    pub(crate) fn new(name: &'static str, available: bool) -> Arc<Self> {
        Arc::new(Self {
            name,
            available: AtomicBool::new(available),
            probe_script: Mutex::new(VecDeque::new()),
            probes: AtomicUsize::new(0),
            data_calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub(crate) fn script_probes(&self, answers: &[bool]) {
        self.probe_script.lock().unwrap().extend(answers.iter().copied());
    }

    pub(crate) fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub(crate) fn data_calls(&self) -> usize {
        self.data_calls.load(Ordering::SeqCst)
    }

    fn serve(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        self.data_calls.fetch_add(1, Ordering::SeqCst);
        if !self.available.load(Ordering::SeqCst) {
            return Err(MarketDataError::request_failed(self.name, "HTTP 503"));
        }
        match symbol {
            "ZZZZ" => return Err(MarketDataError::NotFound(symbol.to_string())),
            "FAIL" => return Err(MarketDataError::request_failed(self.name, "HTTP 500")),
            _ => {}
        }
        Ok(Quote::new(symbol, self.name, 100.0, 1.0, 1.0, 1000.0))
    }
}

#[async_trait]
impl StockProvider for FakeProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Finnhub
    }

    fn name(&self) -> &str {
        self.name
    }

    async fn search_stocks(&self, query: &str) -> Result<Vec<Quote>, MarketDataError> {
        self.serve(&query.to_uppercase()).map(|quote| vec![quote])
    }

    async fn get_stock_detail(&self, symbol: &str) -> Result<QuoteDetail, MarketDataError> {
        self.serve(symbol).map(QuoteDetail::from_quote)
    }

    async fn get_stock_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        self.serve(symbol)
    }

    async fn is_available(&self) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);
        let scripted = self.probe_script.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| self.available.load(Ordering::SeqCst))
    }
}

/// Upcast for registry construction.
pub(crate) fn as_dyn(providers: &[Arc<FakeProvider>]) -> Vec<Arc<dyn StockProvider>> {
    providers
        .iter()
        .map(|p| Arc::clone(p) as Arc<dyn StockProvider>)
        .collect()
}
