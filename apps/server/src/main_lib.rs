use std::sync::Arc;

use stockwatch_market_data::{ProviderRegistry, QuoteService, QuoteServiceTrait};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

pub struct AppState {
    pub quote_service: Arc<dyn QuoteServiceTrait>,
}

pub fn init_tracing() {
    let log_format = std::env::var("SW_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let registry = ProviderRegistry::from_config(&config.providers())?;
    tracing::info!("{} stock provider(s) configured", registry.len());

    let quote_service = QuoteService::new(Arc::new(registry));

    Ok(Arc::new(AppState {
        quote_service: Arc::new(quote_service),
    }))
}
