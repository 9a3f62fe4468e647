use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use stockwatch_market_data::QuoteServiceTrait;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{ProviderStatus, StockDetail, StockQuote, SwitchProviderResponse},
};

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    query: String,
}

/// Providers expect trimmed, uppercase tickers.
fn normalize_symbol(raw: &str) -> ApiResult<String> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(ApiError::BadRequest("Symbol must not be empty".to_string()));
    }
    Ok(symbol)
}

#[utoipa::path(
    get,
    path = "/api/v1/stocks/search",
    params(("query" = String, Query, description = "Ticker or company name fragment")),
    responses((status = 200, body = [StockQuote]), (status = 400))
)]
pub async fn search_stocks(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SearchQuery>,
) -> ApiResult<Json<Vec<StockQuote>>> {
    let query = q.query.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("Query must not be empty".to_string()));
    }
    let results = state.quote_service.search_stocks(query).await?;
    Ok(Json(results.into_iter().map(StockQuote::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/stocks/{symbol}",
    params(("symbol" = String, Path, description = "Ticker symbol")),
    responses((status = 200, body = StockDetail), (status = 404))
)]
pub async fn get_stock_detail(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<StockDetail>> {
    let symbol = normalize_symbol(&symbol)?;
    let detail = state.quote_service.get_stock_detail(&symbol).await?;
    Ok(Json(StockDetail::from(detail)))
}

#[utoipa::path(
    get,
    path = "/api/v1/stocks/{symbol}/quote",
    params(("symbol" = String, Path, description = "Ticker symbol")),
    responses((status = 200, body = StockQuote), (status = 404))
)]
pub async fn get_stock_quote(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<StockQuote>> {
    let symbol = normalize_symbol(&symbol)?;
    let quote = state.quote_service.get_stock_quote(&symbol).await?;
    Ok(Json(StockQuote::from(quote)))
}

#[utoipa::path(
    get,
    path = "/api/v1/stocks/providers/status",
    responses((status = 200, body = [ProviderStatus]))
)]
pub async fn get_provider_status(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<ProviderStatus>> {
    let status = state.quote_service.get_provider_status().await;
    Json(status.into_iter().map(ProviderStatus::from).collect())
}

#[utoipa::path(
    post,
    path = "/api/v1/stocks/providers/switch",
    responses((status = 200, body = SwitchProviderResponse))
)]
pub async fn switch_provider(State(state): State<Arc<AppState>>) -> Json<SwitchProviderResponse> {
    Json(SwitchProviderResponse {
        current_provider: state.quote_service.switch_provider(),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stocks/search", get(search_stocks))
        .route("/stocks/providers/status", get(get_provider_status))
        .route("/stocks/providers/switch", post(switch_provider))
        .route("/stocks/{symbol}", get(get_stock_detail))
        .route("/stocks/{symbol}/quote", get(get_stock_quote))
}
