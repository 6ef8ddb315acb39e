use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{error::ApiResult, main_lib::AppState};
use marketlens_market_data::{
    CompanyOverview, DailySeries, GateStatus, GlobalQuote, IncomeStatement, OutputSize,
    SymbolMatch,
};

#[derive(Deserialize)]
struct BatchQuery {
    /// Comma-separated symbols, e.g. `?symbols=AAPL,MSFT,GOOG`
    symbols: String,
}

#[derive(Deserialize)]
struct HistoryQuery {
    /// Request the full history instead of the compact window.
    #[serde(default)]
    full: bool,
}

#[derive(Deserialize)]
struct SearchQuery {
    q: String,
}

async fn get_quote(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<GlobalQuote>> {
    let quote = state.market_data.quote(&symbol).await?;
    Ok(Json(quote))
}

/// Batch quotes. Failing symbols are omitted; the batch itself never fails.
async fn get_quotes(
    Query(query): Query<BatchQuery>,
    State(state): State<Arc<AppState>>,
) -> Json<Vec<GlobalQuote>> {
    let symbols: Vec<String> = query
        .symbols
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    Json(state.market_data.quotes(&symbols).await)
}

async fn get_history(
    Path(symbol): Path<String>,
    Query(query): Query<HistoryQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DailySeries>> {
    let output_size = if query.full {
        OutputSize::Full
    } else {
        OutputSize::Compact
    };
    let series = state.market_data.daily_series(&symbol, output_size).await?;
    Ok(Json(series))
}

async fn get_overview(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CompanyOverview>> {
    let overview = state.market_data.overview(&symbol).await?;
    Ok(Json(overview))
}

async fn get_financials(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<IncomeStatement>> {
    let statement = state.market_data.income_statement(&symbol).await?;
    Ok(Json(statement))
}

async fn search(
    Query(query): Query<SearchQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<SymbolMatch>>> {
    let matches = state.market_data.search(&query.q).await?;
    Ok(Json(matches))
}

/// Drop every cached resource for a symbol, forcing fresh fetches.
async fn invalidate_symbol(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> StatusCode {
    state.market_data.invalidate_symbol(&symbol);
    StatusCode::NO_CONTENT
}

/// Gate snapshot backing the quota indicator.
async fn get_status(State(state): State<Arc<AppState>>) -> Json<GateStatus> {
    Json(state.market_data.status())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/quotes", get(get_quotes))
        .route("/quotes/{symbol}", get(get_quote).delete(invalidate_symbol))
        .route("/quotes/{symbol}/history", get(get_history))
        .route("/symbols/{symbol}/overview", get(get_overview))
        .route("/symbols/{symbol}/financials", get(get_financials))
        .route("/search", get(search))
        .route("/status", get(get_status))
}
