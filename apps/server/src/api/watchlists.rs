use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::{error::ApiResult, main_lib::AppState};
use marketlens_core::watchlists::{NewWatchlistItem, WatchlistItem};

async fn get_watchlist(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<WatchlistItem>>> {
    let items = state.watchlist_service.get_watchlist()?;
    Ok(Json(items))
}

async fn add_symbol(
    State(state): State<Arc<AppState>>,
    Json(new_item): Json<NewWatchlistItem>,
) -> ApiResult<Json<WatchlistItem>> {
    let item = state.watchlist_service.add_symbol(new_item).await?;
    Ok(Json(item))
}

async fn remove_symbol(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    let _ = state.watchlist_service.remove_symbol(symbol).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/watchlist", get(get_watchlist).post(add_symbol))
        .route("/watchlist/{symbol}", axum::routing::delete(remove_symbol))
}
