use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CommentaryResponse {
    symbol: String,
    commentary: String,
}

/// AI brief for one symbol, built from the cached/gated market data.
async fn get_commentary(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CommentaryResponse>> {
    let Some(commentary_service) = state.commentary_service.as_ref() else {
        return Err(ApiError::ServiceUnavailable(
            "commentary is disabled: no AI API key configured".to_string(),
        ));
    };

    let quote = state.market_data.quote(&symbol).await?;
    // Fundamentals enrich the brief but their absence never blocks it
    let overview = state.market_data.overview(&symbol).await.ok();

    let commentary = commentary_service
        .symbol_brief(&quote, overview.as_ref())
        .await?;

    Ok(Json(CommentaryResponse {
        symbol: quote.symbol,
        commentary,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/commentary/{symbol}", get(get_commentary))
}
