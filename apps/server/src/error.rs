//! API error mapping.
//!
//! Every failure becomes a JSON message with an appropriate status code. No
//! automatic retry happens anywhere in this layer; retry is the client's
//! decision.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use marketlens_ai::AiError;
use marketlens_core::errors::{DatabaseError, Error as CoreError};
use marketlens_market_data::MarketDataError;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

pub enum ApiError {
    MarketData(MarketDataError),
    Core(CoreError),
    Ai(AiError),
    ServiceUnavailable(String),
}

impl From<MarketDataError> for ApiError {
    fn from(err: MarketDataError) -> Self {
        Self::MarketData(err)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self::Core(err)
    }
}

impl From<AiError> for ApiError {
    fn from(err: AiError) -> Self {
        Self::Ai(err)
    }
}

fn market_data_status(err: &MarketDataError) -> StatusCode {
    match err {
        MarketDataError::SymbolNotFound(_) => StatusCode::NOT_FOUND,
        MarketDataError::QuotaExhausted { .. } | MarketDataError::RateLimited => {
            StatusCode::TOO_MANY_REQUESTS
        }
        MarketDataError::AdmissionTimeout => StatusCode::SERVICE_UNAVAILABLE,
        MarketDataError::Timeout
        | MarketDataError::Network(_)
        | MarketDataError::ProviderError { .. }
        | MarketDataError::Parse { .. } => StatusCode::BAD_GATEWAY,
        MarketDataError::Cancelled => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn core_status(err: &CoreError) -> StatusCode {
    match err {
        CoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CoreError::Database(DatabaseError::NotFound(_)) => StatusCode::NOT_FOUND,
        CoreError::Database(DatabaseError::UniqueViolation(_)) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::MarketData(err) => (market_data_status(err), err.to_string()),
            Self::Core(err) => (core_status(err), err.to_string()),
            Self::Ai(err) => (StatusCode::BAD_GATEWAY, err.to_string()),
            Self::ServiceUnavailable(message) => {
                (StatusCode::SERVICE_UNAVAILABLE, message.clone())
            }
        };

        if status.is_server_error() {
            tracing::error!("request failed: {}", message);
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
