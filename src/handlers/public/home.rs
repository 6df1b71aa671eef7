use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::error::ApiError;
use crate::services::Quote;
use crate::state::AppState;

/// GET / - a random quote from the configured quote service
pub async fn root(State(state): State<AppState>) -> Result<Json<Quote>, ApiError> {
    match state.quotes.random().await {
        Ok(quote) => Ok(Json(quote)),
        Err(e) => {
            tracing::error!("Error fetching Zen quotes: {}", e);
            Err(ApiError::bad_request("Error fetching Zen quotes"))
        }
    }
}

/// GET /health - liveness plus a store round-trip
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok",
                "version": env!("CARGO_PKG_VERSION"),
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable",
                    "version": env!("CARGO_PKG_VERSION"),
                })),
            )
        }
    }
}
