use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::handlers::predict::AppState;

/// Health check endpoint
/// Returns 200 OK if the service is running
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "service": "bill-predictor",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

/// Readiness check endpoint
/// The server only starts once the model is loaded, so a reachable
/// instance is always ready to predict.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "ready",
        "service": "bill-predictor",
        "model": state.predictor.model_name(),
        "n_features": state.predictor.n_features(),
    })))
}
