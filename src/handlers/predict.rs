use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::analytics::{AnalyticsEvent, AnalyticsReporter};
use crate::encoder::FEATURE_NAMES;
use crate::error::AppError;
use crate::models::{PredictionResult, RawPredictionRequest};
use crate::predictor::Predictor;

/// Shared handler state, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<Predictor>,
    pub analytics: Option<AnalyticsReporter>,
}

/// Handle /v1/predict endpoint
pub async fn handle_predict(
    State(state): State<AppState>,
    payload: Result<Json<RawPredictionRequest>, JsonRejection>,
) -> Result<Json<PredictionResult>, AppError> {
    let Json(raw) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    let request = state.predictor.validate(raw)?;
    let result = state.predictor.predict(&request)?;

    info!(
        amount = result.predicted_amount,
        weather = %request.weather(),
        residents = request.residents(),
        "Prediction served"
    );

    if let Some(analytics) = &state.analytics {
        analytics.report(AnalyticsEvent::prediction(&request, &result));
    }

    Ok(Json(result))
}

#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    pub model_type: String,
    pub version: Option<String>,
    pub feature_names: Vec<String>,
    pub n_features: usize,
    pub currency_symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<String>,
}

/// Handle /v1/model endpoint
pub async fn model_info(State(state): State<AppState>) -> impl IntoResponse {
    let predictor = &state.predictor;
    let metadata = predictor.metadata();

    Json(ModelInfoResponse {
        model_type: predictor.model_name().to_string(),
        version: metadata.and_then(|m| m.version.clone()),
        feature_names: metadata
            .map(|m| m.feature_names.clone())
            .unwrap_or_else(|| FEATURE_NAMES.iter().map(|n| n.to_string()).collect()),
        n_features: predictor.n_features(),
        currency_symbol: predictor.currency_symbol().to_string(),
        loaded_at: metadata.map(|m| m.loaded_at.to_rfc3339()),
    })
}
