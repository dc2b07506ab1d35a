use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A submitted field is out of range or not in its lookup table
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Model artifact missing or failed to load
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),
    /// The model call itself failed
    #[error("Prediction failed: {0}")]
    PredictionError(String),
    /// Internal server error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    /// Stable machine-readable name, used in response bodies and metric labels
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::ModelUnavailable(_) => "model_unavailable",
            Self::PredictionError(_) => "prediction_error",
            Self::InternalError(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::PredictionError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "type": self.error_type(),
            }
        }));

        (self.status_code(), body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = AppError::InvalidInput("fridge_on must be Yes or No".to_string());
        assert_eq!(error.to_string(), "Invalid input: fridge_on must be Yes or No");
    }

    #[test]
    fn test_error_type_name() {
        assert_eq!(AppError::InvalidInput("x".to_string()).error_type(), "invalid_input");
        assert_eq!(
            AppError::ModelUnavailable("x".to_string()).error_type(),
            "model_unavailable"
        );
        assert_eq!(
            AppError::PredictionError("x".to_string()).error_type(),
            "prediction_error"
        );
    }

    #[test]
    fn test_from_anyhow_is_internal() {
        let error: AppError = anyhow::anyhow!("boom").into();
        assert!(matches!(error, AppError::InternalError(_)));
    }

    #[tokio::test]
    async fn test_error_response_status() {
        let response = AppError::InvalidInput("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::ModelUnavailable("gone".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = AppError::PredictionError("shape".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
