//! Encoder + predictor core
//!
//! A [`Predictor`] is built once at startup around a loaded model and is
//! never mutated afterwards. Callers share it by reference (an `Arc` inside
//! the HTTP state) and call [`Predictor::predict`] once per submission.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::encoder::{self, FeatureVector};
use crate::error::AppError;
use crate::metrics;
use crate::model::{self, ModelMetadata, RegressionModel};
use crate::models::{PredictionRequest, PredictionResult, RawPredictionRequest};

pub struct Predictor {
    model: Arc<dyn RegressionModel>,
    metadata: Option<ModelMetadata>,
    currency_symbol: String,
}

impl Predictor {
    /// Load the artifact at `path` and wrap it
    pub fn load(path: &Path, currency_symbol: &str) -> Result<Self, AppError> {
        let (model, metadata) = model::load_model(path)?;
        Ok(Self {
            model: Arc::new(model),
            metadata: Some(metadata),
            currency_symbol: currency_symbol.to_string(),
        })
    }

    /// Wrap an already constructed model
    pub fn with_model(model: Arc<dyn RegressionModel>, currency_symbol: &str) -> Self {
        Self {
            model,
            metadata: None,
            currency_symbol: currency_symbol.to_string(),
        }
    }

    pub fn metadata(&self) -> Option<&ModelMetadata> {
        self.metadata.as_ref()
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn n_features(&self) -> usize {
        self.model.n_features()
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    /// Run the model on an already encoded row
    pub fn predict_vector(&self, features: &FeatureVector) -> Result<f64, AppError> {
        let value = self.model.predict(features.as_slice())?;
        if !value.is_finite() {
            return Err(AppError::PredictionError(
                "model produced a non-finite value".to_string(),
            ));
        }

        if value < 0.0 {
            warn!(raw = value, "Model predicted a negative bill, clamping to zero");
            return Ok(0.0);
        }

        Ok(value)
    }

    /// Encode, predict and package the result
    pub fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, AppError> {
        let start = Instant::now();
        let features = encoder::encode(request);
        debug!(features = ?features.as_slice(), "Encoded prediction request");

        let outcome = self.predict_vector(&features);
        metrics::record_prediction(&outcome, start.elapsed());

        let amount = outcome?;
        Ok(PredictionResult::new(amount, request, &self.currency_symbol))
    }

    /// Parse a raw submission into a validated request
    pub fn validate(&self, raw: RawPredictionRequest) -> Result<PredictionRequest, AppError> {
        PredictionRequest::try_from(raw).inspect_err(|e| {
            debug!(error = %e, "Rejected prediction request");
            metrics::record_prediction_error(e.error_type());
        })
    }

    /// Validate a raw submission, then predict
    ///
    /// An invalid submission never reaches the model.
    pub fn predict_raw(&self, raw: RawPredictionRequest) -> Result<PredictionResult, AppError> {
        let request = self.validate(raw)?;
        self.predict(&request)
    }
}
