//! Best-effort analytics reporting
//!
//! Prediction handlers hand an [`AnalyticsEvent`] to an [`AnalyticsReporter`],
//! which queues it on a bounded channel. A background task delivers events to
//! the configured [`AnalyticsSink`]. Nothing here can fail a prediction: a full
//! queue, a sink error or a sink panic is logged and the event is dropped.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::config::{AnalyticsConfig, AnalyticsSinkKind};
use crate::metrics;
use crate::models::{response::round_currency, PredictionRequest, PredictionResult, Weather};

pub const PREDICTION_EVENT: &str = "bill_prediction";
pub const PREDICTION_CATEGORY: &str = "prediction";
pub const PREDICTION_LABEL: &str = "electricity_bill";

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("analytics request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("analytics endpoint returned {0}")]
    Status(reqwest::StatusCode),
    #[error("analytics sink misconfigured: {0}")]
    Config(String),
}

/// Payload fields attached to a prediction event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionEventParams {
    pub fan_hours: u8,
    pub ac_hours: u8,
    pub geyser_hours: u8,
    pub residents: u8,
    pub weather: Weather,
    pub predicted_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub event_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub category: String,
    pub label: String,
    pub params: PredictionEventParams,
}

impl AnalyticsEvent {
    pub fn prediction(request: &PredictionRequest, result: &PredictionResult) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            name: PREDICTION_EVENT.to_string(),
            category: PREDICTION_CATEGORY.to_string(),
            label: PREDICTION_LABEL.to_string(),
            params: PredictionEventParams {
                fan_hours: request.fan_hours(),
                ac_hours: request.ac_hours(),
                geyser_hours: request.geyser_hours(),
                residents: request.residents(),
                weather: request.weather(),
                predicted_amount: round_currency(result.predicted_amount),
            },
        }
    }
}

/// Outbound event sink
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    async fn report(&self, event: &AnalyticsEvent) -> Result<(), AnalyticsError>;

    fn name(&self) -> &'static str;
}

/// Writes events to the tracing log
pub struct LogSink;

#[async_trait]
impl AnalyticsSink for LogSink {
    async fn report(&self, event: &AnalyticsEvent) -> Result<(), AnalyticsError> {
        tracing::info!(
            target: "analytics",
            event_id = %event.event_id,
            event = %event.name,
            category = %event.category,
            label = %event.label,
            fan_hours = event.params.fan_hours,
            ac_hours = event.params.ac_hours,
            geyser_hours = event.params.geyser_hours,
            residents = event.params.residents,
            weather = %event.params.weather,
            predicted_amount = event.params.predicted_amount,
            "Analytics event"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// POSTs each event as JSON to a collector URL
pub struct WebhookSink {
    client: reqwest::Client,
    endpoint: String,
}

impl WebhookSink {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, AnalyticsError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl AnalyticsSink for WebhookSink {
    async fn report(&self, event: &AnalyticsEvent) -> Result<(), AnalyticsError> {
        let response = self.client.post(&self.endpoint).json(event).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalyticsError::Status(status));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "webhook"
    }
}

/// Build the sink described by the configuration
pub fn build_sink(config: &AnalyticsConfig) -> Result<Arc<dyn AnalyticsSink>, AnalyticsError> {
    match config.sink {
        AnalyticsSinkKind::Log => Ok(Arc::new(LogSink)),
        AnalyticsSinkKind::Webhook => {
            let endpoint = config.endpoint.clone().ok_or_else(|| {
                AnalyticsError::Config("webhook sink requires an endpoint".to_string())
            })?;
            let sink = WebhookSink::new(endpoint, Duration::from_secs(config.timeout_seconds))?;
            Ok(Arc::new(sink))
        }
    }
}

/// Fire-and-forget front of an [`AnalyticsSink`]
///
/// Must be created inside a Tokio runtime.
#[derive(Clone)]
pub struct AnalyticsReporter {
    tx: mpsc::Sender<AnalyticsEvent>,
}

impl AnalyticsReporter {
    pub fn new(sink: Arc<dyn AnalyticsSink>, buffer_size: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<AnalyticsEvent>(buffer_size.max(1));

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let delivery = std::panic::AssertUnwindSafe(sink.report(&event))
                    .catch_unwind()
                    .await;
                match delivery {
                    Ok(Ok(())) => metrics::record_analytics_event("sent"),
                    Ok(Err(e)) => {
                        metrics::record_analytics_event("failed");
                        tracing::warn!(
                            event_id = %event.event_id,
                            sink = sink.name(),
                            error = %e,
                            "Failed to deliver analytics event"
                        );
                    }
                    Err(panic) => {
                        metrics::record_analytics_event("failed");
                        tracing::error!(
                            event_id = %event.event_id,
                            sink = sink.name(),
                            panic = ?panic,
                            "Analytics sink panicked"
                        );
                    }
                }
            }
            tracing::debug!("Analytics reporter channel closed");
        });

        Self { tx }
    }

    /// Queue an event without waiting; drops it if the queue is full or closed
    pub fn report(&self, event: AnalyticsEvent) {
        if let Err(e) = self.tx.try_send(event) {
            metrics::record_analytics_event("dropped");
            tracing::warn!(error = %e, "Dropping analytics event");
        }
    }
}
