use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

use crate::error::AppError;

/// Install the global Prometheus recorder
///
/// Fails if a recorder is already installed (e.g., a second call in tests).
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;

    init_metric_descriptions();

    Ok(handle)
}

/// Initialize metric descriptions (can be called multiple times safely)
fn init_metric_descriptions() {
    describe_counter!(
        "bill_predictions_total",
        "Total number of prediction attempts by outcome"
    );
    describe_histogram!(
        "bill_prediction_duration_seconds",
        "Time spent encoding and running the model"
    );
    describe_counter!(
        "bill_prediction_errors_total",
        "Total number of failed predictions by error type"
    );
    describe_counter!(
        "bill_analytics_events_total",
        "Analytics events by delivery status"
    );
    describe_gauge!(
        "bill_predictor_info",
        "Predictor version and build information"
    );

    gauge!("bill_predictor_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record the outcome and latency of one model call
pub fn record_prediction(outcome: &Result<f64, AppError>, duration: Duration) {
    let label = match outcome {
        Ok(_) => "success",
        Err(_) => "error",
    };
    counter!("bill_predictions_total", "outcome" => label).increment(1);
    histogram!("bill_prediction_duration_seconds").record(duration.as_secs_f64());

    if let Err(e) = outcome {
        record_prediction_error(e.error_type());
    }
}

/// Record a failed prediction
pub fn record_prediction_error(error_type: &'static str) {
    counter!("bill_prediction_errors_total", "error_type" => error_type).increment(1);
}

/// Record an analytics event delivery status ("sent", "failed", "dropped")
pub fn record_analytics_event(status: &'static str) {
    counter!("bill_analytics_events_total", "status" => status).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_metrics() {
        init_metric_descriptions();

        record_prediction(&Ok(1500.0), Duration::from_micros(40));
        record_prediction(
            &Err(AppError::PredictionError("shape".to_string())),
            Duration::from_micros(10),
        );
        record_prediction_error("invalid_input");
        record_analytics_event("sent");

        // Without an installed recorder these are no-ops; just verify nothing panics
    }
}
