/// Webhook analytics delivery and its isolation from the prediction path
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use bill_predictor::{
    analytics::{AnalyticsEvent, AnalyticsReporter, AnalyticsSink, WebhookSink},
    config::Config,
    handlers::predict::AppState,
    model::LinearModel,
    models::{FridgeStatus, PredictionRequest, PredictionResult, Weather},
    predictor::Predictor,
    server::create_router,
};
use httpmock::prelude::*;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::ServiceExt;

fn sample_event() -> AnalyticsEvent {
    let request = PredictionRequest::new(5, 2, 1, FridgeStatus::On, 4, Weather::Hot, 15).unwrap();
    let result = PredictionResult::new(1500.0, &request, "₹");
    AnalyticsEvent::prediction(&request, &result)
}

#[tokio::test]
async fn test_webhook_sink_posts_event() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/collect");
            then.status(204);
        })
        .await;

    let sink = WebhookSink::new(server.url("/collect"), Duration::from_secs(2)).unwrap();
    sink.report(&sample_event()).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_webhook_sink_reports_error_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/collect");
            then.status(500);
        })
        .await;

    let sink = WebhookSink::new(server.url("/collect"), Duration::from_secs(2)).unwrap();
    assert!(sink.report(&sample_event()).await.is_err());
}

#[tokio::test]
async fn test_failing_collector_does_not_affect_prediction() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/collect");
            then.status(503);
        })
        .await;

    let sink = WebhookSink::new(server.url("/collect"), Duration::from_secs(2)).unwrap();
    let model = LinearModel::new(vec![10.0, 50.0, 30.0, 200.0, 40.0, 25.0, 1.0], 100.0).unwrap();
    let state = AppState {
        predictor: Arc::new(Predictor::with_model(Arc::new(model), "₹")),
        analytics: Some(AnalyticsReporter::new(Arc::new(sink), 16)),
    };
    let app = create_router(&Config::default(), state, None);

    let body = serde_json::json!({
        "fan_hours": 5, "ac_hours": 2, "geyser_hours": 1, "fridge_on": "Yes",
        "residents": 4, "weather": "Moderate", "day_of_month": 15
    });
    let request = Request::builder()
        .method("POST")
        .uri("/v1/predict")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Delivery happens in the background
    tokio::time::sleep(Duration::from_millis(300)).await;
    mock.assert_async().await;
}

#[tokio::test]
async fn test_slow_collector_does_not_block_reporter() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/collect");
            then.status(200).delay(Duration::from_secs(1));
        })
        .await;

    let sink = WebhookSink::new(server.url("/collect"), Duration::from_millis(100)).unwrap();
    let reporter = AnalyticsReporter::new(Arc::new(sink), 1);

    let started = Instant::now();
    for _ in 0..10 {
        reporter.report(sample_event());
    }
    assert!(started.elapsed() < Duration::from_millis(100));

    // Let the timed-out deliveries drain; overflow was dropped
    tokio::time::sleep(Duration::from_millis(600)).await;
    let before = mock.calls_async().await;
    assert!((1..=2).contains(&before));

    reporter.report(sample_event());
    let mut after = before;
    for _ in 0..100 {
        after = mock.calls_async().await;
        if after > before {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(after, before + 1);
}
