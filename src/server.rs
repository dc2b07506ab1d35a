use anyhow::Result;
use axum::{extract::DefaultBodyLimit, routing::{get, post}, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{
    analytics::{self, AnalyticsReporter},
    config::Config,
    handlers::{self, predict::AppState},
    metrics,
    predictor::Predictor,
    signals::setup_signal_handlers,
};

/// Submissions are a handful of small fields
const MAX_BODY_BYTES: usize = 16 * 1024;

/// Start the prediction server
///
/// This function:
/// 1. Loads the model artifact (fails before binding if it is unavailable)
/// 2. Initializes metrics and the analytics reporter
/// 3. Sets up signal handlers for graceful shutdown
/// 4. Binds to the configured address and serves requests
pub async fn start_server(config: Config) -> Result<()> {
    info!(path = %config.model.path.display(), "Loading model artifact");
    let predictor = Arc::new(Predictor::load(
        &config.model.path,
        &config.prediction.currency_symbol,
    )?);

    let metrics_handle = if config.metrics.enabled {
        info!("Initializing Prometheus metrics...");
        Some(Arc::new(metrics::init_metrics()?))
    } else {
        None
    };

    let app_state = AppState {
        predictor,
        analytics: build_analytics(&config),
    };

    let (shutdown_tx, signal_handle) = setup_signal_handlers();
    let mut shutdown_rx = shutdown_tx.subscribe();

    let app = create_router(&config, app_state, metrics_handle);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    info!("Starting bill predictor on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    signal_handle.await?;
    info!("Server stopped gracefully");

    Ok(())
}

/// Build the analytics reporter, or `None` when disabled or misconfigured
///
/// A broken analytics setup only disables reporting; predictions keep working.
pub fn build_analytics(config: &Config) -> Option<AnalyticsReporter> {
    if !config.analytics.enabled {
        info!("Analytics disabled");
        return None;
    }

    match analytics::build_sink(&config.analytics) {
        Ok(sink) => {
            info!(sink = sink.name(), "Analytics reporting enabled");
            Some(AnalyticsReporter::new(sink, config.analytics.buffer_size))
        }
        Err(e) => {
            warn!(error = %e, "Failed to build analytics sink, reporting disabled");
            None
        }
    }
}

/// Create the Axum router with all routes and middleware
pub fn create_router(
    config: &Config,
    app_state: AppState,
    metrics_handle: Option<Arc<PrometheusHandle>>,
) -> Router {
    let api_routes = Router::new()
        .route("/v1/predict", post(handlers::predict::handle_predict))
        .route("/v1/model", get(handlers::predict::model_info))
        .route("/ready", get(handlers::health::readiness_check))
        .with_state(app_state);

    let mut router = Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(api_routes);

    if let Some(handle) = metrics_handle {
        let metrics_routes = Router::new()
            .route(
                &config.metrics.endpoint,
                get(handlers::metrics_handler::metrics),
            )
            .with_state(handle);
        router = router.merge(metrics_routes);
    }

    router
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
}
