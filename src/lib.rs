pub mod analytics;
pub mod config;
pub mod encoder;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod model;
pub mod models;
pub mod predictor;
pub mod server;
pub mod signals;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing/logging
///
/// `RUST_LOG` takes precedence over `default_level`. `log_format` is
/// "json" for structured output, anything else gives human-readable text.
/// Only the first call installs a subscriber; later calls are ignored.
pub fn init_tracing(default_level: &str, log_format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if log_format == "json" {
        registry.with(fmt::layer().json().with_target(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    if let Err(e) = result {
        eprintln!("Warning: tracing already initialized: {}", e);
    }
}
