use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix, e.g. `BILL_PREDICTOR__SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "BILL_PREDICTOR";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub prediction: PredictionConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// "text" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    /// Path to the trained model artifact
    #[serde(default = "default_model_path")]
    pub path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PredictionConfig {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
        }
    }
}

/// Where analytics events go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsSinkKind {
    /// Emit a tracing event
    Log,
    /// POST JSON to `endpoint`
    Webhook,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_analytics_sink")]
    pub sink: AnalyticsSinkKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default = "default_analytics_timeout")]
    pub timeout_seconds: u64,
    /// Bounded queue size; events beyond it are dropped
    #[serde(default = "default_analytics_buffer")]
    pub buffer_size: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            sink: default_analytics_sink(),
            endpoint: None,
            timeout_seconds: default_analytics_timeout(),
            buffer_size: default_analytics_buffer(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_metrics_endpoint")]
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_metrics_endpoint(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_model_path() -> PathBuf {
    PathBuf::from("electricity_bill_model.json")
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

fn default_analytics_sink() -> AnalyticsSinkKind {
    AnalyticsSinkKind::Log
}

fn default_analytics_timeout() -> u64 {
    5
}

fn default_analytics_buffer() -> usize {
    1024
}

fn default_true() -> bool {
    true
}

fn default_metrics_endpoint() -> String {
    "/metrics".to_string()
}

/// Load configuration from `path` (optional) layered with environment variables
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.server.port == 0 {
        anyhow::bail!("Server port must be non-zero");
    }

    if cfg.server.host.parse::<std::net::IpAddr>().is_err() {
        anyhow::bail!("Server host '{}' is not a valid IP address", cfg.server.host);
    }

    match cfg.server.log_format.as_str() {
        "text" | "json" => {}
        other => anyhow::bail!("Invalid log format '{}', expected 'text' or 'json'", other),
    }

    if cfg.model.path.as_os_str().is_empty() {
        anyhow::bail!("Model path cannot be empty");
    }

    if cfg.prediction.currency_symbol.is_empty() {
        anyhow::bail!("Currency symbol cannot be empty");
    }

    if cfg.analytics.enabled {
        if cfg.analytics.buffer_size == 0 {
            anyhow::bail!("Analytics buffer size must be non-zero");
        }
        if cfg.analytics.timeout_seconds == 0 {
            anyhow::bail!("Analytics timeout must be non-zero");
        }
        if cfg.analytics.sink == AnalyticsSinkKind::Webhook {
            match cfg.analytics.endpoint.as_deref() {
                Some(url) if url.starts_with("http://") || url.starts_with("https://") => {}
                Some(url) => anyhow::bail!("Analytics endpoint '{}' must be an http(s) URL", url),
                None => anyhow::bail!("Analytics webhook sink requires an endpoint"),
            }
        }
    }

    if cfg.metrics.enabled && !cfg.metrics.endpoint.starts_with('/') {
        anyhow::bail!("Metrics endpoint must start with '/'");
    }

    Ok(())
}
