use anyhow::{bail, Result};
use bill_predictor::{config::Config, encoder::FEATURE_COUNT, predictor::Predictor};
use colored::Colorize;
use std::path::Path;
use tracing::info;

/// Execute the test command
///
/// Validates the configuration (already loaded by the caller) and loads the
/// model artifact without starting the server
pub fn execute(config_path: &Path, cfg: &Config) -> Result<()> {
    println!("{}", "Testing configuration...".yellow());
    info!(config = %config_path.display(), "Validating configuration and model");

    let predictor = Predictor::load(&cfg.model.path, &cfg.prediction.currency_symbol)?;
    check_model_width(&predictor)?;

    println!("{}", "✓ Configuration test successful".green());
    println!();

    println!("{}", "Configuration Summary:".bold());
    println!("  {}: {}", "Config File".cyan(), config_path.display());
    println!("  {}: {}:{}", "Server".cyan(), cfg.server.host, cfg.server.port);
    println!("  {}: {}", "Log Level".cyan(), cfg.server.log_level);
    println!("  {}: {}", "Log Format".cyan(), cfg.server.log_format);
    println!();

    println!("  {}: {}", "Model".cyan(), cfg.model.path.display());
    println!("    Type: {}", predictor.model_name());
    println!("    Features: {}", predictor.n_features());
    if let Some(version) = predictor.metadata().and_then(|m| m.version.as_deref()) {
        println!("    Version: {}", version);
    }
    println!("  {}: {}", "Currency".cyan(), predictor.currency_symbol());
    println!();

    println!(
        "  {}: {}",
        "Analytics".cyan(),
        if cfg.analytics.enabled {
            "enabled".green()
        } else {
            "disabled".red()
        }
    );
    if cfg.analytics.enabled {
        println!("    Sink: {:?}", cfg.analytics.sink);
        if let Some(endpoint) = &cfg.analytics.endpoint {
            println!("    Endpoint: {}", endpoint);
        }
    }

    println!(
        "  {}: {}",
        "Metrics".cyan(),
        if cfg.metrics.enabled {
            "enabled".green()
        } else {
            "disabled".red()
        }
    );
    if cfg.metrics.enabled {
        println!("    Endpoint: {}", cfg.metrics.endpoint);
    }

    info!("Configuration validation completed successfully");
    Ok(())
}

/// A model whose width differs from the encoder loads, but cannot predict
fn check_model_width(predictor: &Predictor) -> Result<()> {
    if predictor.n_features() != FEATURE_COUNT {
        bail!(
            "model expects {} features, but requests encode to {}; every prediction would fail",
            predictor.n_features(),
            FEATURE_COUNT
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bill_predictor::model::LinearModel;
    use std::io::Write;
    use std::sync::Arc;

    #[test]
    fn test_check_model_width_accepts_encoder_width() {
        let model = LinearModel::new(vec![1.0; FEATURE_COUNT], 0.0).unwrap();
        let predictor = Predictor::with_model(Arc::new(model), "₹");
        assert!(check_model_width(&predictor).is_ok());
    }

    #[test]
    fn test_check_model_width_rejects_mismatch() {
        let model = LinearModel::new(vec![1.0; 6], 0.0).unwrap();
        let predictor = Predictor::with_model(Arc::new(model), "₹");
        let err = check_model_width(&predictor).unwrap_err();
        assert!(err.to_string().contains("expects 6 features"));
    }

    #[test]
    fn test_execute_fails_for_artifact_without_names_and_wrong_width() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"model_type": "linear_regression", "coefficients": [1, 2, 3, 4, 5, 6], "intercept": 10.0}}"#
        )
        .unwrap();

        let mut cfg = Config::default();
        cfg.model.path = file.path().to_path_buf();
        assert!(execute(Path::new("config.toml"), &cfg).is_err());
    }
}
