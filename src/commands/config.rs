use anyhow::Result;
use bill_predictor::config::Config;
use tracing::info;

/// Execute the config show command
///
/// Prints the effective configuration (file + environment) as TOML
pub fn show(cfg: &Config) -> Result<()> {
    info!("Displaying effective configuration");

    println!("{}", render(cfg)?);
    Ok(())
}

fn render(cfg: &Config) -> Result<String> {
    Ok(toml::to_string_pretty(cfg)?)
}
