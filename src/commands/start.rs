use anyhow::Result;
use bill_predictor::{config::Config, server};
use colored::Colorize;
use tracing::info;

/// Execute the start command
///
/// Loads the model and blocks serving requests until a shutdown signal.
pub async fn execute(cfg: Config) -> Result<()> {
    println!("{}", "Starting bill predictor...".green());
    info!(
        host = %cfg.server.host,
        port = cfg.server.port,
        model = %cfg.model.path.display(),
        "Starting bill predictor"
    );

    server::start_server(cfg).await?;

    Ok(())
}
