use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use bill_predictor::{config, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let command = args.get_command();

    if !command.needs_config() {
        println!("Bill Predictor v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let cfg = config::load_config(&args.config)?;
    init_tracing(&cfg.server.log_level, &cfg.server.log_format);

    match command {
        cli::Commands::Start => {
            commands::start::execute(cfg).await?;
        }
        cli::Commands::Predict(predict_args) => {
            commands::predict::execute(&cfg, predict_args)?;
        }
        cli::Commands::Test => {
            commands::test::execute(&args.config, &cfg)?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&cfg)?,
        },
        // Printed above, before the config is read
        cli::Commands::Version => {}
    }

    Ok(())
}
