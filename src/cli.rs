use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bill-predictor", version, about = "Electricity bill predictor")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the prediction server (default)
    Start,

    /// Predict a single bill from the command line
    Predict(PredictArgs),

    /// Validate the configuration and load the model
    Test,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
}

#[derive(clap::Args, Debug, Clone)]
pub struct PredictArgs {
    /// Fan usage (hours/day, 0-24)
    #[arg(long, default_value = "5", allow_negative_numbers = true)]
    pub fan_hours: i64,

    /// AC usage (hours/day, 0-24)
    #[arg(long, default_value = "2", allow_negative_numbers = true)]
    pub ac_hours: i64,

    /// Geyser usage (hours/day, 0-24)
    #[arg(long, default_value = "1", allow_negative_numbers = true)]
    pub geyser_hours: i64,

    /// Is the refrigerator running? (Yes / No)
    #[arg(long, default_value = "Yes")]
    pub fridge_on: String,

    /// Number of residents (1-15)
    #[arg(long, default_value = "4", allow_negative_numbers = true)]
    pub residents: i64,

    /// Predominant weather (Cold / Moderate / Hot)
    #[arg(long, default_value = "Moderate")]
    pub weather: String,

    /// Day of month (1-31)
    #[arg(long = "day", default_value = "15", allow_negative_numbers = true)]
    pub day_of_month: i64,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Get the command to execute, defaulting to Start if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Start)
    }
}

impl Commands {
    /// Whether the command reads the configuration file
    pub fn needs_config(&self) -> bool {
        !matches!(self, Commands::Version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_start() {
        let cli = Cli {
            config: PathBuf::from("config.toml"),
            command: None,
        };

        assert!(matches!(cli.get_command(), Commands::Start));
    }

    #[test]
    fn test_cli_parsing_predict_defaults() {
        let cli = Cli::try_parse_from(["bill-predictor", "predict"]).unwrap();

        match cli.get_command() {
            Commands::Predict(args) => {
                assert_eq!(args.fan_hours, 5);
                assert_eq!(args.ac_hours, 2);
                assert_eq!(args.geyser_hours, 1);
                assert_eq!(args.fridge_on, "Yes");
                assert_eq!(args.residents, 4);
                assert_eq!(args.weather, "Moderate");
                assert_eq!(args.day_of_month, 15);
                assert!(!args.json);
            }
            _ => panic!("Expected Predict command"),
        }
    }

    #[test]
    fn test_cli_parsing_predict_flags() {
        let cli = Cli::try_parse_from([
            "bill-predictor",
            "--config",
            "prod.toml",
            "predict",
            "--fridge-on",
            "No",
            "--weather",
            "Hot",
            "--day",
            "3",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("prod.toml"));
        match cli.get_command() {
            Commands::Predict(args) => {
                assert_eq!(args.fridge_on, "No");
                assert_eq!(args.weather, "Hot");
                assert_eq!(args.day_of_month, 3);
                assert!(args.json);
            }
            _ => panic!("Expected Predict command"),
        }
    }

    #[test]
    fn test_version_does_not_need_config() {
        let cli = Cli::try_parse_from(["bill-predictor", "--config", "broken.toml", "version"])
            .unwrap();
        assert!(!cli.get_command().needs_config());

        let cli = Cli::try_parse_from(["bill-predictor", "test"]).unwrap();
        assert!(cli.get_command().needs_config());
        assert!(Commands::Start.needs_config());
    }

    #[test]
    fn test_cli_parsing_config_show() {
        let cli = Cli::try_parse_from(["bill-predictor", "config", "show"]).unwrap();
        assert!(matches!(
            cli.get_command(),
            Commands::Config {
                action: ConfigCommands::Show
            }
        ));
    }
}
