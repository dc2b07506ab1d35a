use anyhow::Result;
use bill_predictor::{
    config::Config,
    models::{PredictionResult, RawPredictionRequest},
    predictor::Predictor,
};
use colored::Colorize;
use tracing::info;

use crate::cli::PredictArgs;

/// Execute the predict command
///
/// Loads the model, predicts one bill from the flags and prints it
pub fn execute(cfg: &Config, args: PredictArgs) -> Result<()> {
    let predictor = Predictor::load(&cfg.model.path, &cfg.prediction.currency_symbol)?;

    let as_json = args.json;
    let result = predictor.predict_raw(to_raw(args))?;
    info!(amount = result.predicted_amount, "Prediction complete");

    if as_json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }

    Ok(())
}

fn to_raw(args: PredictArgs) -> RawPredictionRequest {
    RawPredictionRequest {
        fan_hours: args.fan_hours,
        ac_hours: args.ac_hours,
        geyser_hours: args.geyser_hours,
        fridge_on: args.fridge_on,
        residents: args.residents,
        weather: args.weather,
        day_of_month: args.day_of_month,
    }
}

fn print_result(result: &PredictionResult) {
    let symbol = &result.currency_symbol;
    let b = &result.breakdown;

    println!(
        "{} {}",
        "Estimated Monthly Bill:".bold(),
        result.display.green().bold()
    );
    println!();

    println!("{}", "Daily Appliance Usage:".cyan());
    println!("  Fan: {} hours/day", b.fan_hours);
    println!("  Air Conditioner: {} hours/day", b.ac_hours);
    println!("  Geyser: {} hours/day", b.geyser_hours);
    println!("  Refrigerator: {}", b.refrigerator);
    println!();

    println!("{}", "Household Information:".cyan());
    println!("  Number of Residents: {}", b.residents);
    println!("  Weather Condition: {}", b.weather);
    println!("  Calculation Day: {}", b.calculation_day);

    if let Some(analysis) = &result.cost_analysis {
        println!();
        println!("{}", "Estimated Cost Analysis:".cyan());
        println!("  Daily Usage: {} hours", analysis.total_daily_hours);
        println!("  Monthly Usage: {} hours", analysis.monthly_hours);
        println!("  Avg Cost/Hour: {}{:.2}", symbol, analysis.avg_cost_per_hour);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bill_predictor::error::AppError;
    use std::io::Write;

    fn args(fridge_on: &str) -> PredictArgs {
        PredictArgs {
            fan_hours: 5,
            ac_hours: 2,
            geyser_hours: 1,
            fridge_on: fridge_on.to_string(),
            residents: 4,
            weather: "Moderate".to_string(),
            day_of_month: 15,
            json: true,
        }
    }

    fn config_with_model(coefficients: &str) -> (tempfile::NamedTempFile, Config) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"model_type": "linear_regression", "coefficients": {}, "intercept": 100.0}}"#,
            coefficients
        )
        .unwrap();

        let mut cfg = Config::default();
        cfg.model.path = file.path().to_path_buf();
        (file, cfg)
    }

    #[test]
    fn test_execute_with_model() {
        let (_file, cfg) = config_with_model("[10, 50, 30, 200, 40, 25, 1]");
        assert!(execute(&cfg, args("Yes")).is_ok());
    }

    #[test]
    fn test_execute_rejects_invalid_fridge() {
        let (_file, cfg) = config_with_model("[10, 50, 30, 200, 40, 25, 1]");
        let err = execute(&cfg, args("Maybe")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_execute_without_model() {
        let mut cfg = Config::default();
        cfg.model.path = "/nonexistent/model.json".into();
        let err = execute(&cfg, args("Yes")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::ModelUnavailable(_))
        ));
    }
}
