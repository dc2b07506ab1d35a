use serde::{Deserialize, Serialize};

use super::request::{PredictionRequest, Weather};

/// Days used to scale daily usage to a billing month
pub const DAYS_PER_BILLING_MONTH: u32 = 30;

/// Hours per day a running refrigerator contributes
pub const FRIDGE_HOURS_PER_DAY: u32 = 24;

/// Outcome of a single prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted monthly bill, rounded to 2 decimals
    pub predicted_amount: f64,
    pub currency_symbol: String,
    /// Human-readable amount, e.g. "₹1500.00"
    pub display: String,
    pub breakdown: UsageBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_analysis: Option<CostAnalysis>,
}

impl PredictionResult {
    /// Rounds `amount` once; every field is derived from the rounded value.
    pub fn new(amount: f64, request: &PredictionRequest, currency_symbol: &str) -> Self {
        let amount = round_currency(amount);
        Self {
            predicted_amount: amount,
            currency_symbol: currency_symbol.to_string(),
            display: format_amount(amount, currency_symbol),
            breakdown: UsageBreakdown::from(request),
            cost_analysis: CostAnalysis::compute(amount, request),
        }
    }
}

/// Inputs echoed back the way they are shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageBreakdown {
    pub fan_hours: u8,
    pub ac_hours: u8,
    pub geyser_hours: u8,
    /// "Always On" or "Off"
    pub refrigerator: String,
    pub residents: u8,
    pub weather: Weather,
    pub calculation_day: u8,
}

impl From<&PredictionRequest> for UsageBreakdown {
    fn from(request: &PredictionRequest) -> Self {
        let refrigerator = if request.fridge_on().is_on() {
            "Always On"
        } else {
            "Off"
        };

        Self {
            fan_hours: request.fan_hours(),
            ac_hours: request.ac_hours(),
            geyser_hours: request.geyser_hours(),
            refrigerator: refrigerator.to_string(),
            residents: request.residents(),
            weather: request.weather(),
            calculation_day: request.day_of_month(),
        }
    }
}

/// Approximate per-hour cost derived from the predicted amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostAnalysis {
    pub total_daily_hours: u32,
    pub monthly_hours: u32,
    pub avg_cost_per_hour: f64,
}

impl CostAnalysis {
    /// Returns `None` when no appliance is in use, since there is nothing to divide by.
    pub fn compute(amount: f64, request: &PredictionRequest) -> Option<Self> {
        let fridge_hours = if request.fridge_on().is_on() {
            FRIDGE_HOURS_PER_DAY
        } else {
            0
        };
        let total_daily_hours = u32::from(request.fan_hours())
            + u32::from(request.ac_hours())
            + u32::from(request.geyser_hours())
            + fridge_hours;

        if total_daily_hours == 0 {
            return None;
        }

        let monthly_hours = total_daily_hours * DAYS_PER_BILLING_MONTH;
        Some(Self {
            total_daily_hours,
            monthly_hours,
            avg_cost_per_hour: round_currency(amount / f64::from(monthly_hours)),
        })
    }
}

pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

pub fn format_amount(amount: f64, currency_symbol: &str) -> String {
    format!("{}{:.2}", currency_symbol, amount)
}
