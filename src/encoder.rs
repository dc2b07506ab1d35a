//! Input encoding
//!
//! Turns a validated [`PredictionRequest`] into the fixed-order numeric row the
//! regression model was trained on. The column order is a contract with the
//! model artifact; [`FEATURE_NAMES`] is what artifacts declaring their columns
//! are checked against.

use crate::models::{FridgeStatus, PredictionRequest, Weather};

pub const FEATURE_COUNT: usize = 7;

/// Column names in training order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Fan_Hours",
    "AC_Hours",
    "Geyser_Hours",
    "Fridge_On",
    "Residents",
    "Weather",
    "Day",
];

/// Encoded feature row, in [`FEATURE_NAMES`] order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

pub fn encode_fridge(status: FridgeStatus) -> f64 {
    match status {
        FridgeStatus::On => 1.0,
        FridgeStatus::Off => 0.0,
    }
}

pub fn encode_weather(weather: Weather) -> f64 {
    match weather {
        Weather::Cold => 1.0,
        Weather::Moderate => 2.0,
        Weather::Hot => 3.0,
    }
}

pub fn encode(request: &PredictionRequest) -> FeatureVector {
    FeatureVector([
        f64::from(request.fan_hours()),
        f64::from(request.ac_hours()),
        f64::from(request.geyser_hours()),
        encode_fridge(request.fridge_on()),
        f64::from(request.residents()),
        encode_weather(request.weather()),
        f64::from(request.day_of_month()),
    ])
}
