use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::AppError;

/// Daily usage hours for a single appliance
pub const HOURS_RANGE: RangeInclusive<i64> = 0..=24;
pub const RESIDENTS_RANGE: RangeInclusive<i64> = 1..=15;
pub const DAY_OF_MONTH_RANGE: RangeInclusive<i64> = 1..=31;

/// Refrigerator status as selected in the form ("Yes" / "No")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FridgeStatus {
    #[serde(rename = "Yes")]
    On,
    #[serde(rename = "No")]
    Off,
}

impl FridgeStatus {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "Yes",
            Self::Off => "No",
        }
    }
}

impl FromStr for FridgeStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Yes" => Ok(Self::On),
            "No" => Ok(Self::Off),
            other => Err(AppError::InvalidInput(format!(
                "fridge_on must be \"Yes\" or \"No\", got {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for FridgeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Predominant weather in the household's area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weather {
    Cold,
    Moderate,
    Hot,
}

impl Weather {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cold => "Cold",
            Self::Moderate => "Moderate",
            Self::Hot => "Hot",
        }
    }
}

impl FromStr for Weather {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cold" => Ok(Self::Cold),
            "Moderate" => Ok(Self::Moderate),
            "Hot" => Ok(Self::Hot),
            other => Err(AppError::InvalidInput(format!(
                "weather must be one of Cold, Moderate, Hot, got {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Untrusted submission as it arrives from a caller
///
/// Every field is kept loose here so that range and lookup failures surface
/// as `InvalidInput` instead of a deserialization rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPredictionRequest {
    pub fan_hours: i64,
    pub ac_hours: i64,
    pub geyser_hours: i64,
    pub fridge_on: String,
    pub residents: i64,
    pub weather: String,
    #[serde(alias = "day")]
    pub day_of_month: i64,
}

/// Validated household usage readings
///
/// Only obtainable through [`PredictionRequest::new`] or `TryFrom<RawPredictionRequest>`,
/// so every instance satisfies the documented ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PredictionRequest {
    fan_hours: u8,
    ac_hours: u8,
    geyser_hours: u8,
    fridge_on: FridgeStatus,
    residents: u8,
    weather: Weather,
    day_of_month: u8,
}

impl PredictionRequest {
    pub fn new(
        fan_hours: i64,
        ac_hours: i64,
        geyser_hours: i64,
        fridge_on: FridgeStatus,
        residents: i64,
        weather: Weather,
        day_of_month: i64,
    ) -> Result<Self, AppError> {
        Ok(Self {
            fan_hours: check_range("fan_hours", fan_hours, &HOURS_RANGE)?,
            ac_hours: check_range("ac_hours", ac_hours, &HOURS_RANGE)?,
            geyser_hours: check_range("geyser_hours", geyser_hours, &HOURS_RANGE)?,
            fridge_on,
            residents: check_range("residents", residents, &RESIDENTS_RANGE)?,
            weather,
            day_of_month: check_range("day_of_month", day_of_month, &DAY_OF_MONTH_RANGE)?,
        })
    }

    pub fn fan_hours(&self) -> u8 {
        self.fan_hours
    }

    pub fn ac_hours(&self) -> u8 {
        self.ac_hours
    }

    pub fn geyser_hours(&self) -> u8 {
        self.geyser_hours
    }

    pub fn fridge_on(&self) -> FridgeStatus {
        self.fridge_on
    }

    pub fn residents(&self) -> u8 {
        self.residents
    }

    pub fn weather(&self) -> Weather {
        self.weather
    }

    pub fn day_of_month(&self) -> u8 {
        self.day_of_month
    }
}

impl TryFrom<RawPredictionRequest> for PredictionRequest {
    type Error = AppError;

    fn try_from(raw: RawPredictionRequest) -> Result<Self, Self::Error> {
        let fridge_on = raw.fridge_on.parse::<FridgeStatus>()?;
        let weather = raw.weather.parse::<Weather>()?;

        Self::new(
            raw.fan_hours,
            raw.ac_hours,
            raw.geyser_hours,
            fridge_on,
            raw.residents,
            weather,
            raw.day_of_month,
        )
    }
}

fn check_range(field: &str, value: i64, range: &RangeInclusive<i64>) -> Result<u8, AppError> {
    if !range.contains(&value) {
        return Err(AppError::InvalidInput(format!(
            "{} must be between {} and {}, got {}",
            field,
            range.start(),
            range.end(),
            value
        )));
    }

    u8::try_from(value).map_err(|_| AppError::InvalidInput(format!("{} out of range", field)))
}
