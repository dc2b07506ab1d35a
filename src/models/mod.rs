//! Request and response types exchanged with callers

pub mod request;
pub mod response;

pub use request::{FridgeStatus, PredictionRequest, RawPredictionRequest, Weather};
pub use response::{CostAnalysis, PredictionResult, UsageBreakdown};
