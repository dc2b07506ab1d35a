//! Command implementations for the CLI
//!
//! - start: Start the prediction server
//! - predict: One-shot prediction from command-line flags
//! - test: Validate configuration and model artifact
//! - config: Configuration display

pub mod config;
pub mod predict;
pub mod start;
pub mod test;
