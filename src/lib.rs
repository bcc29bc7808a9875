//! Local electricity market participant model with deterministic
//! demand and generation predictions.

/// Scenario configuration and presets.
pub mod config;
pub mod error;
/// Market-wide time axis and price predictions.
pub mod information;
pub mod market;
/// Participants, their parameters, predictions and operation containers.
pub mod participant;

pub use error::{MarketError, Result};
pub use market::Market;
