//! Risk sizing: breakeven curve, calibration, survival walk and the combined schedule.

mod breakeven;
mod calibration;
mod config;
mod engine;
mod schedule;
mod survival;

pub use breakeven::BreakevenCurve;
pub use config::{GridConfig, RiskConfig};
pub use engine::RiskEngine;
