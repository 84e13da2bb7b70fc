//! Risk survival curve engine.
//!
//! Sizes a martingale-style futures position across a grid of technical
//! price levels so that the accumulated loss never passes a fixed stop-loss
//! budget, while each added lot is sized to reach breakeven on a modest
//! retracement.

pub mod error;
pub mod levels;
pub mod models;
pub mod risk;

pub use error::{PriceParseError, Result, RiskError};
pub use levels::{LevelCrossing, TechLevelGrid};
pub use models::{
    decimal_to_price_string, price_to_decimal, PositionState, PriceInput, RiskSchedule,
    RiskSnapshot, Side, TechnicalConfig, TechnicalInput,
};
pub use risk::{BreakevenCurve, GridConfig, RiskConfig, RiskEngine};
