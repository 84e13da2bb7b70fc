//! Data models for prices, technical anchors, positions and risk schedules.

mod position;
mod price;
mod schedule;
mod side;
mod technical;

pub use position::PositionState;
pub use price::{decimal_to_price_string, price_to_decimal, PriceInput};
pub use schedule::{
    CalibratedLevel, CalibrationLadder, CalibrationResult, RiskSchedule, RiskScheduleEntry,
    RiskSnapshot, ScheduleMode, ScheduleRow, SurvivalResult, Termination,
};
pub use side::Side;
pub use technical::{TechnicalConfig, TechnicalInput};
