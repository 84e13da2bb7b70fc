//! Error types for the risk engine.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::Side;

pub type Result<T> = std::result::Result<T, RiskError>;

/// Failure to read a price written in market tick notation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceParseError {
    #[error("empty price string")]
    Empty,

    #[error("invalid price handle in {0:?}")]
    Handle(String),

    #[error("invalid 32nds field in {0:?} (expected 00-31)")]
    ThirtySeconds(String),

    #[error("invalid fraction digit in {0:?} (expected 0, 2, 5 or 7)")]
    Fraction(String),

    #[error("invalid decimal price {0:?}")]
    Decimal(String),
}

/// Everything the engine can reject.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    /// A tick string that could not be converted to a decimal price.
    #[error("malformed price: {0}")]
    MalformedPrice(#[from] PriceParseError),

    #[error("technical anchor {0} is not set")]
    MissingAnchor(&'static str),

    #[error(
        "technical anchors out of order: support={support} size_up_long={size_up_long} \
         size_up_short={size_up_short} resistance={resistance}"
    )]
    AnchorOrder {
        support: Decimal,
        size_up_long: Decimal,
        size_up_short: Decimal,
        resistance: Decimal,
    },

    /// Price strictly between the two size-up anchors, where the curve has no value.
    #[error("price {price} is inside the breakeven dead zone ({size_up_long}, {size_up_short})")]
    DeadZone {
        price: Decimal,
        size_up_long: Decimal,
        size_up_short: Decimal,
    },

    #[error("breakeven is zero at level {0}")]
    ZeroBreakeven(Decimal),

    #[error("{side} calibration has a zero stop-loss denominator at level {level}")]
    DegenerateCalibration { side: Side, level: Decimal },

    /// Ladder arithmetic left the range of `Decimal`, typically a very long ladder.
    #[error("{side} ladder arithmetic overflowed at level {level}")]
    Overflow { side: Side, level: Decimal },

    #[error("no {side} levels between {from} and {to}")]
    EmptyLadder { side: Side, from: Decimal, to: Decimal },

    /// Survival walk asked for with a flat position.
    #[error("no active position: initial risk is zero")]
    NoPosition,

    #[error("PnL {pnl} is already at or past the stop loss {stop_loss}")]
    StopLossBreached { pnl: Decimal, stop_loss: Decimal },

    #[error("active position without an entry price")]
    MissingEntryPrice,

    #[error("invalid configuration: {0}")]
    Config(String),
}
