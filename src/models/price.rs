//! Conversion between market tick strings and decimal prices.
//!
//! Treasury futures quote in 32nds of a point: `110'26` is 110 + 26/32.
//! An optional third digit splits the 32nd into quarters (`0`, `2`, `5`, `7`
//! for 0, 1/4, 1/2 and 3/4), so `110'265` is 110 + 26.5/32.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PriceParseError;

const THIRTY_SECONDS: Decimal = dec!(32);
const QUARTER_THIRTY_SECONDS: Decimal = dec!(128);
const FRACTION_DIGITS: [&str; 4] = ["", "2", "5", "7"];

/// Parse a tick string such as `111'02` or `110'265` into a decimal price.
pub fn price_to_decimal(tick: &str) -> Result<Decimal, PriceParseError> {
    let tick = tick.trim();
    if tick.is_empty() {
        return Err(PriceParseError::Empty);
    }

    let (handle, frac) = tick.split_once('\'').unwrap_or((tick, "00"));

    let handle: u32 = handle
        .parse()
        .map_err(|_| PriceParseError::Handle(tick.to_string()))?;

    if !(2..=3).contains(&frac.len()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PriceParseError::ThirtySeconds(tick.to_string()));
    }

    let thirty_seconds: u32 = frac[..2]
        .parse()
        .map_err(|_| PriceParseError::ThirtySeconds(tick.to_string()))?;
    if thirty_seconds > 31 {
        return Err(PriceParseError::ThirtySeconds(tick.to_string()));
    }

    let quarter = match frac.get(2..) {
        None | Some("") | Some("0") => Decimal::ZERO,
        Some("2") => dec!(0.25),
        Some("5") => dec!(0.5),
        Some("7") => dec!(0.75),
        Some(_) => return Err(PriceParseError::Fraction(tick.to_string())),
    };

    Ok(Decimal::from(handle) + (Decimal::from(thirty_seconds) + quarter) / THIRTY_SECONDS)
}

/// Render a decimal price in tick notation, rounded to the nearest quarter 32nd.
pub fn decimal_to_price_string(price: Decimal) -> String {
    let mut handle = price.floor();
    let mut quarters = ((price - handle) * QUARTER_THIRTY_SECONDS).round();
    if quarters >= QUARTER_THIRTY_SECONDS {
        handle += Decimal::ONE;
        quarters = Decimal::ZERO;
    }

    let quarters = quarters.to_u32().unwrap_or(0);
    let digit = FRACTION_DIGITS[(quarters % 4) as usize];

    format!("{}'{:02}{}", handle.normalize(), quarters / 4, digit)
}

/// A price as it arrives from a caller: already decimal, or in tick notation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Decimal(Decimal),
    Tick(String),
}

impl PriceInput {
    /// Resolve to a decimal price, parsing tick notation if needed.
    pub fn to_decimal(&self) -> Result<Decimal, PriceParseError> {
        match self {
            PriceInput::Decimal(price) => Ok(*price),
            PriceInput::Tick(tick) => price_to_decimal(tick),
        }
    }
}

impl From<Decimal> for PriceInput {
    fn from(price: Decimal) -> Self {
        PriceInput::Decimal(price)
    }
}

impl FromStr for PriceInput {
    type Err = PriceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PriceParseError::Empty);
        }
        if s.contains('\'') {
            // Validate eagerly so bad input fails where it was typed.
            price_to_decimal(s)?;
            return Ok(PriceInput::Tick(s.to_string()));
        }
        Decimal::from_str(s)
            .map(PriceInput::Decimal)
            .map_err(|_| PriceParseError::Decimal(s.to_string()))
    }
}

impl fmt::Display for PriceInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceInput::Decimal(price) => write!(f, "{}", price),
            PriceInput::Tick(tick) => f.write_str(tick),
        }
    }
}
