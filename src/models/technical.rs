//! Technical anchor prices that shape the breakeven curve.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RiskError};

use super::{PriceInput, Side};

/// Technical anchors as supplied by the caller, in either price notation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalInput {
    pub strong_support: PriceInput,
    pub strong_resistance: PriceInput,
    #[serde(default)]
    pub size_up_long_price: Option<PriceInput>,
    #[serde(default)]
    pub size_up_short_price: Option<PriceInput>,
}

impl TechnicalInput {
    /// Convert every anchor to a decimal price.
    pub fn resolve(&self) -> Result<TechnicalConfig> {
        Ok(TechnicalConfig {
            strong_support: self.strong_support.to_decimal()?,
            strong_resistance: self.strong_resistance.to_decimal()?,
            size_up_long_price: self
                .size_up_long_price
                .as_ref()
                .map(PriceInput::to_decimal)
                .transpose()?,
            size_up_short_price: self
                .size_up_short_price
                .as_ref()
                .map(PriceInput::to_decimal)
                .transpose()?,
        })
    }
}

/// Technical anchors in decimal form.
///
/// Intended ordering is
/// `strong_support <= size_up_long <= current <= size_up_short <= strong_resistance`.
/// The engine never mutates a config in place; operations that back-fill
/// an anchor hand back an updated copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalConfig {
    pub strong_support: Decimal,
    pub strong_resistance: Decimal,
    pub size_up_long_price: Option<Decimal>,
    pub size_up_short_price: Option<Decimal>,
}

impl TechnicalConfig {
    pub fn new(
        strong_support: Decimal,
        size_up_long_price: Decimal,
        size_up_short_price: Decimal,
        strong_resistance: Decimal,
    ) -> Self {
        Self {
            strong_support,
            strong_resistance,
            size_up_long_price: Some(size_up_long_price),
            size_up_short_price: Some(size_up_short_price),
        }
    }

    pub fn size_up_long(&self) -> Result<Decimal> {
        self.size_up_long_price
            .ok_or(RiskError::MissingAnchor("size_up_long_price"))
    }

    pub fn size_up_short(&self) -> Result<Decimal> {
        self.size_up_short_price
            .ok_or(RiskError::MissingAnchor("size_up_short_price"))
    }

    /// Size-up anchor for the side that scales in on an adverse move.
    pub fn size_up(&self, side: Side) -> Result<Decimal> {
        match side {
            Side::Long => self.size_up_long(),
            Side::Short => self.size_up_short(),
        }
    }

    /// Copy with the side's size-up anchor replaced.
    pub fn with_size_up(mut self, side: Side, price: Decimal) -> Self {
        match side {
            Side::Long => self.size_up_long_price = Some(price),
            Side::Short => self.size_up_short_price = Some(price),
        }
        self
    }

    /// Copy with any missing size-up anchor defaulted to `price`.
    pub fn with_default_size_ups(mut self, price: Decimal) -> Self {
        self.size_up_long_price.get_or_insert(price);
        self.size_up_short_price.get_or_insert(price);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_resolve_mixed_notation() {
        let input = TechnicalInput {
            strong_support: PriceInput::Tick("110'26".to_string()),
            strong_resistance: PriceInput::Decimal(dec!(111.3125)),
            size_up_long_price: Some(PriceInput::Tick("111'00".to_string())),
            size_up_short_price: None,
        };

        let config = input.resolve().unwrap();
        assert_eq!(config.strong_support, dec!(110.8125));
        assert_eq!(config.strong_resistance, dec!(111.3125));
        assert_eq!(config.size_up_long_price, Some(dec!(111)));
        assert_eq!(config.size_up_short_price, None);
    }

    #[test]
    fn test_resolve_rejects_bad_tick() {
        let input = TechnicalInput {
            strong_support: PriceInput::Tick("110'40".to_string()),
            strong_resistance: PriceInput::Decimal(dec!(111.3125)),
            size_up_long_price: None,
            size_up_short_price: None,
        };
        assert!(matches!(input.resolve(), Err(RiskError::MalformedPrice(_))));
    }

    #[test]
    fn test_defaults_leave_caller_copy_untouched() {
        let original = TechnicalConfig {
            strong_support: dec!(110),
            strong_resistance: dec!(112),
            size_up_long_price: None,
            size_up_short_price: Some(dec!(111.5)),
        };

        let filled = original.with_default_size_ups(dec!(111));
        assert_eq!(filled.size_up_long_price, Some(dec!(111)));
        assert_eq!(filled.size_up_short_price, Some(dec!(111.5)));
        assert_eq!(original.size_up_long_price, None);

        let moved = filled.with_size_up(Side::Short, dec!(111.25));
        assert_eq!(moved.size_up_short(), Ok(dec!(111.25)));
        assert_eq!(
            original.size_up_long(),
            Err(RiskError::MissingAnchor("size_up_long_price"))
        );
    }
}
