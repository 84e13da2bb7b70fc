//! Piecewise-linear breakeven curve over the technical anchors.

use anyhow::Result as AnyResult;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RiskError};
use crate::models::TechnicalConfig;

use super::config::env_decimal;

/// Required breakeven distance, in ticks, as a function of price.
///
/// Below strong support the curve is flat at `-be_low`; it ramps linearly
/// to `-be_high` at the long size-up anchor. Mirrored above: `+be_high` at
/// the short size-up anchor ramping to `+be_low` at strong resistance and
/// flat beyond. Prices strictly between the two size-up anchors have no
/// value and are rejected as [`RiskError::DeadZone`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakevenCurve {
    pub be_low: Decimal,
    pub be_high: Decimal,
}

impl Default for BreakevenCurve {
    fn default() -> Self {
        Self {
            be_low: dec!(4),
            be_high: dec!(6),
        }
    }
}

impl BreakevenCurve {
    pub fn new(be_low: Decimal, be_high: Decimal) -> Self {
        Self { be_low, be_high }
    }

    /// Defaults overlaid with SUMO_BE_LOW / SUMO_BE_HIGH.
    pub fn from_env() -> AnyResult<Self> {
        let mut curve = Self::default();
        if let Some(v) = env_decimal("SUMO_BE_LOW")? {
            curve.be_low = v;
        }
        if let Some(v) = env_decimal("SUMO_BE_HIGH")? {
            curve.be_high = v;
        }
        Ok(curve)
    }

    /// Breakeven ticks at `price`, signed negative on the long side.
    pub fn evaluate(&self, price: Decimal, technical: &TechnicalConfig) -> Result<Decimal> {
        let support = technical.strong_support;
        let resistance = technical.strong_resistance;
        let long = technical.size_up_long()?;
        let short = technical.size_up_short()?;

        let ordered = support < resistance
            && (support..=resistance).contains(&long)
            && (support..=resistance).contains(&short);
        if !ordered {
            return Err(RiskError::AnchorOrder {
                support,
                size_up_long: long,
                size_up_short: short,
                resistance,
            });
        }

        // Flat tails first: a ramp is only reached when its width is non-zero.
        if price <= support {
            return Ok(-self.be_low);
        }
        if price >= resistance {
            return Ok(self.be_low);
        }

        if price <= long {
            let slope = (self.be_high - self.be_low) / (support - long);
            return Ok(-self.be_high + slope * (price - long));
        }

        if price >= short {
            let slope = (self.be_high - self.be_low) / (resistance - short);
            return Ok(-(-self.be_high + slope * (price - short)));
        }

        Err(RiskError::DeadZone {
            price,
            size_up_long: long,
            size_up_short: short,
        })
    }

    /// Breakeven expressed as a price distance, rejecting a zero value.
    pub(crate) fn distance(
        &self,
        price: Decimal,
        technical: &TechnicalConfig,
        ticks_per_point: Decimal,
    ) -> Result<Decimal> {
        let ticks = self.evaluate(price, technical)?;
        if ticks.is_zero() {
            return Err(RiskError::ZeroBreakeven(price));
        }
        Ok(ticks / ticks_per_point)
    }
}
