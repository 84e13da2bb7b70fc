//! Pre-trade calibration of the risk ladders on both sides of the price.
//!
//! For each side the ladder starts at a unit multiplier (+1 long, -1 short)
//! and grows it level by level so accumulated PnL covers the breakeven
//! requirement there, never letting it shrink. A single positive scale is
//! then solved so that the farthest level, plus a slippage allowance,
//! lands exactly on the stop loss.

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::{Result, RiskError};
use crate::levels::LevelCrossing;
use crate::models::{CalibratedLevel, CalibrationLadder, CalibrationResult, Side, TechnicalConfig};

use super::RiskEngine;

impl<L: LevelCrossing> RiskEngine<L> {
    /// Calibrate the long ladder below and the short ladder above `current_price`.
    ///
    /// Missing size-up anchors default to the current price; the filled-in
    /// anchors are returned in [`CalibrationResult::technical`].
    pub fn calibrate(
        &self,
        current_price: Decimal,
        technical: &TechnicalConfig,
    ) -> Result<CalibrationResult> {
        let technical = technical.with_default_size_ups(current_price);

        let below = self.calibrate_side(Side::Long, current_price, &technical)?;
        let above = self.calibrate_side(Side::Short, current_price, &technical)?;

        let nearest_below = below.nearest().ok_or(RiskError::EmptyLadder {
            side: Side::Long,
            from: current_price,
            to: current_price,
        })?;
        let nearest_above = above.nearest().ok_or(RiskError::EmptyLadder {
            side: Side::Short,
            from: current_price,
            to: current_price,
        })?;

        let result = CalibrationResult {
            r0_below: below.r0(),
            r0_above: above.r0(),
            nearest_below,
            nearest_above,
            below,
            above,
            technical,
        };

        info!(
            current_price = %current_price,
            r0_below = %result.r0_below,
            r0_above = %result.r0_above,
            levels_below = result.below.levels.len(),
            levels_above = result.above.levels.len(),
            "Calibrated risk ladders"
        );

        Ok(result)
    }

    fn calibrate_side(
        &self,
        side: Side,
        current_price: Decimal,
        technical: &TechnicalConfig,
    ) -> Result<CalibrationLadder> {
        let tpp = self.config.ticks_per_point;

        // Step back from the anchor so the anchor level itself is enumerated.
        let inner = technical.size_up(side)? + side.sign() * self.config.calibration_buffer;
        let far = side.adverse(current_price, self.config.ticks_to_price(self.config.nbm));

        let empty = RiskError::EmptyLadder {
            side,
            from: inner,
            to: far,
        };
        if !side.is_beyond(far, inner) {
            return Err(empty);
        }
        let prices = self.levels.levels_crossed(inner, far);
        let Some(&first) = prices.first() else {
            return Err(empty);
        };

        let mut unit = vec![CalibratedLevel {
            price: first,
            unit_risk: side.sign(),
            unit_pnl: Decimal::ZERO,
            risk: Decimal::ZERO,
        }];

        for pair in prices.windows(2) {
            let prev = unit[unit.len() - 1];
            let price = pair[1];

            let overflow = RiskError::Overflow { side, level: price };
            let unit_pnl = (price - pair[0])
                .checked_mul(prev.unit_risk)
                .and_then(|step| prev.unit_pnl.checked_add(step))
                .ok_or(overflow.clone())?;
            let required = unit_pnl
                .checked_div(self.curve.distance(price, technical, tpp)?)
                .ok_or(overflow)?;
            let unit_risk = side.clamp(required, prev.unit_risk);

            debug!(
                side = %side,
                level = %price,
                unit_pnl = %unit_pnl,
                unit_risk = %unit_risk,
                "Calibration step"
            );

            unit.push(CalibratedLevel {
                price,
                unit_risk,
                unit_pnl,
                risk: Decimal::ZERO,
            });
        }

        let last = unit[unit.len() - 1];
        let slippage = side.adverse(Decimal::ZERO, self.config.ticks_to_price(self.config.slippage_ticks));
        let budget_per_unit = last
            .unit_risk
            .checked_mul(slippage)
            .and_then(|slip| last.unit_pnl.checked_add(slip))
            .ok_or(RiskError::Overflow {
                side,
                level: last.price,
            })?;
        let scale = self
            .config
            .stop_loss
            .checked_div(budget_per_unit)
            .ok_or(RiskError::DegenerateCalibration {
                side,
                level: last.price,
            })?;

        for level in &mut unit {
            level.risk = scale.checked_mul(level.unit_risk).ok_or(RiskError::Overflow {
                side,
                level: level.price,
            })?;
        }

        Ok(CalibrationLadder {
            side,
            scale,
            levels: unit,
        })
    }
}
