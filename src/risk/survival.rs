//! Post-trade survival walk.
//!
//! Starting from the live position, walk the technical levels in the adverse
//! direction and decide the risk to hold at each one: enough that the PnL
//! accumulated so far covers the breakeven requirement there, never less
//! than the risk already held, rounded out to whole lots. The walk stops at
//! the first level whose arrival would take PnL to the stop loss.

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::{Result, RiskError};
use crate::levels::LevelCrossing;
use crate::models::{RiskScheduleEntry, Side, SurvivalResult, TechnicalConfig, Termination};

use super::RiskEngine;

impl<L: LevelCrossing> RiskEngine<L> {
    /// Walk the adverse ladder from `current_price` for a position of signed
    /// risk `r0` that started at `starting_price`.
    ///
    /// `pnl_0` is PnL already booked in the trade. The entry price is written
    /// into the side's size-up anchor of the returned technical config.
    /// A flat position (`r0 == 0`) is rejected with [`RiskError::NoPosition`],
    /// and a `pnl_0` already at or past the stop loss with
    /// [`RiskError::StopLossBreached`].
    ///
    /// The walk runs to the last grid level in the adverse direction; `nbm`
    /// only bounds calibration, so the schedule can be longer than `nbm` levels.
    pub fn survival(
        &self,
        current_price: Decimal,
        r0: Decimal,
        technical: &TechnicalConfig,
        starting_price: Decimal,
        pnl_0: Decimal,
    ) -> Result<SurvivalResult> {
        let side = Side::from_risk(r0).ok_or(RiskError::NoPosition)?;
        if pnl_0 <= self.config.stop_loss {
            return Err(RiskError::StopLossBreached {
                pnl: pnl_0,
                stop_loss: self.config.stop_loss,
            });
        }
        let technical = technical.with_size_up(side, starting_price);

        let ladder = self.walk_ladder(side, current_price, starting_price);

        let tpp = self.config.ticks_per_point;
        let lot = self.config.lot_size;
        let stop_loss = self.config.stop_loss;

        let mut entries = Vec::with_capacity(ladder.len());
        entries.push(RiskScheduleEntry {
            price: ladder[0],
            risk: r0,
            delta_risk: Decimal::ZERO,
            pnl: pnl_0,
            breakeven_ticks: tpp * pnl_0 / r0,
        });

        let mut risk = r0;
        let mut pnl = pnl_0;
        let mut termination = Termination::LadderExhausted;

        for pair in ladder.windows(2) {
            let level = pair[1];
            let overflow = RiskError::Overflow { side, level };
            pnl = risk
                .checked_mul(level - pair[0])
                .and_then(|step| pnl.checked_add(step))
                .ok_or(overflow.clone())?;
            if pnl <= stop_loss {
                termination = Termination::StopLoss { breach_pnl: pnl };
                break;
            }

            let required = pnl
                .checked_div(self.curve.distance(level, &technical, tpp)?)
                .ok_or(overflow)?;
            let next = side.quantize(side.clamp(required, risk), lot);

            debug!(
                side = %side,
                level = %level,
                pnl = %pnl,
                required = %required,
                risk = %next,
                "Survival step"
            );

            entries.push(RiskScheduleEntry {
                price: level,
                risk: next,
                delta_risk: next - risk,
                pnl,
                breakeven_ticks: tpp * pnl / next,
            });
            risk = next;
        }

        let extreme_level = entries[entries.len() - 1].price;
        let ticks_to_extreme = self.config.price_to_ticks((extreme_level - current_price).abs());

        info!(
            side = %side,
            current_price = %current_price,
            r0 = %r0,
            levels = entries.len(),
            extreme_level = %extreme_level,
            ticks_to_extreme = %ticks_to_extreme,
            "Survival walk complete"
        );

        Ok(SurvivalResult {
            side,
            current_price,
            entries,
            extreme_level,
            ticks_to_extreme,
            termination,
            technical,
        })
    }

    /// Levels from the farther of entry and current price out to the end of
    /// the grid, with the current price always first.
    fn walk_ladder(&self, side: Side, current_price: Decimal, starting_price: Decimal) -> Vec<Decimal> {
        let start = side.farther(starting_price, current_price) + side.sign() * self.config.walk_buffer;
        let end = match side {
            Side::Long => self.levels.lowest(),
            Side::Short => self.levels.highest(),
        };

        let mut ladder = match end {
            Some(end) if !side.is_beyond(start, end) => self.levels.levels_crossed(start, end),
            _ => Vec::new(),
        };

        if ladder.first() != Some(&current_price) {
            ladder.insert(0, current_price);
        }
        ladder
    }
}
