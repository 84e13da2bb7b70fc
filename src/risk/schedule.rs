//! Combined risk schedule for whatever the position currently is.
//!
//! Flat: calibrate both sides, round the opening risk to whole lots and
//! walk each side from its nearest level. In a trade: walk the position's
//! side from the current price.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::info;

use crate::error::{Result, RiskError};
use crate::levels::LevelCrossing;
use crate::models::{
    PositionState, RiskSchedule, RiskScheduleEntry, RiskSnapshot, ScheduleMode, ScheduleRow,
    TechnicalConfig,
};

use super::RiskEngine;

impl<L: LevelCrossing> RiskEngine<L> {
    /// Risk schedule for `position` at `current_price`.
    pub fn schedule(
        &self,
        current_price: Decimal,
        position: &PositionState,
        technical: &TechnicalConfig,
    ) -> Result<RiskSchedule> {
        let lot = self.config.lot_size;

        let (mode, entries, technical) = match position.side() {
            None => {
                let calibration = self.calibrate(current_price, technical)?;

                // At least one lot each way, rounded toward the calibrated size.
                let r0_below = (calibration.r0_below.max(lot) / lot).floor() * lot;
                let r0_above = (calibration.r0_above.min(-lot) / lot).ceil() * lot;

                let long = self.survival(
                    calibration.nearest_below,
                    r0_below,
                    &calibration.technical,
                    current_price,
                    Decimal::ZERO,
                )?;
                let short = self.survival(
                    calibration.nearest_above,
                    r0_above,
                    &long.technical,
                    current_price,
                    Decimal::ZERO,
                )?;

                let mut entries = long.entries;
                entries.extend(short.entries);
                (
                    ScheduleMode::PreTrade { r0_below, r0_above },
                    entries,
                    short.technical,
                )
            }
            Some(side) => {
                let entry_price = position.entry_price.ok_or(RiskError::MissingEntryPrice)?;
                let r0 = position.risk(lot);
                let walk = self.survival(
                    current_price,
                    r0,
                    technical,
                    entry_price,
                    position.realized_pnl,
                )?;
                (ScheduleMode::Active { side, r0 }, walk.entries, walk.technical)
            }
        };

        let rows = self.rows(entries);
        info!(
            current_price = %current_price,
            mode = ?mode,
            rows = rows.len(),
            "Risk schedule built"
        );

        Ok(RiskSchedule {
            mode,
            rows,
            technical,
        })
    }

    /// Schedule stamped with the current time.
    pub fn snapshot(
        &self,
        current_price: Decimal,
        position: &PositionState,
        technical: &TechnicalConfig,
    ) -> Result<RiskSnapshot> {
        let schedule = self.schedule(current_price, position, technical)?;
        Ok(RiskSnapshot::new(current_price, schedule))
    }

    /// One row per price, highest first. A later entry at the same price replaces an earlier one.
    fn rows(&self, entries: Vec<RiskScheduleEntry>) -> Vec<ScheduleRow> {
        let by_price: BTreeMap<Decimal, RiskScheduleEntry> =
            entries.into_iter().map(|e| (e.price, e)).collect();

        by_price
            .values()
            .rev()
            .map(|e| ScheduleRow::from_entry(e, self.config.lot_size, self.config.ticks_per_point))
            .collect()
    }
}
