//! Results produced by calibration and the survival walk.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{decimal_to_price_string, Side, TechnicalConfig};

/// One level of a survival schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskScheduleEntry {
    /// Ladder price this entry applies at
    pub price: Decimal,

    /// Signed risk to hold once price reaches this level
    pub risk: Decimal,

    /// Change from the previous entry's risk
    pub delta_risk: Decimal,

    /// Cumulative trade PnL on arrival at this level
    pub pnl: Decimal,

    /// Breakeven distance in ticks implied by `pnl / risk`
    pub breakeven_ticks: Decimal,
}

/// Why a survival walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum Termination {
    /// The next level would have pushed PnL to or through the stop loss.
    StopLoss { breach_pnl: Decimal },
    /// The ladder ran out before the stop loss was reached.
    LadderExhausted,
}

/// Post-trade risk schedule for one direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalResult {
    pub side: Side,
    pub current_price: Decimal,

    /// Entries in walk order, starting at the current price
    pub entries: Vec<RiskScheduleEntry>,

    /// Last level recorded before the stop loss
    pub extreme_level: Decimal,
    pub ticks_to_extreme: Decimal,
    pub termination: Termination,

    /// Technical anchors with the entry price back-filled
    pub technical: TechnicalConfig,
}

impl SurvivalResult {
    /// Entry at the extreme level.
    pub fn last(&self) -> Option<&RiskScheduleEntry> {
        self.entries.last()
    }
}

/// One level of a calibration ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibratedLevel {
    pub price: Decimal,
    /// Signed multiplier before scaling (starts at +1 long, -1 short)
    pub unit_risk: Decimal,
    /// Cumulative PnL of the unit ladder on arrival at this level
    pub unit_pnl: Decimal,
    /// `scale * unit_risk`
    pub risk: Decimal,
}

/// Calibrated risk ladder for one side of the current price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationLadder {
    pub side: Side,
    /// Positive factor that makes the farthest level exhaust the stop loss
    pub scale: Decimal,
    pub levels: Vec<CalibratedLevel>,
}

impl CalibrationLadder {
    /// Signed risk at the nearest level.
    pub fn r0(&self) -> Decimal {
        self.scale * self.side.sign()
    }

    pub fn nearest(&self) -> Option<Decimal> {
        self.levels.first().map(|l| l.price)
    }

    pub fn farthest(&self) -> Option<&CalibratedLevel> {
        self.levels.last()
    }
}

/// Pre-trade calibration of both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    pub below: CalibrationLadder,
    pub above: CalibrationLadder,
    pub r0_below: Decimal,
    pub r0_above: Decimal,
    pub nearest_below: Decimal,
    pub nearest_above: Decimal,

    /// Technical anchors with missing size-up prices defaulted
    pub technical: TechnicalConfig,
}

impl CalibrationResult {
    /// Merged level to risk map. A level on both ladders keeps the short-side value.
    pub fn risk_by_level(&self) -> BTreeMap<Decimal, Decimal> {
        self.below
            .levels
            .iter()
            .chain(self.above.levels.iter())
            .map(|l| (l.price, l.risk))
            .collect()
    }
}

/// Which path produced a combined schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum ScheduleMode {
    /// Flat: calibrated opening risk on both sides
    PreTrade { r0_below: Decimal, r0_above: Decimal },
    /// Position on: one survival walk
    Active { side: Side, r0: Decimal },
}

/// Display row of a combined schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub price: Decimal,
    /// Price in tick notation
    pub quote: String,
    pub delta_lots: Decimal,
    pub risk_lots: Decimal,
    /// Dollar value of one tick at this risk
    pub risk_per_tick: Decimal,
    pub pnl: Decimal,
    pub breakeven_ticks: Decimal,
}

impl ScheduleRow {
    pub fn from_entry(entry: &RiskScheduleEntry, lot_size: Decimal, ticks_per_point: Decimal) -> Self {
        Self {
            price: entry.price,
            quote: decimal_to_price_string(entry.price),
            delta_lots: entry.delta_risk / lot_size,
            risk_lots: entry.risk / lot_size,
            risk_per_tick: entry.risk / ticks_per_point,
            pnl: entry.pnl,
            breakeven_ticks: entry.breakeven_ticks,
        }
    }

    /// Side whose risk this row holds.
    pub fn side(&self) -> Option<Side> {
        Side::from_risk(self.risk_lots)
    }
}

/// Combined risk schedule, rows sorted by price from high to low.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSchedule {
    pub mode: ScheduleMode,
    pub rows: Vec<ScheduleRow>,
    pub technical: TechnicalConfig,
}

/// A schedule stamped with the time it was computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSnapshot {
    pub timestamp: DateTime<Utc>,
    pub current_price: Decimal,
    pub schedule: RiskSchedule,
}

impl RiskSnapshot {
    pub fn new(current_price: Decimal, schedule: RiskSchedule) -> Self {
        Self {
            timestamp: Utc::now(),
            current_price,
            schedule,
        }
    }
}

impl fmt::Display for RiskSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n{:=^78}", " RISK SCHEDULE ")?;
        writeln!(f, "Computed: {}", self.timestamp.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(
            f,
            "Current:  {} ({})",
            decimal_to_price_string(self.current_price),
            self.current_price
        )?;
        match self.schedule.mode {
            ScheduleMode::PreTrade { r0_below, r0_above } => {
                writeln!(f, "Mode:     pre-trade (R0 below {:.0}, R0 above {:.0})", r0_below, r0_above)?;
            }
            ScheduleMode::Active { side, r0 } => {
                writeln!(f, "Mode:     active {} (R0 {:.0})", side, r0)?;
            }
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:<10} {:>8} {:>8} {:>12} {:>14} {:>12}",
            "PRICE", "DELTA", "LOTS", "$/TICK", "PNL", "BE TICKS"
        )?;
        writeln!(f, "{}", "-".repeat(78))?;
        for row in &self.schedule.rows {
            writeln!(
                f,
                "{:<10} {:>8} {:>8} {:>12.2} {:>14.2} {:>12.2}",
                row.quote,
                row.delta_lots.normalize(),
                row.risk_lots.normalize(),
                row.risk_per_tick,
                row.pnl,
                row.breakeven_ticks
            )?;
        }
        write!(f, "{:=^78}", "")
    }
}
