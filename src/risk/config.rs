//! Risk engine configuration.

use std::str::FromStr;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RiskError;
use crate::levels::TechLevelGrid;

/// Parameters shared by calibration, the survival walk and the schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// PnL budget for the whole ladder (negative)
    pub stop_loss: Decimal,

    /// Calibration look-ahead from the current price, in ticks
    pub nbm: Decimal,

    /// Risk units per lot; every walked risk is a multiple of this
    pub lot_size: Decimal,

    /// Ticks of slippage assumed beyond the farthest calibrated level
    pub slippage_ticks: Decimal,

    /// Ticks in one price point
    pub ticks_per_point: Decimal,

    /// Added past the size-up anchor so the anchor itself is on the calibration ladder
    pub calibration_buffer: Decimal,

    /// Added past the walk start so a level at that price is included
    pub walk_buffer: Decimal,

    /// Grid used when no levels file is given
    pub grid: GridConfig,
}

/// Uniform technical level grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub low: Decimal,
    pub high: Decimal,
    pub step: Decimal,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            stop_loss: dec!(-5000),
            nbm: dec!(25),
            lot_size: dec!(1000),      // 1 lot = 1000 risk units
            slippage_ticks: dec!(3),
            ticks_per_point: dec!(16),
            calibration_buffer: dec!(0.01),
            walk_buffer: dec!(0.001),
            grid: GridConfig::default(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            low: dec!(105),
            high: dec!(120),
            step: dec!(0.03125), // one 32nd
        }
    }
}

impl GridConfig {
    pub fn build(&self) -> TechLevelGrid {
        TechLevelGrid::uniform(self.low, self.high, self.step)
    }
}

impl RiskConfig {
    /// Price distance of one tick.
    pub fn tick(&self) -> Decimal {
        Decimal::ONE / self.ticks_per_point
    }

    /// Convert a tick count to a price distance.
    pub fn ticks_to_price(&self, ticks: Decimal) -> Decimal {
        ticks / self.ticks_per_point
    }

    /// Convert a price distance to ticks.
    pub fn price_to_ticks(&self, distance: Decimal) -> Decimal {
        distance * self.ticks_per_point
    }

    /// Defaults overlaid with any `SUMO_*` environment variables:
    /// - SUMO_STOP_LOSS
    /// - SUMO_NBM
    /// - SUMO_LOT_SIZE
    /// - SUMO_SLIPPAGE_TICKS
    /// - SUMO_TICKS_PER_POINT
    /// - SUMO_GRID_LOW / SUMO_GRID_HIGH / SUMO_GRID_STEP
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = env_decimal("SUMO_STOP_LOSS")? {
            config.stop_loss = v;
        }
        if let Some(v) = env_decimal("SUMO_NBM")? {
            config.nbm = v;
        }
        if let Some(v) = env_decimal("SUMO_LOT_SIZE")? {
            config.lot_size = v;
        }
        if let Some(v) = env_decimal("SUMO_SLIPPAGE_TICKS")? {
            config.slippage_ticks = v;
        }
        if let Some(v) = env_decimal("SUMO_TICKS_PER_POINT")? {
            config.ticks_per_point = v;
        }
        if let Some(v) = env_decimal("SUMO_GRID_LOW")? {
            config.grid.low = v;
        }
        if let Some(v) = env_decimal("SUMO_GRID_HIGH")? {
            config.grid.high = v;
        }
        if let Some(v) = env_decimal("SUMO_GRID_STEP")? {
            config.grid.step = v;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject parameter combinations the engine cannot size against.
    pub fn validate(&self) -> std::result::Result<(), RiskError> {
        if self.stop_loss >= Decimal::ZERO {
            return Err(RiskError::Config(format!(
                "stop_loss must be negative, got {}",
                self.stop_loss
            )));
        }
        if self.lot_size <= Decimal::ZERO {
            return Err(RiskError::Config(format!(
                "lot_size must be positive, got {}",
                self.lot_size
            )));
        }
        if self.nbm <= Decimal::ZERO {
            return Err(RiskError::Config(format!("nbm must be positive, got {}", self.nbm)));
        }
        if self.ticks_per_point <= Decimal::ZERO {
            return Err(RiskError::Config(format!(
                "ticks_per_point must be positive, got {}",
                self.ticks_per_point
            )));
        }
        if self.slippage_ticks < Decimal::ZERO {
            return Err(RiskError::Config(format!(
                "slippage_ticks must not be negative, got {}",
                self.slippage_ticks
            )));
        }
        if self.grid.step <= Decimal::ZERO || self.grid.low > self.grid.high {
            return Err(RiskError::Config(format!(
                "grid must have low <= high and a positive step, got {}..{} by {}",
                self.grid.low, self.grid.high, self.grid.step
            )));
        }
        Ok(())
    }
}

/// Read an optional decimal from the environment.
pub(crate) fn env_decimal(key: &str) -> Result<Option<Decimal>> {
    match std::env::var(key) {
        Ok(raw) => Decimal::from_str(raw.trim())
            .map(Some)
            .with_context(|| format!("Invalid {}: {:?}", key, raw)),
        Err(_) => Ok(None),
    }
}
