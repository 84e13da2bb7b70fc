//! Risk engine: configuration, breakeven curve and level enumerator in one place.

use crate::error::Result;
use crate::levels::LevelCrossing;

use super::{BreakevenCurve, RiskConfig};

/// Sizes risk ladders against a stop-loss budget.
///
/// Stateless between calls: every operation takes the technical anchors by
/// reference and hands back an updated copy in its result, so one engine
/// can serve any number of callers.
#[derive(Debug, Clone)]
pub struct RiskEngine<L> {
    pub(crate) config: RiskConfig,
    pub(crate) curve: BreakevenCurve,
    pub(crate) levels: L,
}

impl<L: LevelCrossing> RiskEngine<L> {
    /// Create an engine, rejecting an unusable configuration.
    pub fn new(config: RiskConfig, curve: BreakevenCurve, levels: L) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            curve,
            levels,
        })
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }
}
