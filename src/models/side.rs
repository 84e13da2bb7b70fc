//! Direction of a scaling ladder.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which way a position scales as price moves against it.
///
/// `Long` adds on the way down (levels below the current price), `Short`
/// adds on the way up. Every direction-dependent choice in the engine goes
/// through this type so the long and short walks share one algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Long,
    Short,
}

impl Side {
    /// Side of a signed risk, `None` when flat.
    pub fn from_risk(risk: Decimal) -> Option<Self> {
        if risk > Decimal::ZERO {
            Some(Side::Long)
        } else if risk < Decimal::ZERO {
            Some(Side::Short)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Long => "LONG",
            Side::Short => "SHORT",
        }
    }

    /// `+1` for long, `-1` for short.
    pub fn sign(&self) -> Decimal {
        match self {
            Side::Long => Decimal::ONE,
            Side::Short => Decimal::NEGATIVE_ONE,
        }
    }

    /// Move `price` by `distance` in the adverse direction.
    pub fn adverse(&self, price: Decimal, distance: Decimal) -> Decimal {
        match self {
            Side::Long => price - distance,
            Side::Short => price + distance,
        }
    }

    /// Of two prices, the one farther in the adverse direction.
    pub fn farther(&self, a: Decimal, b: Decimal) -> Decimal {
        match self {
            Side::Long => a.min(b),
            Side::Short => a.max(b),
        }
    }

    /// True when `far` lies beyond `near` in the adverse direction.
    pub fn is_beyond(&self, far: Decimal, near: Decimal) -> bool {
        match self {
            Side::Long => far < near,
            Side::Short => far > near,
        }
    }

    /// Keep the larger risk magnitude of the two.
    pub fn clamp(&self, candidate: Decimal, previous: Decimal) -> Decimal {
        match self {
            Side::Long => candidate.max(previous),
            Side::Short => candidate.min(previous),
        }
    }

    /// Round a risk to a lot multiple, away from zero for this side.
    pub fn quantize(&self, risk: Decimal, lot: Decimal) -> Decimal {
        let lots = risk / lot;
        let rounded = match self {
            Side::Long => lots.ceil(),
            Side::Short => lots.floor(),
        };
        rounded * lot
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_risk() {
        assert_eq!(Side::from_risk(dec!(1000)), Some(Side::Long));
        assert_eq!(Side::from_risk(dec!(-1000)), Some(Side::Short));
        assert_eq!(Side::from_risk(Decimal::ZERO), None);
    }

    #[test]
    fn test_quantize_rounds_away_from_zero() {
        assert_eq!(Side::Long.quantize(dec!(1250), dec!(1000)), dec!(2000));
        assert_eq!(Side::Long.quantize(dec!(3000), dec!(1000)), dec!(3000));
        assert_eq!(Side::Short.quantize(dec!(-1250), dec!(1000)), dec!(-2000));
        assert_eq!(Side::Short.quantize(dec!(-3000), dec!(1000)), dec!(-3000));
    }

    #[test]
    fn test_clamp_keeps_larger_magnitude() {
        assert_eq!(Side::Long.clamp(dec!(500), dec!(1000)), dec!(1000));
        assert_eq!(Side::Long.clamp(dec!(1500), dec!(1000)), dec!(1500));
        assert_eq!(Side::Short.clamp(dec!(-500), dec!(-1000)), dec!(-1000));
        assert_eq!(Side::Short.clamp(dec!(-1500), dec!(-1000)), dec!(-1500));
    }

    #[test]
    fn test_adverse_direction() {
        assert_eq!(Side::Long.adverse(dec!(111), dec!(0.5)), dec!(110.5));
        assert_eq!(Side::Short.adverse(dec!(111), dec!(0.5)), dec!(111.5));
        assert_eq!(Side::Long.farther(dec!(111), dec!(110.5)), dec!(110.5));
        assert_eq!(Side::Short.farther(dec!(111), dec!(110.5)), dec!(111));
        assert!(Side::Long.is_beyond(dec!(110), dec!(111)));
        assert!(!Side::Short.is_beyond(dec!(110), dec!(111)));
    }
}
