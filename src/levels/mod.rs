//! Technical level grid and the level-crossing enumerator.

mod grid;

pub use grid::TechLevelGrid;

use rust_decimal::Decimal;

/// Enumerates grid levels crossed when price travels between two bounds.
///
/// Implementations return every level lying between `from` and `to`
/// inclusive, ordered from `from` toward `to` (descending when `to < from`),
/// without duplicates. The result must be deterministic for equal inputs.
pub trait LevelCrossing {
    fn levels_crossed(&self, from: Decimal, to: Decimal) -> Vec<Decimal>;

    /// Lowest level of the grid.
    fn lowest(&self) -> Option<Decimal>;

    /// Highest level of the grid.
    fn highest(&self) -> Option<Decimal>;
}

impl<T: LevelCrossing + ?Sized> LevelCrossing for &T {
    fn levels_crossed(&self, from: Decimal, to: Decimal) -> Vec<Decimal> {
        (**self).levels_crossed(from, to)
    }

    fn lowest(&self) -> Option<Decimal> {
        (**self).lowest()
    }

    fn highest(&self) -> Option<Decimal> {
        (**self).highest()
    }
}
