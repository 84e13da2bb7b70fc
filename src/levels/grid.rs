//! In-memory sorted grid of technical levels.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tracing::debug;

use crate::models::PriceInput;

use super::LevelCrossing;

/// A fixed, sorted, de-duplicated set of level prices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechLevelGrid {
    levels: Vec<Decimal>,
}

impl TechLevelGrid {
    /// Build a grid from arbitrary prices; order and duplicates are normalized.
    pub fn new(mut levels: Vec<Decimal>) -> Self {
        levels.sort();
        levels.dedup();
        Self { levels }
    }

    /// Evenly spaced levels from `low` to `high` inclusive.
    pub fn uniform(low: Decimal, high: Decimal, step: Decimal) -> Self {
        let mut levels = Vec::new();
        if step > Decimal::ZERO {
            let mut price = low;
            while price <= high {
                levels.push(price);
                price += step;
            }
        }
        Self { levels }
    }

    /// Load levels from a text file: one price per line, decimal or tick
    /// notation, blank lines and `#` comments ignored.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read levels file {}", path.display()))?;

        let mut levels = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let price = line
                .parse::<PriceInput>()
                .and_then(|p| p.to_decimal())
                .with_context(|| format!("{}:{}: bad level {:?}", path.display(), lineno + 1, line))?;
            levels.push(price);
        }

        debug!(path = %path.display(), count = levels.len(), "Loaded technical levels");
        Ok(Self::new(levels))
    }

    pub fn levels(&self) -> &[Decimal] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl LevelCrossing for TechLevelGrid {
    fn levels_crossed(&self, from: Decimal, to: Decimal) -> Vec<Decimal> {
        let (low, high) = if from <= to { (from, to) } else { (to, from) };
        let start = self.levels.partition_point(|&l| l < low);
        let end = self.levels.partition_point(|&l| l <= high);
        let slice = &self.levels[start..end.max(start)];

        if from <= to {
            slice.to_vec()
        } else {
            slice.iter().rev().copied().collect()
        }
    }

    fn lowest(&self) -> Option<Decimal> {
        self.levels.first().copied()
    }

    fn highest(&self) -> Option<Decimal> {
        self.levels.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn grid() -> TechLevelGrid {
        TechLevelGrid::uniform(dec!(110), dec!(112), dec!(0.25))
    }

    #[test]
    fn test_uniform_grid_is_inclusive() {
        let g = grid();
        assert_eq!(g.len(), 9);
        assert_eq!(g.lowest(), Some(dec!(110)));
        assert_eq!(g.highest(), Some(dec!(112)));
    }

    #[test]
    fn test_levels_crossed_ascending() {
        let levels = grid().levels_crossed(dec!(110.99), dec!(111.5));
        assert_eq!(levels, vec![dec!(111), dec!(111.25), dec!(111.5)]);
    }

    #[test]
    fn test_levels_crossed_descending() {
        let levels = grid().levels_crossed(dec!(111.01), dec!(110.5));
        assert_eq!(levels, vec![dec!(111), dec!(110.75), dec!(110.5)]);
    }

    #[test]
    fn test_levels_crossed_outside_grid() {
        assert!(grid().levels_crossed(dec!(113), dec!(114)).is_empty());
        assert!(grid().levels_crossed(dec!(111.1), dec!(111.2)).is_empty());
        assert_eq!(grid().levels_crossed(dec!(111), dec!(111)), vec![dec!(111)]);
    }

    #[test]
    fn test_new_sorts_and_dedups() {
        let g = TechLevelGrid::new(vec![dec!(111), dec!(110.5), dec!(111), dec!(110.75)]);
        assert_eq!(g.levels(), &[dec!(110.5), dec!(110.75), dec!(111)]);
    }

    #[test]
    fn test_from_file_mixed_notation() {
        let path = std::env::temp_dir().join(format!("sumo-levels-{}.txt", std::process::id()));
        {
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(file, "# ZN levels").unwrap();
            writeln!(file, "111'02").unwrap();
            writeln!(file).unwrap();
            writeln!(file, "110.8125  # strong support").unwrap();
            writeln!(file, "111'00").unwrap();
        }

        let g = TechLevelGrid::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(g.levels(), &[dec!(110.8125), dec!(111), dec!(111.0625)]);
    }
}
