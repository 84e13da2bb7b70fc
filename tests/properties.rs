//! Property tests for the risk engine.
//!
//! Uses proptest to verify:
//! 1. Monotone risk: walked risk never shrinks in magnitude
//! 2. Lot quantization: every walked risk after the seed is a whole number of lots
//! 3. Boundedness: no recorded level reaches the stop loss, and a trade
//!    already past it is rejected
//! 4. Side symmetry: mirrored inputs give mirrored schedules
//! 5. Determinism: equal inputs give equal results

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sumo_risk::models::Termination;
use sumo_risk::{
    BreakevenCurve, PositionState, RiskConfig, RiskEngine, RiskError, Side, TechLevelGrid,
    TechnicalConfig,
};

const CENTER: Decimal = dec!(111);

fn engine() -> RiskEngine<TechLevelGrid> {
    RiskEngine::new(
        RiskConfig::default(),
        BreakevenCurve::default(),
        TechLevelGrid::uniform(dec!(108), dec!(114), dec!(0.0625)),
    )
    .unwrap()
}

fn sixteenths(n: u32) -> Decimal {
    Decimal::from(n) / dec!(16)
}

/// Anchors symmetric around the center, support and resistance `width` ticks out.
fn symmetric_technical(width: u32) -> TechnicalConfig {
    TechnicalConfig::new(
        CENTER - sixteenths(width),
        CENTER,
        CENTER,
        CENTER + sixteenths(width),
    )
}

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_r0() -> impl Strategy<Value = Decimal> {
    (1u32..=8000).prop_map(Decimal::from)
}

fn arb_pnl0() -> impl Strategy<Value = Decimal> {
    (0u32..=4000).prop_map(|p| -Decimal::from(p))
}

fn arb_pnl0_past_stop() -> impl Strategy<Value = Decimal> {
    (5000u32..=20000).prop_map(|p| -Decimal::from(p))
}

/// (support width, entry ticks below center, current ticks below entry)
fn arb_setup() -> impl Strategy<Value = (u32, u32, u32)> {
    (1u32..=8).prop_flat_map(|width| (Just(width), 0..=width, 0u32..=16))
}

// ── Survival walk ────────────────────────────────────────────────────

proptest! {
    /// Long risk never decreases along the walk and stays in whole lots.
    #[test]
    fn walked_risk_is_monotone_and_quantized(
        (width, entry_off, current_off) in arb_setup(),
        r0 in arb_r0(),
        pnl0 in arb_pnl0(),
    ) {
        let entry = CENTER - sixteenths(entry_off);
        let current = entry - sixteenths(current_off);
        let result = engine()
            .survival(current, r0, &symmetric_technical(width), entry, pnl0)
            .unwrap();

        prop_assert_eq!(result.entries[0].price, current);
        prop_assert_eq!(result.entries[0].risk, r0);

        for pair in result.entries.windows(2) {
            prop_assert!(pair[1].risk >= pair[0].risk);
            prop_assert!(pair[1].price < pair[0].price);
        }
        for entry in &result.entries[1..] {
            prop_assert_eq!(entry.risk % dec!(1000), Decimal::ZERO);
        }
    }

    /// Every recorded level stays above the stop loss; a breach is reported at or below it.
    #[test]
    fn walk_never_records_a_stop_loss_breach(
        (width, entry_off, current_off) in arb_setup(),
        r0 in arb_r0(),
        pnl0 in arb_pnl0(),
    ) {
        let entry = CENTER - sixteenths(entry_off);
        let current = entry - sixteenths(current_off);
        let result = engine()
            .survival(current, r0, &symmetric_technical(width), entry, pnl0)
            .unwrap();

        for entry in &result.entries {
            prop_assert!(entry.pnl > dec!(-5000));
        }
        if let Termination::StopLoss { breach_pnl } = result.termination {
            prop_assert!(breach_pnl <= dec!(-5000));
        }
        prop_assert_eq!(result.extreme_level, result.entries[result.entries.len() - 1].price);
    }

    /// A trade whose booked PnL already reached the stop loss gets no schedule.
    #[test]
    fn walk_rejects_pnl_already_past_stop_loss(
        (width, entry_off, current_off) in arb_setup(),
        r0 in arb_r0(),
        pnl0 in arb_pnl0_past_stop(),
        short in any::<bool>(),
    ) {
        let entry = CENTER - sixteenths(entry_off);
        let current = entry - sixteenths(current_off);
        let r0 = if short { -r0 } else { r0 };

        let result = engine().survival(current, r0, &symmetric_technical(width), entry, pnl0);
        prop_assert_eq!(
            result,
            Err(RiskError::StopLossBreached { pnl: pnl0, stop_loss: dec!(-5000) })
        );
    }

    /// A short walk on mirrored inputs is the long walk reflected through the center.
    #[test]
    fn short_walk_mirrors_long_walk(
        (width, entry_off, current_off) in arb_setup(),
        r0 in arb_r0(),
        pnl0 in arb_pnl0(),
    ) {
        let entry = CENTER - sixteenths(entry_off);
        let current = entry - sixteenths(current_off);
        let technical = symmetric_technical(width);
        let mirror = |p: Decimal| CENTER + CENTER - p;

        let long = engine().survival(current, r0, &technical, entry, pnl0).unwrap();
        let short = engine()
            .survival(mirror(current), -r0, &technical, mirror(entry), pnl0)
            .unwrap();

        prop_assert_eq!(long.side, Side::Long);
        prop_assert_eq!(short.side, Side::Short);
        prop_assert_eq!(long.entries.len(), short.entries.len());
        prop_assert_eq!(long.termination, short.termination);
        for (l, s) in long.entries.iter().zip(&short.entries) {
            prop_assert_eq!(s.price, mirror(l.price));
            prop_assert_eq!(s.risk, -l.risk);
            prop_assert_eq!(s.pnl, l.pnl);
            prop_assert_eq!(s.breakeven_ticks, -l.breakeven_ticks);
        }
        prop_assert_eq!(short.ticks_to_extreme, long.ticks_to_extreme);
    }

    /// Repeated calls on the same inputs agree.
    #[test]
    fn survival_is_deterministic(
        (width, entry_off, current_off) in arb_setup(),
        r0 in arb_r0(),
    ) {
        let entry = CENTER - sixteenths(entry_off);
        let current = entry - sixteenths(current_off);
        let technical = symmetric_technical(width);

        let first = engine().survival(current, r0, &technical, entry, Decimal::ZERO);
        let second = engine().survival(current, r0, &technical, entry, Decimal::ZERO);
        prop_assert_eq!(first, second);
    }
}

// ── Calibration ──────────────────────────────────────────────────────

proptest! {
    /// Symmetric anchors calibrate to opposite opening risks, and the farthest
    /// level plus slippage spends exactly the stop loss.
    #[test]
    fn calibration_is_symmetric_and_exhausts_stop_loss(width in 1u32..=8) {
        let result = engine().calibrate(CENTER, &symmetric_technical(width)).unwrap();

        prop_assert!(result.r0_below > Decimal::ZERO);
        prop_assert_eq!(result.r0_above, -result.r0_below);
        prop_assert_eq!(result.nearest_below, CENTER);
        prop_assert_eq!(result.nearest_above, CENTER);

        let slippage = dec!(3) / dec!(16);
        for (ladder, adverse) in [(&result.below, -slippage), (&result.above, slippage)] {
            for pair in ladder.levels.windows(2) {
                prop_assert!(pair[1].unit_risk.abs() >= pair[0].unit_risk.abs());
            }
            let last = ladder.farthest().unwrap();
            let spent = ladder.scale * (last.unit_pnl + last.unit_risk * adverse);
            prop_assert!((spent - dec!(-5000)).abs() < dec!(0.000001));
        }
    }

    /// Flat pre-trade schedules open with at least one lot each way, rows high to low.
    #[test]
    fn pre_trade_schedule_is_ordered(width in 2u32..=8, offset in 1u32..=3) {
        let technical = TechnicalConfig::new(
            CENTER - sixteenths(width),
            CENTER,
            CENTER + sixteenths(offset),
            CENTER + sixteenths(width + offset),
        );
        let current = CENTER + dec!(0.03125);
        let schedule = engine()
            .schedule(current, &PositionState::flat(), &technical)
            .unwrap();

        prop_assert!(!schedule.rows.is_empty());
        for pair in schedule.rows.windows(2) {
            prop_assert!(pair[0].price > pair[1].price);
        }
        for row in &schedule.rows {
            prop_assert_ne!(row.risk_lots, Decimal::ZERO);
        }
    }
}

#[test]
fn flat_position_cannot_be_walked() {
    let result = engine().survival(CENTER, Decimal::ZERO, &symmetric_technical(4), CENTER, Decimal::ZERO);
    assert_eq!(result, Err(RiskError::NoPosition));
}
