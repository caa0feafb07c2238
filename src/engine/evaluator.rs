//! The three alert rules, as pure functions over injected prices.
//!
//! No network, no clock, no cooldown here: a rule combines an instrument's
//! parameters with one price observation and answers hit or no hit. The
//! cooldown gate decides separately whether a hit may fire.

use crate::domain::{ConditionKey, Decimal, OwnedPosition, Symbol, WatchPosition};

/// A threshold crossing, with everything messaging needs.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertHit {
    pub key: ConditionKey,
    pub symbol: Symbol,
    pub last_price: Decimal,
    /// Entry price or baseline the move is measured against.
    pub reference: Decimal,
    pub target: Decimal,
    /// `(last / reference - 1) * 100`, computed from the reference itself,
    /// never re-derived from the target.
    pub pct_move: Decimal,
    /// The rise/drop percentage that defined the threshold.
    pub threshold_pct: Decimal,
}

fn pct_move(last_price: Decimal, reference: Decimal) -> Decimal {
    (last_price / reference - Decimal::one()) * Decimal::hundred()
}

/// Take-profit rule: hit when the price reaches `entry * (1 + rise_pct/100)`.
pub fn evaluate_owned(
    pos: &OwnedPosition,
    last_price: Decimal,
    default_rise_pct: Decimal,
) -> Option<AlertHit> {
    let rise_pct = pos.rise_pct.unwrap_or(default_rise_pct);
    let target = pos.entry_price * (Decimal::one() + rise_pct / Decimal::hundred());
    if last_price < target {
        return None;
    }
    Some(AlertHit {
        key: ConditionKey::OwnedRise {
            symbol: pos.symbol.clone(),
        },
        symbol: pos.symbol.clone(),
        last_price,
        reference: pos.entry_price,
        target,
        pct_move: pct_move(last_price, pos.entry_price),
        threshold_pct: rise_pct,
    })
}

/// Fixed-baseline drop rule: hit when the price falls to
/// `baseline * (1 - drop_pct/100)`.
pub fn evaluate_watch_fixed(
    pos: &WatchPosition,
    last_price: Decimal,
    default_drop_pct: Decimal,
) -> Option<AlertHit> {
    let drop_pct = pos.drop_pct.unwrap_or(default_drop_pct);
    let target = pos.baseline * (Decimal::one() - drop_pct / Decimal::hundred());
    if last_price > target {
        return None;
    }
    Some(AlertHit {
        key: ConditionKey::WatchDropFixed {
            symbol: pos.symbol.clone(),
        },
        symbol: pos.symbol.clone(),
        last_price,
        reference: pos.baseline,
        target,
        pct_move: pct_move(last_price, pos.baseline),
        threshold_pct: drop_pct,
    })
}

/// Universe drop-scan rule: one symbol from a universe list, baseline taken
/// from the previous close. A non-positive baseline yields no hit.
pub fn evaluate_universe_entry(
    universe: &str,
    symbol: &Symbol,
    drop_pct: Decimal,
    prev_close: Decimal,
    last_price: Decimal,
) -> Option<AlertHit> {
    if !prev_close.is_positive() {
        return None;
    }
    let target = prev_close * (Decimal::one() - drop_pct / Decimal::hundred());
    if last_price > target {
        return None;
    }
    Some(AlertHit {
        key: ConditionKey::UniverseDrop {
            universe: universe.to_string(),
            symbol: symbol.clone(),
            drop_pct: drop_pct.trunc_i64(),
        },
        symbol: symbol.clone(),
        last_price,
        reference: prev_close,
        target,
        pct_move: pct_move(last_price, prev_close),
        threshold_pct: drop_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn owned(entry: &str, rise_pct: Option<&str>) -> OwnedPosition {
        OwnedPosition {
            symbol: Symbol::new("AAA"),
            entry_price: d(entry),
            shares: None,
            rise_pct: rise_pct.map(d),
        }
    }

    fn watch(baseline: &str, drop_pct: Option<&str>) -> WatchPosition {
        WatchPosition {
            symbol: Symbol::new("BBB"),
            baseline: d(baseline),
            drop_pct: drop_pct.map(d),
        }
    }

    #[test]
    fn test_owned_rise_boundary_inclusive() {
        let pos = owned("100", Some("5"));
        assert!(evaluate_owned(&pos, d("104.9"), d("10")).is_none());
        let hit = evaluate_owned(&pos, d("105.0"), d("10")).expect("boundary is a hit");
        assert_eq!(hit.target, d("105"));
        assert_eq!(hit.pct_move, d("5"));
        assert_eq!(hit.threshold_pct, d("5"));
    }

    #[test]
    fn test_owned_rise_uses_default_when_unset() {
        let pos = owned("100", None);
        assert!(evaluate_owned(&pos, d("109"), d("10")).is_none());
        let hit = evaluate_owned(&pos, d("110"), d("10")).unwrap();
        assert_eq!(hit.target, d("110"));
    }

    #[test]
    fn test_watch_drop_boundary_inclusive() {
        let pos = watch("1000", Some("10"));
        assert!(evaluate_watch_fixed(&pos, d("900.01"), d("5")).is_none());
        let hit = evaluate_watch_fixed(&pos, d("900.0"), d("5")).expect("boundary is a hit");
        assert_eq!(hit.target, d("900"));
        assert_eq!(hit.pct_move, d("-10"));
    }

    #[test]
    fn test_watch_drop_uses_default_when_unset() {
        let pos = watch("100", None);
        let hit = evaluate_watch_fixed(&pos, d("95"), d("5")).unwrap();
        assert_eq!(hit.target, d("95"));
        assert_eq!(hit.threshold_pct, d("5"));
    }

    #[test]
    fn test_pct_move_comes_from_reference_not_target() {
        // Deep overshoot: pct_move reflects the actual move (-20%), not the
        // -10% threshold that triggered it.
        let pos = watch("1000", Some("10"));
        let hit = evaluate_watch_fixed(&pos, d("800"), d("5")).unwrap();
        assert_eq!(hit.pct_move, d("-20"));
    }

    #[test]
    fn test_universe_entry_hit_and_key() {
        let sym = Symbol::new("ASML.AS");
        let hit = evaluate_universe_entry("AEX", &sym, d("10"), d("600"), d("540")).unwrap();
        assert_eq!(
            hit.key,
            ConditionKey::UniverseDrop {
                universe: "AEX".to_string(),
                symbol: sym,
                drop_pct: 10,
            }
        );
        assert_eq!(hit.pct_move, d("-10"));
    }

    #[test]
    fn test_universe_entry_non_positive_baseline_skipped() {
        let sym = Symbol::new("X");
        assert!(evaluate_universe_entry("U", &sym, d("10"), d("0"), d("1")).is_none());
        assert!(evaluate_universe_entry("U", &sym, d("10"), d("-5"), d("1")).is_none());
    }

    #[test]
    fn test_universe_entry_no_hit_above_target() {
        let sym = Symbol::new("X");
        assert!(evaluate_universe_entry("U", &sym, d("10"), d("100"), d("90.01")).is_none());
    }

    #[test]
    fn test_fractional_drop_pct_truncates_in_key() {
        let sym = Symbol::new("X");
        let hit = evaluate_universe_entry("U", &sym, d("7.5"), d("100"), d("92")).unwrap();
        match hit.key {
            ConditionKey::UniverseDrop { drop_pct, .. } => assert_eq!(drop_pct, 7),
            other => panic!("unexpected key {:?}", other),
        }
    }
}
