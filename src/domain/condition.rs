//! Condition keys: deterministic identifiers tying one alert rule instance
//! to its cooldown record.

use crate::domain::Symbol;
use std::fmt;

/// Identifies one alert condition for cooldown bookkeeping.
///
/// A typed key rather than an ad hoc joined string, so two rules can never
/// collide through separator accidents; the rendered storage form stays
/// stable across runs because the persisted state document is keyed by it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConditionKey {
    /// Take-profit rise on an owned position.
    OwnedRise { symbol: Symbol },
    /// Drop below a user-set baseline on a watched position.
    WatchDropFixed { symbol: Symbol },
    /// Drop below previous close inside a universe scan. `drop_pct` is the
    /// integer-truncated percentage, part of the key so retuning a universe
    /// threshold starts a fresh cooldown window.
    UniverseDrop {
        universe: String,
        symbol: Symbol,
        drop_pct: i64,
    },
}

impl ConditionKey {
    /// Render the stable key used in the persisted alert-state document.
    pub fn storage_key(&self) -> String {
        match self {
            ConditionKey::OwnedRise { symbol } => format!("{}::owned_rise", symbol),
            ConditionKey::WatchDropFixed { symbol } => format!("{}::watch_drop_fixed", symbol),
            ConditionKey::UniverseDrop {
                universe,
                symbol,
                drop_pct,
            } => format!("universe::{}::{}::drop{}", universe, symbol, drop_pct),
        }
    }
}

impl fmt::Display for ConditionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.storage_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_rendering() {
        let key = ConditionKey::OwnedRise {
            symbol: Symbol::new("AAPL"),
        };
        assert_eq!(key.storage_key(), "AAPL::owned_rise");

        let key = ConditionKey::WatchDropFixed {
            symbol: Symbol::new("ASML.AS"),
        };
        assert_eq!(key.storage_key(), "ASML.AS::watch_drop_fixed");

        let key = ConditionKey::UniverseDrop {
            universe: "AEX".to_string(),
            symbol: Symbol::new("ASML.AS"),
            drop_pct: 10,
        };
        assert_eq!(key.storage_key(), "universe::AEX::ASML.AS::drop10");
    }

    #[test]
    fn test_same_inputs_same_key() {
        let a = ConditionKey::OwnedRise {
            symbol: Symbol::new(" aapl "),
        };
        let b = ConditionKey::OwnedRise {
            symbol: Symbol::new("AAPL"),
        };
        assert_eq!(a, b);
        assert_eq!(a.storage_key(), b.storage_key());
    }

    #[test]
    fn test_universes_with_same_symbol_stay_distinct() {
        let a = ConditionKey::UniverseDrop {
            universe: "AEX".to_string(),
            symbol: Symbol::new("ASML.AS"),
            drop_pct: 10,
        };
        let b = ConditionKey::UniverseDrop {
            universe: "AMX".to_string(),
            symbol: Symbol::new("ASML.AS"),
            drop_pct: 10,
        };
        assert_ne!(a, b);
        assert_ne!(a.storage_key(), b.storage_key());
    }

    #[test]
    fn test_rule_kinds_never_collide() {
        let rise = ConditionKey::OwnedRise {
            symbol: Symbol::new("AAA"),
        };
        let drop = ConditionKey::WatchDropFixed {
            symbol: Symbol::new("AAA"),
        };
        assert_ne!(rise.storage_key(), drop.storage_key());
    }
}
