//! Universe configuration: named symbol lists scanned under one drop rule.

use crate::domain::Decimal;
use serde::{Deserialize, Serialize};

/// How a universe scan derives the baseline price for each symbol.
///
/// Only `prev_close` has behavior today. Other values are reserved: they
/// deserialize to `Unsupported` and the scan skips every symbol in that
/// universe, so a forward-written config file does not break older runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineMode {
    PrevClose,
    #[serde(other)]
    Unsupported,
}

fn default_drop_pct() -> Decimal {
    Decimal::from_str_canonical("10").unwrap_or_default()
}

fn default_baseline_mode() -> BaselineMode {
    BaselineMode::PrevClose
}

fn default_cooldown_minutes() -> i64 {
    720
}

/// One configured universe. Read-only at runtime; never mutated by commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    pub name: String,
    /// Path to an externally maintained JSON array of symbols.
    pub file: String,
    #[serde(default = "default_drop_pct")]
    pub drop_pct: Decimal,
    #[serde(default = "default_baseline_mode")]
    pub baseline_mode: BaselineMode,
    #[serde(default = "default_cooldown_minutes")]
    pub cooldown_minutes: i64,
}

/// The watch configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default)]
    pub universes: Vec<Universe>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_universe_defaults() {
        let json = r#"{"name": "AEX", "file": "aex.json"}"#;
        let uni: Universe = serde_json::from_str(json).unwrap();
        assert_eq!(uni.drop_pct, Decimal::from_str_canonical("10").unwrap());
        assert_eq!(uni.baseline_mode, BaselineMode::PrevClose);
        assert_eq!(uni.cooldown_minutes, 720);
    }

    #[test]
    fn test_unknown_baseline_mode_is_unsupported_not_an_error() {
        let json = r#"{"name": "X", "file": "x.json", "baseline_mode": "vwap_5d"}"#;
        let uni: Universe = serde_json::from_str(json).unwrap();
        assert_eq!(uni.baseline_mode, BaselineMode::Unsupported);
    }

    #[test]
    fn test_empty_config_document() {
        let cfg: WatchConfig = serde_json::from_str("{}").unwrap();
        assert!(cfg.universes.is_empty());
    }
}
