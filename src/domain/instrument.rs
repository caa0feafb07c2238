//! Tracked instruments and their typed rule parameters.

use crate::domain::{Decimal, Symbol};
use serde::{Deserialize, Serialize};

/// One entry in the persisted instrument list.
///
/// Kept flat on purpose: the `status` field is a plain string and every rule
/// parameter is optional, so one unrecognized or incomplete record degrades
/// to a skipped entry instead of failing the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: Symbol,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shares: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rise_pct: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_pct: Option<Decimal>,
}

/// Typed view of an instrument, projected from the flat record.
#[derive(Debug, Clone, PartialEq)]
pub enum InstrumentRole {
    Owned(OwnedPosition),
    /// Watch entry with an explicit baseline.
    Watch(WatchPosition),
    /// Watch entry without a baseline: excluded from fixed-baseline
    /// evaluation, covered by universe scans instead.
    WatchWithoutBaseline,
    /// Owned entry missing (or carrying a non-positive) entry price.
    OwnedIncomplete,
    Unknown(String),
}

/// Owned position parameters for the owned-rise rule.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedPosition {
    pub symbol: Symbol,
    pub entry_price: Decimal,
    pub shares: Option<Decimal>,
    pub rise_pct: Option<Decimal>,
}

/// Watch position parameters for the fixed-baseline drop rule.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchPosition {
    pub symbol: Symbol,
    pub baseline: Decimal,
    pub drop_pct: Option<Decimal>,
}

impl Instrument {
    pub fn owned(symbol: Symbol, entry_price: Decimal, shares: Option<Decimal>) -> Self {
        Instrument {
            symbol,
            status: "owned".to_string(),
            entry_price: Some(entry_price),
            shares,
            rise_pct: None,
            baseline: None,
            drop_pct: None,
        }
    }

    pub fn watch(symbol: Symbol, baseline: Decimal, drop_pct: Option<Decimal>) -> Self {
        Instrument {
            symbol,
            status: "watch".to_string(),
            entry_price: None,
            shares: None,
            rise_pct: None,
            baseline: Some(baseline),
            drop_pct,
        }
    }

    /// Project the flat record into the rule it participates in.
    pub fn role(&self) -> InstrumentRole {
        match self.status.trim().to_lowercase().as_str() {
            "owned" => match self.entry_price {
                Some(entry) if entry.is_positive() => InstrumentRole::Owned(OwnedPosition {
                    symbol: self.symbol.clone(),
                    entry_price: entry,
                    shares: self.shares,
                    rise_pct: self.rise_pct,
                }),
                _ => InstrumentRole::OwnedIncomplete,
            },
            "watch" => match self.baseline {
                Some(baseline) => InstrumentRole::Watch(WatchPosition {
                    symbol: self.symbol.clone(),
                    baseline,
                    drop_pct: self.drop_pct,
                }),
                None => InstrumentRole::WatchWithoutBaseline,
            },
            other => InstrumentRole::Unknown(other.to_string()),
        }
    }
}
