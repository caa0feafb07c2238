//! Price source abstraction: last trade price and previous close.

use crate::domain::{Decimal, Symbol};
use async_trait::async_trait;
use std::fmt;

pub mod mock;
pub mod yahoo;

pub use mock::MockPriceSource;
pub use yahoo::YahooSource;

/// Outcome of one price lookup.
///
/// Deliberately a tri-state instead of a `Result`: the caller decides
/// skip-vs-abort at the call site, and a pass over many symbols treats both
/// non-price variants as "skip this symbol, keep going".
#[derive(Debug, Clone, PartialEq)]
pub enum Quote {
    Price(Decimal),
    /// Source reachable but no usable price (unknown symbol, empty history,
    /// non-positive value). Expected and quiet.
    Unavailable,
    /// Transport-level failure (timeout, DNS, HTTP error). Worth a warning
    /// line, still skippable.
    Failed(String),
}

impl Quote {
    /// The price, if this lookup produced a positive one.
    pub fn price(&self) -> Option<Decimal> {
        match self {
            Quote::Price(p) => Some(*p),
            _ => None,
        }
    }
}

/// Price source for a symbol. Implementations must never panic on upstream
/// failure; everything maps into a [`Quote`] variant.
#[async_trait]
pub trait PriceSource: Send + Sync + fmt::Debug {
    /// Last trade price.
    async fn last_price(&self, symbol: &Symbol) -> Quote;

    /// Previous trading day's close, the drop-scan baseline.
    async fn prev_close(&self, symbol: &Symbol) -> Quote;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_price_accessor() {
        let p = Decimal::from_str_canonical("10.5").unwrap();
        assert_eq!(Quote::Price(p).price(), Some(p));
        assert_eq!(Quote::Unavailable.price(), None);
        assert_eq!(Quote::Failed("timeout".to_string()).price(), None);
    }
}
