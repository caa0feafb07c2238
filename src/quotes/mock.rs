//! Mock price source for tests: scripted quotes, no network.

use super::{PriceSource, Quote};
use crate::domain::{Decimal, Symbol};
use async_trait::async_trait;
use std::collections::HashMap;

/// Returns predefined quotes per symbol; anything unscripted is
/// [`Quote::Unavailable`].
#[derive(Debug, Clone, Default)]
pub struct MockPriceSource {
    last: HashMap<Symbol, Quote>,
    prev_close: HashMap<Symbol, Quote>,
}

impl MockPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_last_price(mut self, symbol: &str, price: &str) -> Self {
        self.last.insert(
            Symbol::new(symbol),
            Quote::Price(Decimal::from_str_canonical(price).expect("valid decimal")),
        );
        self
    }

    pub fn with_prev_close(mut self, symbol: &str, price: &str) -> Self {
        self.prev_close.insert(
            Symbol::new(symbol),
            Quote::Price(Decimal::from_str_canonical(price).expect("valid decimal")),
        );
        self
    }

    pub fn with_last_quote(mut self, symbol: &str, quote: Quote) -> Self {
        self.last.insert(Symbol::new(symbol), quote);
        self
    }

    pub fn with_prev_close_quote(mut self, symbol: &str, quote: Quote) -> Self {
        self.prev_close.insert(Symbol::new(symbol), quote);
        self
    }
}

#[async_trait]
impl PriceSource for MockPriceSource {
    async fn last_price(&self, symbol: &Symbol) -> Quote {
        self.last.get(symbol).cloned().unwrap_or(Quote::Unavailable)
    }

    async fn prev_close(&self, symbol: &Symbol) -> Quote {
        self.prev_close
            .get(symbol)
            .cloned()
            .unwrap_or(Quote::Unavailable)
    }
}
