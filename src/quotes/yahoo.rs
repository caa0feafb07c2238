//! Yahoo-style quote client over the public chart endpoint.
//!
//! One GET per lookup; the chart metadata carries both the last trade price
//! and the previous close. No retry here: a failed lookup is skipped and the
//! scheduler's next run is the retry.

use super::{PriceSource, Quote};
use crate::domain::{Decimal, Symbol};
use async_trait::async_trait;
use rust_decimal::prelude::FromPrimitive;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone)]
pub struct YahooSource {
    client: reqwest::Client,
    base_url: String,
}

impl YahooSource {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, base_url }
    }

    async fn chart_meta(&self, symbol: &Symbol) -> Result<serde_json::Value, Quote> {
        let url = format!(
            "{}/v8/finance/chart/{}?range=1d&interval=1d",
            self.base_url, symbol
        );
        debug!("Fetching chart meta for {}", symbol);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Quote::Failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // 404 means an unknown symbol on this endpoint.
            if status.as_u16() == 404 {
                return Err(Quote::Unavailable);
            }
            return Err(Quote::Failed(format!("HTTP {}", status.as_u16())));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Quote::Failed(e.to_string()))?;

        body.pointer("/chart/result/0/meta")
            .cloned()
            .ok_or(Quote::Unavailable)
    }
}

fn positive_decimal(value: Option<&serde_json::Value>) -> Quote {
    let Some(f) = value.and_then(|v| v.as_f64()) else {
        return Quote::Unavailable;
    };
    match rust_decimal::Decimal::from_f64(f).map(Decimal::new) {
        Some(p) if p.is_positive() => Quote::Price(p),
        _ => Quote::Unavailable,
    }
}

#[async_trait]
impl PriceSource for YahooSource {
    async fn last_price(&self, symbol: &Symbol) -> Quote {
        match self.chart_meta(symbol).await {
            Ok(meta) => positive_decimal(meta.get("regularMarketPrice")),
            Err(quote) => quote,
        }
    }

    async fn prev_close(&self, symbol: &Symbol) -> Quote {
        match self.chart_meta(symbol).await {
            Ok(meta) => {
                // chartPreviousClose is the previous session; previousClose
                // can be the pre/post reference on some listings.
                let value = meta
                    .get("chartPreviousClose")
                    .or_else(|| meta.get("previousClose"));
                positive_decimal(value)
            }
            Err(quote) => quote,
        }
    }
}
