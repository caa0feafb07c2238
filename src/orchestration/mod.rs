//! One watcher pass: commands, instruments, universes, persist.

use crate::channel::{CommandInbox, Notifier};
use crate::clock::Clock;
use crate::commands;
use crate::config::Config;
use crate::domain::{BaselineMode, ConditionKey, Decimal, InstrumentRole, Symbol, Universe};
use crate::engine::{
    evaluate_owned, evaluate_universe_entry, evaluate_watch_fixed, message, record_fire,
    should_fire,
};
use crate::quotes::{PriceSource, Quote};
use crate::store::{AlertState, Store, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Counters for one completed pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub commands_consumed: usize,
    pub instruments_evaluated: usize,
    pub universes_scanned: usize,
    pub alerts_sent: usize,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The single-pass orchestrator. Holds no state between invocations beyond
/// what the store persists; the external scheduler provides periodicity.
pub struct Watcher {
    config: Config,
    store: Store,
    prices: Arc<dyn PriceSource>,
    notifier: Arc<dyn Notifier>,
    inbox: Arc<dyn CommandInbox>,
    clock: Arc<dyn Clock>,
}

impl Watcher {
    pub fn new(
        config: Config,
        store: Store,
        prices: Arc<dyn PriceSource>,
        notifier: Arc<dyn Notifier>,
        inbox: Arc<dyn CommandInbox>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            store,
            prices,
            notifier,
            inbox,
            clock,
        }
    }

    /// Run one pass in fixed order: process commands, evaluate instruments,
    /// scan universes, persist. Individual lookup and delivery failures are
    /// logged and skipped; only a failed persist propagates.
    pub async fn run_once(&self) -> Result<RunSummary, RunError> {
        let mut instruments = self.store.load_instruments();
        let watch_config = self.store.load_watch_config();
        let mut state = self.store.load_state();
        let mut summary = RunSummary::default();

        // 1) Commands. An inbox failure skips this phase, never the pass.
        let mut instruments_mutated = false;
        match commands::process_batch(
            self.inbox.as_ref(),
            self.notifier.as_ref(),
            &self.config.telegram_chat_id,
            &mut instruments,
            &mut state,
        )
        .await
        {
            Ok(outcome) => {
                instruments_mutated = outcome.mutated;
                summary.commands_consumed = outcome.consumed;
            }
            Err(e) => warn!("Command inbox unavailable, skipping commands: {}", e),
        }

        // 2) Instruments, in list order.
        for instrument in &instruments {
            summary.instruments_evaluated += 1;
            match instrument.role() {
                InstrumentRole::Owned(pos) => {
                    let Some(last_price) = self.lookup_last(&pos.symbol).await else {
                        continue;
                    };
                    if let Some(hit) =
                        evaluate_owned(&pos, last_price, self.config.default_rise_pct)
                    {
                        let now = self.clock.now();
                        let text = message::owned_rise_text(&hit, pos.shares, &now);
                        if self
                            .deliver(
                                &mut state,
                                &hit.key,
                                self.config.cooldown_minutes_owned,
                                &text,
                            )
                            .await
                        {
                            summary.alerts_sent += 1;
                        }
                    }
                }
                InstrumentRole::Watch(pos) => {
                    let Some(last_price) = self.lookup_last(&pos.symbol).await else {
                        continue;
                    };
                    if let Some(hit) =
                        evaluate_watch_fixed(&pos, last_price, self.config.default_drop_pct)
                    {
                        let now = self.clock.now();
                        let text = message::watch_drop_text(&hit, &now);
                        if self
                            .deliver(
                                &mut state,
                                &hit.key,
                                self.config.cooldown_minutes_watch,
                                &text,
                            )
                            .await
                        {
                            summary.alerts_sent += 1;
                        }
                    }
                }
                InstrumentRole::WatchWithoutBaseline => {
                    info!(
                        "Watch entry {} has no baseline; covered by universe scans only",
                        instrument.symbol
                    );
                }
                InstrumentRole::OwnedIncomplete => {
                    warn!(
                        "Owned entry {} missing a positive entry_price, skipped",
                        instrument.symbol
                    );
                }
                InstrumentRole::Unknown(status) => {
                    warn!(
                        "Skipping {}: unknown status '{}' (use 'owned' or 'watch')",
                        instrument.symbol, status
                    );
                }
            }
        }

        // 3) Universes, in config order.
        for universe in &watch_config.universes {
            summary.universes_scanned += 1;
            summary.alerts_sent += self.scan_universe(universe, &mut state).await;
        }

        // 4) Persist. The state document always goes back out: the cursor
        // advances even when nothing else changed.
        if instruments_mutated {
            self.store.save_instruments(&instruments)?;
        }
        self.store.save_state(&state)?;

        Ok(summary)
    }

    async fn scan_universe(&self, universe: &Universe, state: &mut AlertState) -> usize {
        if universe.baseline_mode != BaselineMode::PrevClose {
            info!(
                "Universe '{}': unsupported baseline mode, skipping all symbols",
                universe.name
            );
            return 0;
        }

        let symbols = self.store.load_universe_symbols(&universe.file);
        if symbols.is_empty() {
            info!(
                "Universe '{}' empty or missing: {}",
                universe.name, universe.file
            );
            return 0;
        }

        let mut sent = 0;
        for symbol in &symbols {
            let baseline = match self.prices.prev_close(symbol).await {
                Quote::Price(p) => p,
                Quote::Unavailable => {
                    debug!("No previous close for {}, skipping", symbol);
                    continue;
                }
                Quote::Failed(reason) => {
                    warn!("Previous close lookup failed for {}: {}", symbol, reason);
                    continue;
                }
            };
            let Some(last_price) = self.lookup_last(symbol).await else {
                continue;
            };
            if let Some(hit) = evaluate_universe_entry(
                &universe.name,
                symbol,
                universe.drop_pct,
                baseline,
                last_price,
            ) {
                let now = self.clock.now();
                let text = message::universe_drop_text(&hit, &universe.name, &now);
                if self
                    .deliver(state, &hit.key, universe.cooldown_minutes, &text)
                    .await
                {
                    sent += 1;
                }
            }
        }
        sent
    }

    async fn lookup_last(&self, symbol: &Symbol) -> Option<Decimal> {
        match self.prices.last_price(symbol).await {
            Quote::Price(p) => Some(p),
            Quote::Unavailable => {
                debug!("No last price for {}, skipping", symbol);
                None
            }
            Quote::Failed(reason) => {
                warn!("Price lookup failed for {}: {}", symbol, reason);
                None
            }
        }
    }

    /// Pass a hit through the cooldown gate and, when open, send it. The
    /// fire is recorded only after delivery succeeds, so a failed send is
    /// retried on the scheduler's next invocation.
    async fn deliver(
        &self,
        state: &mut AlertState,
        key: &ConditionKey,
        cooldown_minutes: i64,
        text: &str,
    ) -> bool {
        let now = self.clock.now();
        if !should_fire(state, key, now, cooldown_minutes) {
            debug!("Cooldown active for {}, suppressed", key);
            return false;
        }
        match self.notifier.send(text).await {
            Ok(()) => {
                record_fire(state, key, now);
                true
            }
            Err(e) => {
                warn!("Notification delivery failed for {}: {}", key, e);
                false
            }
        }
    }
}
