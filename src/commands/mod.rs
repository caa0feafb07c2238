//! Chat command grammar and the batch processor that consumes the inbound
//! stream.
//!
//! Commands mutate the instrument list only; universes are read-only. The
//! cursor advances over every consumed item, honored or not, so a run never
//! reprocesses the stream from the same point.

use crate::channel::{ChannelError, CommandInbox, Notifier};
use crate::domain::{Decimal, Instrument, Symbol};
use crate::store::AlertState;
use tracing::{debug, info, warn};

pub const USAGE: &str = "Commands:\n\
    /buy SYMBOL PRICE [SHARES] - track an owned position (alias: /owned)\n\
    /watch SYMBOL BASELINE [DROP_PCT] - watch for a drop from a baseline\n\
    /sell SYMBOL - stop tracking (alias: /remove)\n\
    /help - this text";

/// A recognized, well-formed command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    UpsertOwned {
        symbol: Symbol,
        entry_price: Decimal,
        shares: Option<Decimal>,
    },
    UpsertWatch {
        symbol: Symbol,
        baseline: Decimal,
        drop_pct: Option<Decimal>,
    },
    Remove {
        symbol: Symbol,
    },
    Help,
}

/// Result of parsing one inbound text.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    Command(Command),
    /// Known command word, bad arguments: reply with usage, mutate nothing.
    Malformed,
    /// Not a command we know: consume silently.
    Unrecognized,
}

/// Decimal with comma or dot as the fractional separator.
fn parse_decimal(token: &str) -> Option<Decimal> {
    Decimal::from_str_canonical(&token.replace(',', ".")).ok()
}

fn parse_positive(token: &str) -> Option<Decimal> {
    parse_decimal(token).filter(Decimal::is_positive)
}

pub fn parse(text: &str) -> Parsed {
    let mut tokens = text.split_whitespace();
    let Some(word) = tokens.next() else {
        return Parsed::Unrecognized;
    };
    let args: Vec<&str> = tokens.collect();

    match word.to_lowercase().as_str() {
        "/buy" | "/owned" => {
            let (Some(symbol), Some(price)) = (args.first(), args.get(1)) else {
                return Parsed::Malformed;
            };
            let Some(entry_price) = parse_positive(price) else {
                return Parsed::Malformed;
            };
            let shares = match args.get(2) {
                None => None,
                Some(raw) => match parse_positive(raw) {
                    Some(shares) => Some(shares),
                    None => return Parsed::Malformed,
                },
            };
            Parsed::Command(Command::UpsertOwned {
                symbol: Symbol::new(symbol),
                entry_price,
                shares,
            })
        }
        "/watch" => {
            let (Some(symbol), Some(baseline)) = (args.first(), args.get(1)) else {
                return Parsed::Malformed;
            };
            let Some(baseline) = parse_positive(baseline) else {
                return Parsed::Malformed;
            };
            let drop_pct = match args.get(2) {
                None => None,
                Some(raw) => match parse_positive(raw) {
                    Some(pct) => Some(pct),
                    None => return Parsed::Malformed,
                },
            };
            Parsed::Command(Command::UpsertWatch {
                symbol: Symbol::new(symbol),
                baseline,
                drop_pct,
            })
        }
        "/sell" | "/remove" => match args.first() {
            Some(symbol) => Parsed::Command(Command::Remove {
                symbol: Symbol::new(symbol),
            }),
            None => Parsed::Malformed,
        },
        "/help" => Parsed::Command(Command::Help),
        _ => Parsed::Unrecognized,
    }
}

/// Outcome of applying one command to the instrument list.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub reply: String,
    pub mutated: bool,
}

/// Apply a command. Upserts replace the whole record for the normalized
/// symbol; a stale rise/drop override does not survive a re-buy.
pub fn apply(command: Command, instruments: &mut Vec<Instrument>) -> Applied {
    match command {
        Command::UpsertOwned {
            symbol,
            entry_price,
            shares,
        } => {
            let reply = match shares {
                Some(shares) => format!(
                    "Tracking {} as owned: entry €{}, {} shares.",
                    symbol,
                    entry_price.to_fixed(2),
                    shares
                ),
                None => format!(
                    "Tracking {} as owned: entry €{}.",
                    symbol,
                    entry_price.to_fixed(2)
                ),
            };
            upsert(
                instruments,
                Instrument::owned(symbol, entry_price, shares),
            );
            Applied {
                reply,
                mutated: true,
            }
        }
        Command::UpsertWatch {
            symbol,
            baseline,
            drop_pct,
        } => {
            let reply = match drop_pct {
                Some(pct) => format!(
                    "Watching {} from baseline €{} (drop {}%).",
                    symbol,
                    baseline.to_fixed(2),
                    pct
                ),
                None => format!(
                    "Watching {} from baseline €{} (default drop).",
                    symbol,
                    baseline.to_fixed(2)
                ),
            };
            upsert(
                instruments,
                Instrument::watch(symbol, baseline, drop_pct),
            );
            Applied {
                reply,
                mutated: true,
            }
        }
        Command::Remove { symbol } => {
            let before = instruments.len();
            instruments.retain(|i| i.symbol != symbol);
            if instruments.len() < before {
                Applied {
                    reply: format!("Removed {}.", symbol),
                    mutated: true,
                }
            } else {
                Applied {
                    reply: format!("{} not found.", symbol),
                    mutated: false,
                }
            }
        }
        Command::Help => Applied {
            reply: USAGE.to_string(),
            mutated: false,
        },
    }
}

fn upsert(instruments: &mut Vec<Instrument>, record: Instrument) {
    match instruments.iter_mut().find(|i| i.symbol == record.symbol) {
        Some(existing) => *existing = record,
        None => instruments.push(record),
    }
}

/// Outcome of one batch over the inbound stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchOutcome {
    /// True when any command changed the instrument list.
    pub mutated: bool,
    pub consumed: usize,
}

/// Consume all new inbound items: advance the cursor over each one, honor
/// commands from the configured originator, reply where the grammar asks
/// for it. One failing item never aborts the batch.
pub async fn process_batch(
    inbox: &dyn CommandInbox,
    notifier: &dyn Notifier,
    allowed_originator: &str,
    instruments: &mut Vec<Instrument>,
    state: &mut AlertState,
) -> Result<BatchOutcome, ChannelError> {
    let messages = inbox.fetch_new(state.last_update_id).await?;
    let mut outcome = BatchOutcome::default();

    for message in messages {
        state.advance_cursor(message.id);
        outcome.consumed += 1;

        if message.originator != allowed_originator {
            debug!(
                "Ignoring message {} from unauthorized originator",
                message.id
            );
            continue;
        }

        match parse(&message.text) {
            Parsed::Command(command) => {
                let applied = apply(command, instruments);
                outcome.mutated |= applied.mutated;
                info!("Command {}: {}", message.id, applied.reply);
                reply(notifier, &applied.reply).await;
            }
            Parsed::Malformed => {
                reply(notifier, USAGE).await;
            }
            Parsed::Unrecognized => {}
        }
    }

    Ok(outcome)
}

async fn reply(notifier: &dyn Notifier, text: &str) {
    if let Err(e) = notifier.send(text).await {
        warn!("Reply delivery failed: {}", e);
    }
}
