pub mod channel;
pub mod clock;
pub mod commands;
pub mod config;
pub mod domain;
pub mod engine;
pub mod orchestration;
pub mod quotes;
pub mod store;

pub use channel::{ChannelError, CommandInbox, InboundMessage, MockChannel, Notifier, TelegramChannel};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, ConfigError};
pub use domain::{
    BaselineMode, ConditionKey, Decimal, Instrument, InstrumentRole, OwnedPosition, Symbol,
    Universe, WatchConfig, WatchPosition,
};
pub use orchestration::{RunError, RunSummary, Watcher};
pub use quotes::{MockPriceSource, PriceSource, Quote, YahooSource};
pub use store::{AlertRecord, AlertState, Store, StoreError};
