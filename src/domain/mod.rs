//! Domain types: symbols, decimals, instruments, universes, condition keys.

pub mod condition;
pub mod decimal;
pub mod instrument;
pub mod primitives;
pub mod universe;

pub use condition::ConditionKey;
pub use decimal::Decimal;
pub use instrument::{Instrument, InstrumentRole, OwnedPosition, WatchPosition};
pub use primitives::Symbol;
pub use universe::{BaselineMode, Universe, WatchConfig};
