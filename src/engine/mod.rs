//! Pure decision logic: alert rules, cooldown gate, message text.

pub mod cooldown;
pub mod evaluator;
pub mod message;

pub use cooldown::{record_fire, should_fire};
pub use evaluator::{evaluate_owned, evaluate_universe_entry, evaluate_watch_fixed, AlertHit};
