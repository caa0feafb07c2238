//! Cooldown gate: suppresses a condition that fired too recently.

use crate::domain::ConditionKey;
use crate::store::AlertState;
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::debug;

/// Parse a stored timestamp. RFC 3339 first; a naive timestamp (no offset)
/// is assumed UTC. `None` means unparseable.
fn parse_stored(iso: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// True when the gate is open for `key` at `now`.
///
/// Closed only when a prior timestamp exists, parses, and lies within the
/// cooldown window. A corrupt or foreign-format timestamp opens the gate:
/// durability over strictness.
pub fn should_fire(
    state: &AlertState,
    key: &ConditionKey,
    now: DateTime<Tz>,
    cooldown_minutes: i64,
) -> bool {
    let Some(iso) = state.last_alert(key) else {
        return true;
    };
    let Some(last) = parse_stored(iso) else {
        debug!("Unparseable stored timestamp for {}, gate open", key);
        return true;
    };
    now.with_timezone(&Utc) - last >= Duration::minutes(cooldown_minutes)
}

/// Record a fire at `now` for `key`, full ISO 8601 with offset.
pub fn record_fire(state: &mut AlertState, key: &ConditionKey, now: DateTime<Tz>) {
    state.record_alert(key, now.to_rfc3339());
}
