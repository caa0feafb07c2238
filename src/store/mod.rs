//! Persistence of the three JSON documents: instrument list, watch
//! configuration, and alert state.
//!
//! Reads are forgiving: a missing or corrupt document falls back to its
//! empty default so one bad edit never takes the watcher down. Writes are
//! pretty-printed to keep the files human-diffable.

use crate::config::Config;
use crate::domain::{ConditionKey, Instrument, Symbol, WatchConfig};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize {path}: {source}")]
    Serialize {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One fired-alert record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub last_alert_iso: String,
}

/// The persisted alert-state document: last-fired timestamps keyed by the
/// rendered condition key, plus the command-processing cursor.
///
/// Keys are kept as rendered strings in memory too, so records written by
/// an older or foreign version survive a load/save cycle untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertState {
    #[serde(default)]
    pub alerts: BTreeMap<String, AlertRecord>,
    /// Highest inbound command id consumed so far. Absent means "from the
    /// beginning".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_id: Option<i64>,
}

impl AlertState {
    pub fn last_alert(&self, key: &ConditionKey) -> Option<&str> {
        self.alerts
            .get(&key.storage_key())
            .map(|r| r.last_alert_iso.as_str())
    }

    /// Overwrite the record for `key`. The single write path to alert state.
    pub fn record_alert(&mut self, key: &ConditionKey, iso: String) {
        self.alerts
            .insert(key.storage_key(), AlertRecord { last_alert_iso: iso });
    }

    /// Advance the cursor, never moving it backwards.
    pub fn advance_cursor(&mut self, id: i64) {
        if self.last_update_id.map_or(true, |cur| id > cur) {
            self.last_update_id = Some(id);
        }
    }
}

/// File-backed store for the persisted documents.
#[derive(Debug, Clone)]
pub struct Store {
    holdings_path: String,
    config_path: String,
    state_path: String,
}

impl Store {
    pub fn new(config: &Config) -> Self {
        Self {
            holdings_path: config.holdings_path.clone(),
            config_path: config.config_path.clone(),
            state_path: config.state_path.clone(),
        }
    }

    pub fn load_instruments(&self) -> Vec<Instrument> {
        load_or_default(&self.holdings_path)
    }

    pub fn save_instruments(&self, instruments: &[Instrument]) -> Result<(), StoreError> {
        save_json(&self.holdings_path, &instruments)
    }

    pub fn load_watch_config(&self) -> WatchConfig {
        load_or_default(&self.config_path)
    }

    pub fn load_state(&self) -> AlertState {
        load_or_default(&self.state_path)
    }

    pub fn save_state(&self, state: &AlertState) -> Result<(), StoreError> {
        save_json(&self.state_path, state)
    }

    /// Load a universe symbol file: a JSON array of symbol strings.
    /// Missing or corrupt file yields an empty list.
    pub fn load_universe_symbols(&self, path: &str) -> Vec<Symbol> {
        load_or_default::<Vec<Symbol>>(path)
    }
}

fn load_or_default<T: DeserializeOwned + Default>(path: &str) -> T {
    if !Path::new(path).exists() {
        return T::default();
    }
    match std::fs::read_to_string(path) {
        Ok(text) => match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                warn!("Corrupt document at {}, using default: {}", path, e);
                T::default()
            }
        },
        Err(e) => {
            warn!("Unreadable document at {}, using default: {}", path, e);
            T::default()
        }
    }
}

fn save_json<T: Serialize>(path: &str, value: &T) -> Result<(), StoreError> {
    let text = serde_json::to_string_pretty(value).map_err(|source| StoreError::Serialize {
        path: path.to_string(),
        source,
    })?;
    std::fs::write(path, text).map_err(|source| StoreError::Write {
        path: path.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Decimal;

    fn store_in(dir: &Path) -> Store {
        Store {
            holdings_path: dir.join("holdings.json").to_string_lossy().into_owned(),
            config_path: dir.join("config.json").to_string_lossy().into_owned(),
            state_path: dir.join("state.json").to_string_lossy().into_owned(),
        }
    }

    #[test]
    fn test_missing_documents_default_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        assert!(store.load_instruments().is_empty());
        assert!(store.load_watch_config().universes.is_empty());
        assert_eq!(store.load_state(), AlertState::default());
    }

    #[test]
    fn test_corrupt_state_defaults_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        std::fs::write(dir.path().join("state.json"), "{not json").unwrap();
        assert_eq!(store.load_state(), AlertState::default());
    }

    #[test]
    fn test_state_roundtrip_preserves_foreign_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        std::fs::write(
            dir.path().join("state.json"),
            r#"{"alerts": {"legacy::key": {"last_alert_iso": "2020-01-01T00:00:00+00:00"}}}"#,
        )
        .unwrap();

        let mut state = store.load_state();
        let key = ConditionKey::OwnedRise {
            symbol: Symbol::new("AAPL"),
        };
        state.record_alert(&key, "2024-03-01T10:00:00+01:00".to_string());
        store.save_state(&state).unwrap();

        let reloaded = store.load_state();
        assert!(reloaded.alerts.contains_key("legacy::key"));
        assert_eq!(
            reloaded.last_alert(&key),
            Some("2024-03-01T10:00:00+01:00")
        );
    }

    #[test]
    fn test_record_alert_overwrites_not_appends() {
        let mut state = AlertState::default();
        let key = ConditionKey::WatchDropFixed {
            symbol: Symbol::new("BBB"),
        };
        state.record_alert(&key, "2024-01-01T00:00:00+00:00".to_string());
        state.record_alert(&key, "2024-02-01T00:00:00+00:00".to_string());
        assert_eq!(state.alerts.len(), 1);
        assert_eq!(state.last_alert(&key), Some("2024-02-01T00:00:00+00:00"));
    }

    #[test]
    fn test_cursor_never_moves_backwards() {
        let mut state = AlertState::default();
        state.advance_cursor(10);
        state.advance_cursor(7);
        assert_eq!(state.last_update_id, Some(10));
        state.advance_cursor(12);
        assert_eq!(state.last_update_id, Some(12));
    }

    #[test]
    fn test_instruments_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let list = vec![Instrument::owned(
            Symbol::new("AAPL"),
            Decimal::from_str_canonical("150").unwrap(),
            None,
        )];
        store.save_instruments(&list).unwrap();
        assert_eq!(store.load_instruments(), list);
    }

    #[test]
    fn test_universe_symbols_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let path = dir.path().join("aex.json");
        std::fs::write(&path, r#"["asml.as", " AD.AS "]"#).unwrap();
        let symbols = store.load_universe_symbols(&path.to_string_lossy());
        assert_eq!(symbols, vec![Symbol::new("ASML.AS"), Symbol::new("AD.AS")]);
    }
}
