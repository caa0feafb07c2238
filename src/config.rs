use crate::domain::Decimal;
use chrono_tz::Tz;
use std::collections::HashMap;
use thiserror::Error;

/// Immutable run configuration, built once at process entry and threaded
/// into every component as a parameter.
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token. Mandatory.
    pub telegram_token: String,
    /// The single chat identity whose messages are honored and that
    /// receives all notifications. Mandatory.
    pub telegram_chat_id: String,
    pub default_rise_pct: Decimal,
    pub default_drop_pct: Decimal,
    pub cooldown_minutes_watch: i64,
    pub cooldown_minutes_owned: i64,
    pub holdings_path: String,
    pub config_path: String,
    pub state_path: String,
    /// Reference timezone for cooldown math and message timestamps.
    pub timezone: Tz,
    pub telegram_api_url: String,
    pub quote_api_url: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

fn required(env_map: &HashMap<String, String>, key: &str) -> Result<String, ConfigError> {
    env_map
        .get(key)
        .filter(|v| !v.trim().is_empty())
        .cloned()
        .ok_or_else(|| ConfigError::MissingEnv(key.to_string()))
}

fn decimal_or(
    env_map: &HashMap<String, String>,
    key: &str,
    fallback: &str,
) -> Result<Decimal, ConfigError> {
    let raw = env_map.get(key).map(|s| s.as_str()).unwrap_or(fallback);
    Decimal::from_str_canonical(raw).map_err(|_| {
        ConfigError::InvalidValue(key.to_string(), "must be a decimal number".to_string())
    })
}

fn minutes_or(
    env_map: &HashMap<String, String>,
    key: &str,
    fallback: i64,
) -> Result<i64, ConfigError> {
    match env_map.get(key) {
        None => Ok(fallback),
        Some(raw) => raw.parse::<i64>().map_err(|_| {
            ConfigError::InvalidValue(key.to_string(), "must be an integer minute count".to_string())
        }),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let telegram_token = required(&env_map, "TELEGRAM_TOKEN")?;
        let telegram_chat_id = required(&env_map, "TELEGRAM_CHAT_ID")?;

        let default_rise_pct = decimal_or(&env_map, "DEFAULT_RISE_PCT", "10")?;
        let default_drop_pct = decimal_or(&env_map, "DEFAULT_DROP_PCT", "5")?;
        let cooldown_minutes_watch = minutes_or(&env_map, "COOLDOWN_MINUTES_WATCH", 720)?;
        let cooldown_minutes_owned = minutes_or(&env_map, "COOLDOWN_MINUTES_OWNED", 1440)?;

        let holdings_path = env_map
            .get("HOLDINGS_PATH")
            .cloned()
            .unwrap_or_else(|| "holdings.json".to_string());
        let config_path = env_map
            .get("CONFIG_PATH")
            .cloned()
            .unwrap_or_else(|| "config.json".to_string());
        let state_path = env_map
            .get("STATE_PATH")
            .cloned()
            .unwrap_or_else(|| "state.json".to_string());

        let tz_name = env_map
            .get("TIMEZONE")
            .map(|s| s.as_str())
            .unwrap_or("Europe/Amsterdam");
        let timezone = tz_name.parse::<Tz>().map_err(|_| {
            ConfigError::InvalidValue(
                "TIMEZONE".to_string(),
                format!("unknown IANA timezone: {}", tz_name),
            )
        })?;

        let telegram_api_url = env_map
            .get("TELEGRAM_API_URL")
            .cloned()
            .unwrap_or_else(|| "https://api.telegram.org".to_string());
        let quote_api_url = env_map
            .get("QUOTE_API_URL")
            .cloned()
            .unwrap_or_else(|| "https://query1.finance.yahoo.com".to_string());

        Ok(Config {
            telegram_token,
            telegram_chat_id,
            default_rise_pct,
            default_drop_pct,
            cooldown_minutes_watch,
            cooldown_minutes_owned,
            holdings_path,
            config_path,
            state_path,
            timezone,
            telegram_api_url,
            quote_api_url,
        })
    }
}
