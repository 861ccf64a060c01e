use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://paper-api.alpaca.markets";
pub const DEFAULT_DATA_URL: &str = "https://data.alpaca.markets";

/// All configuration loaded from environment variables at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // Broker credentials
    pub api_key: String,
    pub secret_key: String,

    // Endpoints
    pub base_url: String,
    pub data_url: String,

    // Optional TOML file with detector parameters
    pub strategy_config_path: Option<String>,
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present. Fails on any missing required variable.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // ignore error if .env not present
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).filter(|v| !v.trim().is_empty()).ok_or_else(|| {
                Error::Config(format!(
                    "API credentials not set: environment variable '{key}' is missing"
                ))
            })
        };

        Ok(Config {
            api_key: required("APCA_API_KEY_ID")?,
            secret_key: required("APCA_API_SECRET_KEY")?,
            base_url: lookup("APCA_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            data_url: lookup("APCA_DATA_URL").unwrap_or_else(|| DEFAULT_DATA_URL.to_string()),
            strategy_config_path: lookup("STRATEGY_CONFIG_PATH"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_paper_endpoint() {
        let cfg = Config::from_lookup(env(&[
            ("APCA_API_KEY_ID", "key"),
            ("APCA_API_SECRET_KEY", "secret"),
        ]))
        .unwrap();
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.data_url, DEFAULT_DATA_URL);
        assert!(cfg.strategy_config_path.is_none());
    }

    #[test]
    fn missing_secret_is_a_config_error() {
        let err = Config::from_lookup(env(&[("APCA_API_KEY_ID", "key")])).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("APCA_API_SECRET_KEY")));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let err = Config::from_lookup(env(&[
            ("APCA_API_KEY_ID", "  "),
            ("APCA_API_SECRET_KEY", "secret"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn overrides_are_honoured() {
        let cfg = Config::from_lookup(env(&[
            ("APCA_API_KEY_ID", "key"),
            ("APCA_API_SECRET_KEY", "secret"),
            ("APCA_API_BASE_URL", "https://api.alpaca.markets"),
            ("STRATEGY_CONFIG_PATH", "config/strategies.toml"),
        ]))
        .unwrap();
        assert_eq!(cfg.base_url, "https://api.alpaca.markets");
        assert_eq!(cfg.strategy_config_path.as_deref(), Some("config/strategies.toml"));
    }
}
