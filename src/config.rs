// src/config.rs
use anyhow::{Context, Result};
use log::{info, warn};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 3030;
pub const DEFAULT_SNAPSHOT_DIR: &str = "data";
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.04;
pub const DEFAULT_MARKET_RETURN: f64 = 0.10;
pub const DEFAULT_GROWTH_RATE: f64 = 0.08;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub snapshot_dir: PathBuf,
    pub risk_free_rate: f64,
    pub market_return: f64,
    pub growth_rate: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            port: DEFAULT_PORT,
            snapshot_dir: PathBuf::from(DEFAULT_SNAPSHOT_DIR),
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            market_return: DEFAULT_MARKET_RETURN,
            growth_rate: DEFAULT_GROWTH_RATE,
        }
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr + std::fmt::Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} must be a number, got '{}'", key, raw)),
        Err(_) => {
            warn!("${} not set, defaulting to {}", key, default);
            Ok(default)
        }
    }
}

impl AppConfig {
    /// Reads the process environment. Call `dotenv().ok()` first to pick up a
    /// local `.env`.
    pub fn from_env() -> Result<Self> {
        let snapshot_dir = env::var("SNAPSHOT_DIR").unwrap_or_else(|_| {
            warn!("$SNAPSHOT_DIR not set, defaulting to {}", DEFAULT_SNAPSHOT_DIR);
            DEFAULT_SNAPSHOT_DIR.to_string()
        });

        let config = AppConfig {
            port: env_or("PORT", DEFAULT_PORT)?,
            snapshot_dir: PathBuf::from(snapshot_dir),
            risk_free_rate: env_or("RISK_FREE_RATE", DEFAULT_RISK_FREE_RATE)?,
            market_return: env_or("MARKET_RETURN", DEFAULT_MARKET_RETURN)?,
            growth_rate: env_or("GROWTH_RATE", DEFAULT_GROWTH_RATE)?,
        };
        info!("Loaded configuration: {:?}", config);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_variable_uses_default() {
        let value: f64 = env_or("EQUITY_VALUATION_TEST_UNSET", 0.07).unwrap();
        assert_eq!(value, 0.07);
    }

    #[test]
    fn test_set_variable_is_parsed() {
        env::set_var("EQUITY_VALUATION_TEST_RATE", " 0.055 ");
        let value: f64 = env_or("EQUITY_VALUATION_TEST_RATE", 0.04).unwrap();
        assert_eq!(value, 0.055);
    }

    #[test]
    fn test_malformed_variable_is_error() {
        env::set_var("EQUITY_VALUATION_TEST_PORT", "eighty");
        let err = env_or::<u16>("EQUITY_VALUATION_TEST_PORT", DEFAULT_PORT).unwrap_err();
        assert!(err.to_string().contains("EQUITY_VALUATION_TEST_PORT must be a number"));
    }
}
