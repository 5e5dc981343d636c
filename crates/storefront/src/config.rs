//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the demo runs with no configuration at all.
//!
//! - `QUICKBASKET_DATA_DIR` - Directory for persisted session state
//!   (default: `.quickbasket`)
//! - `QUICKBASKET_TRACKING_INTERVAL_MS` - Milliseconds between tracking
//!   simulator ticks (default: 5000)
//! - `QUICKBASKET_CURRENCY` - ISO 4217 display currency (default: USD)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use quickbasket_core::CurrencyCode;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory where the JSON-file repository keeps its documents
    pub data_dir: PathBuf,
    /// Delay between order-tracking simulator ticks
    pub tracking_interval: Duration,
    /// Currency used for catalog prices and cart totals
    pub currency: CurrencyCode,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let data_dir = PathBuf::from(get_env_or_default("QUICKBASKET_DATA_DIR", ".quickbasket"));
        let interval_ms = get_env_or_default("QUICKBASKET_TRACKING_INTERVAL_MS", "5000")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar(
                    "QUICKBASKET_TRACKING_INTERVAL_MS".to_string(),
                    e.to_string(),
                )
            })?;
        let currency = parse_currency(&get_env_or_default("QUICKBASKET_CURRENCY", "USD"))?;

        Ok(Self {
            data_dir,
            tracking_interval: Duration::from_millis(interval_ms),
            currency,
        })
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".quickbasket"),
            tracking_interval: Duration::from_millis(5000),
            currency: CurrencyCode::USD,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_currency(value: &str) -> Result<CurrencyCode, ConfigError> {
    match value {
        "USD" => Ok(CurrencyCode::USD),
        "EUR" => Ok(CurrencyCode::EUR),
        "GBP" => Ok(CurrencyCode::GBP),
        "CAD" => Ok(CurrencyCode::CAD),
        "AUD" => Ok(CurrencyCode::AUD),
        other => Err(ConfigError::InvalidEnvVar(
            "QUICKBASKET_CURRENCY".to_string(),
            format!("unsupported currency: {other}"),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert_eq!(config.data_dir, PathBuf::from(".quickbasket"));
        assert_eq!(config.tracking_interval, Duration::from_millis(5000));
        assert_eq!(config.currency, CurrencyCode::USD);
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency("EUR").unwrap(), CurrencyCode::EUR);
        assert!(matches!(
            parse_currency("JPY"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }
}
