//! API configuration

use rust_decimal::Decimal;
use serde::Deserialize;

use domain_lending::{DEFAULT_APPROVAL_THRESHOLD, DEFAULT_VALUATION_TIMEOUT_MS};

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL
    pub database_url: String,
    /// Base URL of the valuation calculator
    pub valuation_url: String,
    /// Timeout for the valuation call in milliseconds
    pub valuation_timeout_ms: u64,
    /// LTV approval threshold percentage
    pub ltv_approval_threshold: Decimal,
    /// Log level
    pub log_level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/lending".to_string(),
            valuation_url: "http://localhost:8000".to_string(),
            valuation_timeout_ms: DEFAULT_VALUATION_TIMEOUT_MS,
            ltv_approval_threshold: DEFAULT_APPROVAL_THRESHOLD,
            log_level: "info".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_`-prefixed environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server bind address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.valuation_timeout_ms, 5_000);
        assert_eq!(config.ltv_approval_threshold, dec!(75));
    }
}
