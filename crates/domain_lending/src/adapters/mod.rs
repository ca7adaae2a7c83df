//! Adapters for external collaborators

mod http_valuator;

pub use http_valuator::{HttpValuationClient, ValuatorConfig, DEFAULT_VALUATION_TIMEOUT_MS};
