//! HTTP adapter for the external property valuation calculator
//!
//! Wraps the remote `/api/v1/valuate` call, enforcing a bounded wait and
//! normalizing every transport and protocol failure into the
//! `ValuationError` taxonomy:
//!
//! - deadline overrun -> `Timeout`
//! - non-success response -> `Rejected` (detail from the error payload)
//! - connection failure -> `Unreachable`
//! - everything else -> `Unknown`
//!
//! The adapter is stateless and idempotent: the calculator is a pure
//! function of the property attributes, so retried calls are safe.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::loan::PropertyType;
use crate::ports::{ValuationError, ValuationPort, ValuationRequest};
use crate::valuation::{EstimatedValuation, ValuationBreakdown};

/// Bounded wait for the remote call when none is configured
pub const DEFAULT_VALUATION_TIMEOUT_MS: u64 = 5_000;

/// Configuration for the valuation calculator adapter
#[derive(Debug, Clone)]
pub struct ValuatorConfig {
    /// Base URL of the calculator (e.g. "http://valuation:8000")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl ValuatorConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: DEFAULT_VALUATION_TIMEOUT_MS,
        }
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Client for the external valuation calculator
#[derive(Debug, Clone)]
pub struct HttpValuationClient {
    http: reqwest::Client,
    config: ValuatorConfig,
}

impl HttpValuationClient {
    /// Creates a client with the timeout baked into the connection pool
    pub fn new(config: ValuatorConfig) -> Result<Self, ValuationError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ValuationError::Unknown(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/api/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            path
        )
    }

    fn map_transport_error(&self, err: reqwest::Error) -> ValuationError {
        if err.is_timeout() {
            ValuationError::Timeout {
                timeout_ms: self.config.timeout_ms,
            }
        } else if err.is_connect() {
            ValuationError::Unreachable(err.to_string())
        } else {
            ValuationError::Unknown(err.to_string())
        }
    }
}

#[async_trait]
impl ValuationPort for HttpValuationClient {
    async fn request_valuation(
        &self,
        request: ValuationRequest,
    ) -> Result<EstimatedValuation, ValuationError> {
        let body = ValuateRequestBody {
            property_type: request.property_type,
            size_sqft: request.size_sqft,
            age_years: request.age_years,
        };

        tracing::debug!(
            property_type = %request.property_type,
            size_sqft = request.size_sqft,
            age_years = request.age_years,
            "requesting valuation"
        );

        let response = self
            .http
            .post(self.endpoint("valuate"))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorBody>()
                .await
                .map(|e| e.detail)
                .unwrap_or_else(|_| format!("status {status}"));
            return Err(ValuationError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        let payload: ValuateResponseBody = response
            .json()
            .await
            .map_err(|e| ValuationError::Unknown(format!("malformed valuation response: {e}")))?;

        Ok(payload.into())
    }

    async fn health_check(&self) -> bool {
        match self.http.get(self.endpoint("health")).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[derive(Debug, Serialize)]
struct ValuateRequestBody {
    property_type: PropertyType,
    size_sqft: i32,
    age_years: i32,
}

#[derive(Debug, Deserialize)]
struct ValuateResponseBody {
    estimated_value: Decimal,
    valuation_date: DateTime<Utc>,
    methodology: String,
    breakdown: BreakdownBody,
}

#[derive(Debug, Deserialize)]
struct BreakdownBody {
    base_value: Decimal,
    depreciation_factor: Decimal,
    final_value: Decimal,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

impl From<ValuateResponseBody> for EstimatedValuation {
    fn from(body: ValuateResponseBody) -> Self {
        Self {
            estimated_value: body.estimated_value,
            valuation_date: body.valuation_date,
            methodology: body.methodology,
            breakdown: ValuationBreakdown {
                base_value: body.breakdown.base_value,
                depreciation_factor: body.breakdown.depreciation_factor,
                final_value: body.breakdown.final_value,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_endpoint_joins_cleanly() {
        let client =
            HttpValuationClient::new(ValuatorConfig::new("http://valuation:8000/")).unwrap();
        assert_eq!(
            client.endpoint("valuate"),
            "http://valuation:8000/api/v1/valuate"
        );
        assert_eq!(
            client.endpoint("health"),
            "http://valuation:8000/api/v1/health"
        );
    }

    #[test]
    fn test_config_default_timeout() {
        let config = ValuatorConfig::new("http://valuation:8000");
        assert_eq!(config.timeout_ms, DEFAULT_VALUATION_TIMEOUT_MS);
        assert_eq!(config.timeout_ms(250).timeout_ms, 250);
    }

    #[test]
    fn test_request_body_wire_format() {
        let body = ValuateRequestBody {
            property_type: PropertyType::Office,
            size_sqft: 10_000,
            age_years: 5,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "property_type": "OFFICE",
                "size_sqft": 10000,
                "age_years": 5
            })
        );
    }

    #[test]
    fn test_response_body_parses_calculator_payload() {
        let raw = r#"{
            "estimated_value": 1710000.00,
            "valuation_date": "2024-12-11T10:30:00Z",
            "methodology": "Base rate ($180/sqft) with 5.0% age depreciation",
            "breakdown": {
                "base_value": 1800000.00,
                "depreciation_factor": 0.05,
                "final_value": 1710000.00
            }
        }"#;
        let body: ValuateResponseBody = serde_json::from_str(raw).unwrap();
        let estimate: EstimatedValuation = body.into();
        assert_eq!(estimate.estimated_value, dec!(1710000.00));
        assert_eq!(estimate.breakdown.depreciation_factor, dec!(0.05));
        assert!(estimate.methodology.contains("$180/sqft"));
    }

    #[test]
    fn test_error_body_parses_detail() {
        let raw = r#"{"detail": "Property size must be greater than 0", "error_code": null}"#;
        let body: ErrorBody = serde_json::from_str(raw).unwrap();
        assert_eq!(body.detail, "Property size must be greater than 0");
    }
}
