//! Loan DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain_lending::{
    Loan, LoanUpdate, LoanWithValuation, NewLoan, PropertyType, Valuation,
};

/// Request to create a loan application
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLoanRequest {
    #[validate(length(min = 1, message = "borrower name is required"))]
    pub borrower_name: String,
    #[validate(email(message = "borrower email must be a valid address"))]
    pub borrower_email: String,
    pub borrower_phone: Option<String>,
    pub property_type: PropertyType,
    #[validate(range(min = 1, message = "property size must be greater than 0"))]
    pub property_size_sqft: i32,
    #[validate(range(min = 0, message = "property age cannot be negative"))]
    pub property_age_years: i32,
    pub property_address: Option<String>,
    pub loan_amount: Decimal,
}

impl From<CreateLoanRequest> for NewLoan {
    fn from(request: CreateLoanRequest) -> Self {
        NewLoan {
            borrower_name: request.borrower_name,
            borrower_email: request.borrower_email,
            borrower_phone: request.borrower_phone,
            property_type: request.property_type,
            property_size_sqft: request.property_size_sqft,
            property_age_years: request.property_age_years,
            property_address: request.property_address,
            loan_amount: request.loan_amount,
        }
    }
}

/// Request to update a draft loan; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateLoanRequest {
    #[validate(length(min = 1, message = "borrower name cannot be blank"))]
    pub borrower_name: Option<String>,
    #[validate(email(message = "borrower email must be a valid address"))]
    pub borrower_email: Option<String>,
    #[serde(default, with = "double_option")]
    pub borrower_phone: Option<Option<String>>,
    pub property_type: Option<PropertyType>,
    #[validate(range(min = 1, message = "property size must be greater than 0"))]
    pub property_size_sqft: Option<i32>,
    #[validate(range(min = 0, message = "property age cannot be negative"))]
    pub property_age_years: Option<i32>,
    #[serde(default, with = "double_option")]
    pub property_address: Option<Option<String>>,
    pub loan_amount: Option<Decimal>,
}

/// Distinguishes an absent field (leave unchanged) from an explicit null
/// (clear the value)
mod double_option {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer).map(Some)
    }

    #[allow(dead_code)]
    pub fn serialize<S>(value: &Option<Option<String>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(Some(inner)) => serializer.serialize_some(inner),
            _ => serializer.serialize_none(),
        }
    }
}

impl From<UpdateLoanRequest> for LoanUpdate {
    fn from(request: UpdateLoanRequest) -> Self {
        LoanUpdate {
            borrower_name: request.borrower_name,
            borrower_email: request.borrower_email,
            borrower_phone: request.borrower_phone,
            property_type: request.property_type,
            property_size_sqft: request.property_size_sqft,
            property_age_years: request.property_age_years,
            property_address: request.property_address,
            loan_amount: request.loan_amount,
        }
    }
}

/// A loan application as returned by the API
#[derive(Debug, Serialize)]
pub struct LoanResponse {
    pub id: Uuid,
    pub borrower_name: String,
    pub borrower_email: String,
    pub borrower_phone: Option<String>,
    pub property_type: PropertyType,
    pub property_size_sqft: i32,
    pub property_age_years: i32,
    pub property_address: Option<String>,
    pub loan_amount: Decimal,
    pub status: domain_lending::LoanStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Loan> for LoanResponse {
    fn from(loan: Loan) -> Self {
        Self {
            id: *loan.id.as_uuid(),
            borrower_name: loan.borrower_name,
            borrower_email: loan.borrower_email,
            borrower_phone: loan.borrower_phone,
            property_type: loan.property_type,
            property_size_sqft: loan.property_size_sqft,
            property_age_years: loan.property_age_years,
            property_address: loan.property_address,
            loan_amount: loan.loan_amount,
            status: loan.status,
            created_at: loan.created_at,
            updated_at: loan.updated_at,
        }
    }
}

/// A valuation as returned by the API
#[derive(Debug, Serialize)]
pub struct ValuationResponse {
    pub id: Uuid,
    pub loan_id: Uuid,
    pub estimated_value: Decimal,
    pub ltv_ratio: Decimal,
    pub decision: domain_lending::LoanDecision,
    pub valuated_at: DateTime<Utc>,
    pub methodology: Option<String>,
}

impl From<Valuation> for ValuationResponse {
    fn from(valuation: Valuation) -> Self {
        Self {
            id: *valuation.id.as_uuid(),
            loan_id: *valuation.loan_id.as_uuid(),
            estimated_value: valuation.estimated_value,
            ltv_ratio: valuation.ltv_ratio,
            decision: valuation.decision,
            valuated_at: valuation.valuated_at,
            methodology: valuation.methodology,
        }
    }
}

/// A loan with its valuation, if one exists
#[derive(Debug, Serialize)]
pub struct LoanWithValuationResponse {
    #[serde(flatten)]
    pub loan: LoanResponse,
    pub valuation: Option<ValuationResponse>,
}

impl From<LoanWithValuation> for LoanWithValuationResponse {
    fn from(entry: LoanWithValuation) -> Self {
        Self {
            loan: entry.loan.into(),
            valuation: entry.valuation.map(Into::into),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use validator::Validate;

    #[test]
    fn test_create_request_validation() {
        let request = CreateLoanRequest {
            borrower_name: "Avery Collins".to_string(),
            borrower_email: "avery.collins@example.com".to_string(),
            borrower_phone: None,
            property_type: PropertyType::Office,
            property_size_sqft: 10_000,
            property_age_years: 5,
            property_address: None,
            loan_amount: dec!(1_000_000),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_bad_email_and_size() {
        let request = CreateLoanRequest {
            borrower_name: "Avery Collins".to_string(),
            borrower_email: "nope".to_string(),
            borrower_phone: None,
            property_type: PropertyType::Office,
            property_size_sqft: 0,
            property_age_years: 5,
            property_address: None,
            loan_amount: dec!(1_000_000),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("borrower_email"));
        assert!(errors.field_errors().contains_key("property_size_sqft"));
    }

    #[test]
    fn test_update_request_distinguishes_absent_from_null() {
        let absent: UpdateLoanRequest = serde_json::from_str("{}").unwrap();
        assert!(absent.borrower_phone.is_none());

        let cleared: UpdateLoanRequest =
            serde_json::from_str(r#"{"borrower_phone": null}"#).unwrap();
        assert_eq!(cleared.borrower_phone, Some(None));

        let set: UpdateLoanRequest =
            serde_json::from_str(r#"{"borrower_phone": "+1-512-555-0170"}"#).unwrap();
        assert_eq!(set.borrower_phone, Some(Some("+1-512-555-0170".to_string())));
    }
}
