//! Loan aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use core_kernel::LoanId;

use crate::error::LendingError;
use crate::validation::LoanValidator;

/// Raised when a persisted enum value no longer matches any known variant
#[derive(Debug, Clone, Error)]
#[error("unrecognized value: {0}")]
pub struct UnrecognizedValue(pub String);

/// Commercial property type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    Multifamily,
    Retail,
    Office,
    Industrial,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Multifamily => "MULTIFAMILY",
            PropertyType::Retail => "RETAIL",
            PropertyType::Office => "OFFICE",
            PropertyType::Industrial => "INDUSTRIAL",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = UnrecognizedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MULTIFAMILY" => Ok(PropertyType::Multifamily),
            "RETAIL" => Ok(PropertyType::Retail),
            "OFFICE" => Ok(PropertyType::Office),
            "INDUSTRIAL" => Ok(PropertyType::Industrial),
            other => Err(UnrecognizedValue(other.to_string())),
        }
    }
}

/// Loan application status
///
/// A loan starts in `Draft`, moves to `PendingValuation` when a valuation is
/// requested, and ends in `Approved` or `Rejected`. A failed valuation
/// attempt reverts the loan to `Draft` so the request can be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    Draft,
    PendingValuation,
    Approved,
    Rejected,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Draft => "DRAFT",
            LoanStatus::PendingValuation => "PENDING_VALUATION",
            LoanStatus::Approved => "APPROVED",
            LoanStatus::Rejected => "REJECTED",
        }
    }

    /// Terminal states are immutable and undeletable through the normal flow
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoanStatus::Approved | LoanStatus::Rejected)
    }

    /// Checks whether a transition to the target status is allowed
    pub fn can_transition_to(&self, target: LoanStatus) -> bool {
        use LoanStatus::*;
        matches!(
            (self, target),
            (Draft, PendingValuation)
                | (PendingValuation, Approved)
                | (PendingValuation, Rejected)
                | (PendingValuation, Draft)
        )
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = UnrecognizedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(LoanStatus::Draft),
            "PENDING_VALUATION" => Ok(LoanStatus::PendingValuation),
            "APPROVED" => Ok(LoanStatus::Approved),
            "REJECTED" => Ok(LoanStatus::Rejected),
            other => Err(UnrecognizedValue(other.to_string())),
        }
    }
}

/// A commercial real-estate loan application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    /// Unique identifier, assigned at creation
    pub id: LoanId,
    /// Borrower name
    pub borrower_name: String,
    /// Borrower email
    pub borrower_email: String,
    /// Borrower phone
    pub borrower_phone: Option<String>,
    /// Type of commercial property
    pub property_type: PropertyType,
    /// Property size in square feet
    pub property_size_sqft: i32,
    /// Property age in years
    pub property_age_years: i32,
    /// Property address
    pub property_address: Option<String>,
    /// Requested loan amount
    pub loan_amount: Decimal,
    /// Status
    pub status: LoanStatus,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new loan application
#[derive(Debug, Clone)]
pub struct NewLoan {
    pub borrower_name: String,
    pub borrower_email: String,
    pub borrower_phone: Option<String>,
    pub property_type: PropertyType,
    pub property_size_sqft: i32,
    pub property_age_years: i32,
    pub property_address: Option<String>,
    pub loan_amount: Decimal,
}

/// Partial update of a draft loan; `None` leaves the field unchanged
#[derive(Debug, Clone, Default)]
pub struct LoanUpdate {
    pub borrower_name: Option<String>,
    pub borrower_email: Option<String>,
    pub borrower_phone: Option<Option<String>>,
    pub property_type: Option<PropertyType>,
    pub property_size_sqft: Option<i32>,
    pub property_age_years: Option<i32>,
    pub property_address: Option<Option<String>>,
    pub loan_amount: Option<Decimal>,
}

impl Loan {
    /// Creates a new loan application in `Draft` status
    ///
    /// # Errors
    ///
    /// Returns `LendingError::Validation` if any field violates the
    /// aggregate invariants (empty name, malformed email, non-positive
    /// size or amount, negative age).
    pub fn create(new: NewLoan) -> Result<Self, LendingError> {
        let now = Utc::now();
        let loan = Self {
            id: LoanId::new(),
            borrower_name: new.borrower_name,
            borrower_email: new.borrower_email,
            borrower_phone: new.borrower_phone,
            property_type: new.property_type,
            property_size_sqft: new.property_size_sqft,
            property_age_years: new.property_age_years,
            property_address: new.property_address,
            loan_amount: new.loan_amount,
            status: LoanStatus::Draft,
            created_at: now,
            updated_at: now,
        };
        loan.validate()?;
        Ok(loan)
    }

    /// Applies a partial update
    ///
    /// Only draft loans are editable. The updated aggregate is re-validated
    /// as a whole before the change is accepted.
    pub fn apply_update(&mut self, update: LoanUpdate) -> Result<(), LendingError> {
        if self.status != LoanStatus::Draft {
            return Err(LendingError::invalid_state(
                self.status,
                "only draft loans can be updated",
            ));
        }

        let mut updated = self.clone();
        if let Some(name) = update.borrower_name {
            updated.borrower_name = name;
        }
        if let Some(email) = update.borrower_email {
            updated.borrower_email = email;
        }
        if let Some(phone) = update.borrower_phone {
            updated.borrower_phone = phone;
        }
        if let Some(property_type) = update.property_type {
            updated.property_type = property_type;
        }
        if let Some(size) = update.property_size_sqft {
            updated.property_size_sqft = size;
        }
        if let Some(age) = update.property_age_years {
            updated.property_age_years = age;
        }
        if let Some(address) = update.property_address {
            updated.property_address = address;
        }
        if let Some(amount) = update.loan_amount {
            updated.loan_amount = amount;
        }
        updated.validate()?;
        updated.updated_at = Utc::now();

        *self = updated;
        Ok(())
    }

    fn validate(&self) -> Result<(), LendingError> {
        let result = LoanValidator::validate(self);
        if result.is_valid {
            Ok(())
        } else {
            Err(LendingError::Validation(result.errors.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn new_loan() -> NewLoan {
        NewLoan {
            borrower_name: "Avery Collins".to_string(),
            borrower_email: "avery.collins@example.com".to_string(),
            borrower_phone: None,
            property_type: PropertyType::Office,
            property_size_sqft: 10_000,
            property_age_years: 5,
            property_address: Some("200 Congress Ave, Austin TX".to_string()),
            loan_amount: dec!(1_000_000),
        }
    }

    #[test]
    fn test_create_starts_in_draft() {
        let loan = Loan::create(new_loan()).unwrap();
        assert_eq!(loan.status, LoanStatus::Draft);
        assert_eq!(loan.created_at, loan.updated_at);
    }

    #[test]
    fn test_create_rejects_bad_email() {
        let mut new = new_loan();
        new.borrower_email = "not-an-email".to_string();
        let err = Loan::create(new).unwrap_err();
        assert!(matches!(err, LendingError::Validation(_)));
    }

    #[test]
    fn test_update_only_while_draft() {
        let mut loan = Loan::create(new_loan()).unwrap();
        loan.status = LoanStatus::Approved;
        let err = loan
            .apply_update(LoanUpdate {
                borrower_name: Some("Someone Else".to_string()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, LendingError::InvalidState { .. }));
    }

    #[test]
    fn test_update_rejects_invalid_amount_without_mutating() {
        let mut loan = Loan::create(new_loan()).unwrap();
        let err = loan
            .apply_update(LoanUpdate {
                loan_amount: Some(dec!(0)),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, LendingError::Validation(_)));
        assert_eq!(loan.loan_amount, dec!(1_000_000));
    }

    #[test]
    fn test_status_transitions() {
        use LoanStatus::*;
        assert!(Draft.can_transition_to(PendingValuation));
        assert!(PendingValuation.can_transition_to(Approved));
        assert!(PendingValuation.can_transition_to(Rejected));
        assert!(PendingValuation.can_transition_to(Draft));
        assert!(!Draft.can_transition_to(Approved));
        assert!(!Approved.can_transition_to(Draft));
        assert!(!Rejected.can_transition_to(PendingValuation));
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            LoanStatus::Draft,
            LoanStatus::PendingValuation,
            LoanStatus::Approved,
            LoanStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<LoanStatus>().unwrap(), status);
        }
        assert!("ARCHIVED".parse::<LoanStatus>().is_err());
    }

    #[test]
    fn test_property_type_serde_uses_wire_names() {
        let json = serde_json::to_string(&PropertyType::Multifamily).unwrap();
        assert_eq!(json, "\"MULTIFAMILY\"");
    }
}
