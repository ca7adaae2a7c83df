//! Loan field validation
//!
//! Validation runs inside the aggregate on create and update, before any
//! persistence, so malformed applications never reach the store.

use crate::loan::Loan;

/// Result of loan validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// List of validation errors; empty when the loan is valid
    pub errors: Vec<String>,
    /// Whether the loan is valid
    pub is_valid: bool,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            errors: Vec::new(),
            is_valid: true,
        }
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.is_valid = false;
    }
}

/// Validator for loan applications
pub struct LoanValidator;

impl LoanValidator {
    /// Validates a loan against the aggregate invariants
    pub fn validate(loan: &Loan) -> ValidationResult {
        let mut result = ValidationResult::ok();

        if loan.borrower_name.trim().is_empty() {
            result.add_error("borrower name is required");
        }

        if !is_plausible_email(&loan.borrower_email) {
            result.add_error(format!("invalid email format: {}", loan.borrower_email));
        }

        if let Some(ref phone) = loan.borrower_phone {
            if phone.trim().is_empty() {
                result.add_error("borrower phone cannot be empty");
            }
        }

        if loan.property_size_sqft <= 0 {
            result.add_error("property size must be greater than 0");
        }

        if loan.property_age_years < 0 {
            result.add_error("property age cannot be negative");
        }

        if loan.loan_amount <= rust_decimal::Decimal::ZERO {
            result.add_error("loan amount must be greater than 0");
        }

        result
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::{LoanStatus, PropertyType};
    use chrono::Utc;
    use core_kernel::LoanId;
    use rust_decimal_macros::dec;

    fn valid_loan() -> Loan {
        let now = Utc::now();
        Loan {
            id: LoanId::new(),
            borrower_name: "Avery Collins".to_string(),
            borrower_email: "avery.collins@example.com".to_string(),
            borrower_phone: Some("+1-512-555-0170".to_string()),
            property_type: PropertyType::Retail,
            property_size_sqft: 25_000,
            property_age_years: 12,
            property_address: None,
            loan_amount: dec!(2_500_000),
            status: LoanStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_valid_loan_passes() {
        let result = LoanValidator::validate(&valid_loan());
        assert!(result.is_valid, "errors: {:?}", result.errors);
    }

    #[test]
    fn test_blank_name_fails() {
        let mut loan = valid_loan();
        loan.borrower_name = "   ".to_string();
        let result = LoanValidator::validate(&loan);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("name")));
    }

    #[test]
    fn test_malformed_emails_fail() {
        for email in ["plainaddress", "@no-local.com", "user@nodot", "user@.com"] {
            let mut loan = valid_loan();
            loan.borrower_email = email.to_string();
            let result = LoanValidator::validate(&loan);
            assert!(!result.is_valid, "{} should be rejected", email);
        }
    }

    #[test]
    fn test_non_positive_size_fails() {
        let mut loan = valid_loan();
        loan.property_size_sqft = 0;
        assert!(!LoanValidator::validate(&loan).is_valid);
    }

    #[test]
    fn test_negative_age_fails() {
        let mut loan = valid_loan();
        loan.property_age_years = -1;
        assert!(!LoanValidator::validate(&loan).is_valid);
    }

    #[test]
    fn test_non_positive_amount_fails() {
        let mut loan = valid_loan();
        loan.loan_amount = dec!(-100);
        let result = LoanValidator::validate(&loan);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("amount")));
    }

    #[test]
    fn test_errors_accumulate() {
        let mut loan = valid_loan();
        loan.borrower_name = String::new();
        loan.property_size_sqft = -5;
        let result = LoanValidator::validate(&loan);
        assert_eq!(result.errors.len(), 2);
    }
}
