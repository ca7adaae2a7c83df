//! Test data builders
//!
//! Builders with sensible defaults so tests only spell out the fields they
//! care about.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_lending::{Loan, NewLoan, PropertyType};

/// Builder for loan applications
pub struct LoanBuilder {
    borrower_name: String,
    borrower_email: String,
    borrower_phone: Option<String>,
    property_type: PropertyType,
    property_size_sqft: i32,
    property_age_years: i32,
    property_address: Option<String>,
    loan_amount: Decimal,
}

impl Default for LoanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoanBuilder {
    /// Creates a builder for a plausible office loan
    pub fn new() -> Self {
        Self {
            borrower_name: "Avery Collins".to_string(),
            borrower_email: "avery.collins@example.com".to_string(),
            borrower_phone: Some("+1-512-555-0170".to_string()),
            property_type: PropertyType::Office,
            property_size_sqft: 10_000,
            property_age_years: 5,
            property_address: Some("200 Congress Ave, Austin TX".to_string()),
            loan_amount: dec!(1_000_000),
        }
    }

    pub fn with_borrower_name(mut self, name: impl Into<String>) -> Self {
        self.borrower_name = name.into();
        self
    }

    pub fn with_borrower_email(mut self, email: impl Into<String>) -> Self {
        self.borrower_email = email.into();
        self
    }

    pub fn with_property_type(mut self, property_type: PropertyType) -> Self {
        self.property_type = property_type;
        self
    }

    pub fn with_property_size_sqft(mut self, size: i32) -> Self {
        self.property_size_sqft = size;
        self
    }

    pub fn with_property_age_years(mut self, age: i32) -> Self {
        self.property_age_years = age;
        self
    }

    pub fn with_loan_amount(mut self, amount: Decimal) -> Self {
        self.loan_amount = amount;
        self
    }

    /// Builds the creation payload
    pub fn build_new(self) -> NewLoan {
        NewLoan {
            borrower_name: self.borrower_name,
            borrower_email: self.borrower_email,
            borrower_phone: self.borrower_phone,
            property_type: self.property_type,
            property_size_sqft: self.property_size_sqft,
            property_age_years: self.property_age_years,
            property_address: self.property_address,
            loan_amount: self.loan_amount,
        }
    }

    /// Builds a draft loan
    ///
    /// # Panics
    ///
    /// Panics if the configured fields do not validate; tests that exercise
    /// invalid input should go through `build_new` and `Loan::create`.
    pub fn build(self) -> Loan {
        Loan::create(self.build_new()).expect("builder defaults must produce a valid loan")
    }
}
