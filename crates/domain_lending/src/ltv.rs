//! Loan-to-Value decision engine
//!
//! Pure, deterministic translation from (loan amount, estimated property
//! value) to a ratio and a binary decision. No I/O, safe to call any number
//! of times with the same inputs.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use thiserror::Error;

use crate::valuation::LoanDecision;

/// Approval threshold used when none is configured: LTV must not exceed 75%
pub const DEFAULT_APPROVAL_THRESHOLD: Decimal = dec!(75);

/// Errors raised when the decision preconditions are violated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LtvError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result of one LTV decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LtvAssessment {
    /// `(loan_amount / property_value) * 100`, rounded half-up to 2 decimals
    pub ltv_ratio: Decimal,
    /// `Approved` iff the ratio does not exceed the threshold
    pub decision: LoanDecision,
}

/// The LTV decision engine
///
/// Stateless; constructed once at process start and shared.
#[derive(Debug, Clone)]
pub struct LtvEngine {
    approval_threshold: Decimal,
}

impl LtvEngine {
    /// Creates an engine with the given approval threshold (a percentage)
    pub fn new(approval_threshold: Decimal) -> Self {
        Self { approval_threshold }
    }

    /// The configured approval threshold
    pub fn threshold(&self) -> Decimal {
        self.approval_threshold
    }

    /// Computes the LTV ratio and the approval decision
    ///
    /// # Errors
    ///
    /// Returns `LtvError::InvalidInput` if `property_value` is not positive
    /// or `loan_amount` is negative.
    pub fn decide(
        &self,
        loan_amount: Decimal,
        property_value: Decimal,
    ) -> Result<LtvAssessment, LtvError> {
        if property_value <= Decimal::ZERO {
            return Err(LtvError::InvalidInput(
                "property value must be greater than zero".to_string(),
            ));
        }
        if loan_amount < Decimal::ZERO {
            return Err(LtvError::InvalidInput(
                "loan amount cannot be negative".to_string(),
            ));
        }

        let ltv_ratio = (loan_amount / property_value * dec!(100))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        let decision = if ltv_ratio <= self.approval_threshold {
            LoanDecision::Approved
        } else {
            LoanDecision::Rejected
        };

        Ok(LtvAssessment { ltv_ratio, decision })
    }
}

impl Default for LtvEngine {
    fn default() -> Self {
        Self::new(DEFAULT_APPROVAL_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_office_scenario_approves() {
        // 1,000,000 against a 1,710,000 valuation
        let assessment = LtvEngine::default()
            .decide(dec!(1_000_000), dec!(1_710_000))
            .unwrap();
        assert_eq!(assessment.ltv_ratio, dec!(58.48));
        assert_eq!(assessment.decision, LoanDecision::Approved);
    }

    #[test]
    fn test_industrial_scenario_rejects() {
        // 500,000 against a 400,000 valuation
        let assessment = LtvEngine::default()
            .decide(dec!(500_000), dec!(400_000))
            .unwrap();
        assert_eq!(assessment.ltv_ratio, dec!(125.00));
        assert_eq!(assessment.decision, LoanDecision::Rejected);
    }

    #[test]
    fn test_aged_office_scenario_approves() {
        // 500,000 against a 1,080,000 valuation
        let assessment = LtvEngine::default()
            .decide(dec!(500_000), dec!(1_080_000))
            .unwrap();
        assert_eq!(assessment.ltv_ratio, dec!(46.30));
        assert_eq!(assessment.decision, LoanDecision::Approved);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let engine = LtvEngine::default();
        let at = engine.decide(dec!(75), dec!(100)).unwrap();
        assert_eq!(at.ltv_ratio, dec!(75.00));
        assert_eq!(at.decision, LoanDecision::Approved);

        let above = engine.decide(dec!(75.01), dec!(100)).unwrap();
        assert_eq!(above.decision, LoanDecision::Rejected);
    }

    #[test]
    fn test_rounding_is_half_up() {
        // 0.125 / 100 -> 0.125% rounds up to 0.13
        let assessment = LtvEngine::default().decide(dec!(0.125), dec!(100)).unwrap();
        assert_eq!(assessment.ltv_ratio, dec!(0.13));
    }

    #[test]
    fn test_zero_property_value_is_invalid() {
        let err = LtvEngine::default().decide(dec!(100), dec!(0)).unwrap_err();
        assert_eq!(
            err,
            LtvError::InvalidInput("property value must be greater than zero".to_string())
        );

        let err = LtvEngine::default().decide(dec!(100), dec!(-1)).unwrap_err();
        assert!(matches!(err, LtvError::InvalidInput(_)));
    }

    #[test]
    fn test_negative_loan_amount_is_invalid() {
        let err = LtvEngine::default().decide(dec!(-1), dec!(100)).unwrap_err();
        assert_eq!(
            err,
            LtvError::InvalidInput("loan amount cannot be negative".to_string())
        );
    }

    #[test]
    fn test_custom_threshold() {
        let engine = LtvEngine::new(dec!(60));
        let assessment = engine.decide(dec!(65), dec!(100)).unwrap();
        assert_eq!(assessment.decision, LoanDecision::Rejected);
    }
}
