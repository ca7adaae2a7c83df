//! Valuation records and the external estimate they are derived from

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{LoanId, ValuationId};

use crate::loan::{LoanStatus, UnrecognizedValue};
use crate::ltv::LtvAssessment;

/// Outcome of the LTV decision rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanDecision {
    Approved,
    Rejected,
}

impl LoanDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanDecision::Approved => "approved",
            LoanDecision::Rejected => "rejected",
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, LoanDecision::Approved)
    }

    /// The loan status this decision finalizes into
    pub fn terminal_status(&self) -> LoanStatus {
        match self {
            LoanDecision::Approved => LoanStatus::Approved,
            LoanDecision::Rejected => LoanStatus::Rejected,
        }
    }
}

impl fmt::Display for LoanDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LoanDecision {
    type Err = UnrecognizedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(LoanDecision::Approved),
            "rejected" => Ok(LoanDecision::Rejected),
            other => Err(UnrecognizedValue(other.to_string())),
        }
    }
}

/// Calculation breakdown returned by the valuation calculator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationBreakdown {
    /// Base property value before adjustments
    pub base_value: Decimal,
    /// Depreciation factor applied (0-1)
    pub depreciation_factor: Decimal,
    /// Final value after depreciation
    pub final_value: Decimal,
}

/// Result of one remote valuation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatedValuation {
    /// Estimated property value in dollars
    pub estimated_value: Decimal,
    /// Timestamp of the calculation
    pub valuation_date: DateTime<Utc>,
    /// Description of the methodology used
    pub methodology: String,
    /// Calculation breakdown
    pub breakdown: ValuationBreakdown,
}

/// The persisted outcome of one valuation request for a loan
///
/// Created exactly once per loan, atomically with the loan's transition out
/// of `PendingValuation`, and never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Valuation {
    /// Unique identifier
    pub id: ValuationId,
    /// Owning loan (at most one valuation per loan)
    pub loan_id: LoanId,
    /// Estimated property value
    pub estimated_value: Decimal,
    /// Loan-to-value ratio, percentage with two-decimal precision
    pub ltv_ratio: Decimal,
    /// Decision derived from the ratio
    pub decision: LoanDecision,
    /// When the valuation was performed
    pub valuated_at: DateTime<Utc>,
    /// Methodology reported by the calculator
    pub methodology: Option<String>,
}

impl Valuation {
    /// Builds the valuation record for a loan from the remote estimate and
    /// the LTV assessment
    pub fn record(loan_id: LoanId, estimate: &EstimatedValuation, assessment: &LtvAssessment) -> Self {
        Self {
            id: ValuationId::new(),
            loan_id,
            estimated_value: estimate.estimated_value,
            ltv_ratio: assessment.ltv_ratio,
            decision: assessment.decision,
            valuated_at: estimate.valuation_date,
            methodology: Some(estimate.methodology.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decision_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&LoanDecision::Approved).unwrap(), "\"approved\"");
        assert_eq!(serde_json::to_string(&LoanDecision::Rejected).unwrap(), "\"rejected\"");
    }

    #[test]
    fn test_decision_terminal_status() {
        assert_eq!(LoanDecision::Approved.terminal_status(), LoanStatus::Approved);
        assert_eq!(LoanDecision::Rejected.terminal_status(), LoanStatus::Rejected);
    }

    #[test]
    fn test_record_carries_estimate_and_assessment() {
        let loan_id = LoanId::new();
        let estimate = EstimatedValuation {
            estimated_value: dec!(1_710_000),
            valuation_date: Utc::now(),
            methodology: "Base rate ($180/sqft) with 5.0% age depreciation".to_string(),
            breakdown: ValuationBreakdown {
                base_value: dec!(1_800_000),
                depreciation_factor: dec!(0.05),
                final_value: dec!(1_710_000),
            },
        };
        let assessment = LtvAssessment {
            ltv_ratio: dec!(58.48),
            decision: LoanDecision::Approved,
        };

        let valuation = Valuation::record(loan_id, &estimate, &assessment);
        assert_eq!(valuation.loan_id, loan_id);
        assert_eq!(valuation.estimated_value, dec!(1_710_000));
        assert_eq!(valuation.ltv_ratio, dec!(58.48));
        assert_eq!(valuation.decision, LoanDecision::Approved);
        assert_eq!(valuation.valuated_at, estimate.valuation_date);
        assert!(valuation.methodology.as_deref().unwrap().contains("$180/sqft"));
    }
}
