//! Property-based tests for the LTV decision engine

use proptest::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use domain_lending::{LoanDecision, LtvEngine, LtvError};

proptest! {
    #[test]
    fn ratio_matches_the_formula(
        amount_cents in 0i64..200_000_000_000,
        value_cents in 1i64..200_000_000_000,
    ) {
        let amount = Decimal::new(amount_cents, 2);
        let value = Decimal::new(value_cents, 2);

        let assessment = LtvEngine::default().decide(amount, value).unwrap();
        let expected = (amount / value * dec!(100))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        prop_assert_eq!(assessment.ltv_ratio, expected);
    }

    #[test]
    fn decision_follows_the_threshold(
        amount_cents in 0i64..200_000_000_000,
        value_cents in 1i64..200_000_000_000,
    ) {
        let amount = Decimal::new(amount_cents, 2);
        let value = Decimal::new(value_cents, 2);

        let assessment = LtvEngine::default().decide(amount, value).unwrap();
        prop_assert_eq!(
            assessment.decision == LoanDecision::Approved,
            assessment.ltv_ratio <= dec!(75)
        );
    }

    #[test]
    fn decide_is_idempotent(
        amount_cents in 0i64..200_000_000_000,
        value_cents in 1i64..200_000_000_000,
    ) {
        let amount = Decimal::new(amount_cents, 2);
        let value = Decimal::new(value_cents, 2);

        let engine = LtvEngine::default();
        let first = engine.decide(amount, value).unwrap();
        let second = engine.decide(amount, value).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn non_positive_value_is_always_invalid(
        amount_cents in 0i64..200_000_000_000,
        value_cents in -200_000_000_000i64..=0,
    ) {
        let amount = Decimal::new(amount_cents, 2);
        let value = Decimal::new(value_cents, 2);

        let err = LtvEngine::default().decide(amount, value).unwrap_err();
        prop_assert!(matches!(err, LtvError::InvalidInput(_)));
    }
}
