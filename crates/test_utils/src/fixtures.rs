//! Canned valuation responses
//!
//! Reproduces the external calculator's published formula so stubbed
//! valuations match what the real service would return: a per-type base
//! rate times square footage, depreciated 1% per year up to a 40% cap,
//! rounded half-up to cents.

use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use domain_lending::{EstimatedValuation, PropertyType, ValuationBreakdown};

/// Base rates per square foot, by property type
pub fn base_rate(property_type: PropertyType) -> Decimal {
    match property_type {
        PropertyType::Multifamily => dec!(200),
        PropertyType::Retail => dec!(150),
        PropertyType::Office => dec!(180),
        PropertyType::Industrial => dec!(100),
    }
}

/// Builds the estimate the external calculator would return for these
/// property attributes
pub fn calculator_valuation(
    property_type: PropertyType,
    size_sqft: i32,
    age_years: i32,
) -> EstimatedValuation {
    let rate = base_rate(property_type);
    let base_value = Decimal::from(size_sqft) * rate;
    let depreciation_factor = (Decimal::from(age_years) * dec!(0.01)).min(dec!(0.40));
    let estimated_value = (base_value * (dec!(1) - depreciation_factor))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    let depreciation_percent = (depreciation_factor * dec!(100)).round_dp(1);
    EstimatedValuation {
        estimated_value,
        valuation_date: Utc::now(),
        methodology: format!(
            "Base rate (${rate}/sqft) with {depreciation_percent}% age depreciation"
        ),
        breakdown: ValuationBreakdown {
            base_value: base_value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            depreciation_factor,
            final_value: estimated_value,
        },
    }
}
