//! Income aggregation: income streams and deductions to gross and taxable
//! income.
//!
//! | Field                  | Role                                   |
//! |------------------------|----------------------------------------|
//! | `salary_income`        | added to gross income                  |
//! | `business_income`      | added to gross income                  |
//! | `other_taxable_income` | added to gross income                  |
//! | `deductions`           | subtracted from gross, floored at zero |
//! | `pension_income`       | validated only; taxed separately       |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{max, round_half_up};
use crate::error::InvalidInputError;
use crate::models::IncomeProfile;

/// Gross and taxable income derived from a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTotals {
    pub gross_income: Decimal,
    pub taxable_income: Decimal,
}

/// Combines the income streams of `profile` and applies its deductions.
///
/// Deductions larger than gross income are wasted; taxable income never goes
/// below zero and nothing is carried forward.
///
/// # Errors
///
/// Returns [`InvalidInputError::NegativeAmount`] for the first negative
/// income, deduction or pension field.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use pktax_core::calculations::aggregate;
/// use pktax_core::{IncomeProfile, TaxpayerType};
///
/// let mut profile = IncomeProfile::new(2025, TaxpayerType::Individual);
/// profile.business_income = dec!(8500000);
/// profile.other_taxable_income = dec!(950000);
/// profile.deductions = dec!(750000);
///
/// let totals = aggregate(&profile).unwrap();
///
/// assert_eq!(totals.gross_income, dec!(9450000));
/// assert_eq!(totals.taxable_income, dec!(8700000));
/// ```
pub fn aggregate(profile: &IncomeProfile) -> Result<IncomeTotals, InvalidInputError> {
    ensure_non_negative("salary_income", profile.salary_income)?;
    ensure_non_negative("business_income", profile.business_income)?;
    ensure_non_negative("other_taxable_income", profile.other_taxable_income)?;
    ensure_non_negative("deductions", profile.deductions)?;
    ensure_non_negative("pension_income", profile.pension_income)?;

    let gross_income = round_half_up(
        profile.salary_income + profile.business_income + profile.other_taxable_income,
    );
    let taxable_income = max(
        round_half_up(gross_income - profile.deductions),
        Decimal::ZERO,
    );

    if profile.deductions > gross_income {
        debug!(
            gross_income = %gross_income,
            deductions = %profile.deductions,
            "deductions exceed gross income; excess is not carried forward"
        );
    }

    Ok(IncomeTotals {
        gross_income,
        taxable_income,
    })
}

/// Rejects negative amounts instead of clamping them.
pub(crate) fn ensure_non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<(), InvalidInputError> {
    if value < Decimal::ZERO {
        return Err(InvalidInputError::NegativeAmount { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::TaxpayerType;

    fn test_profile() -> IncomeProfile {
        IncomeProfile {
            salary_income: dec!(0),
            business_income: dec!(8500000),
            other_taxable_income: dec!(950000),
            deductions: dec!(750000),
            ..IncomeProfile::new(2025, TaxpayerType::Individual)
        }
    }

    #[test]
    fn gross_income_sums_all_streams() {
        let mut profile = test_profile();
        profile.salary_income = dec!(1200000.50);

        let totals = aggregate(&profile).unwrap();

        assert_eq!(totals.gross_income, dec!(10650000.50));
    }

    #[test]
    fn taxable_income_subtracts_deductions() {
        let totals = aggregate(&test_profile()).unwrap();

        assert_eq!(
            totals,
            IncomeTotals {
                gross_income: dec!(9450000),
                taxable_income: dec!(8700000),
            }
        );
    }

    #[test]
    fn pension_is_excluded_from_gross() {
        let mut profile = test_profile();
        profile.pension_income = dec!(15000000);

        let totals = aggregate(&profile).unwrap();

        assert_eq!(totals.gross_income, dec!(9450000));
    }

    #[test]
    fn excess_deductions_floor_taxable_income_at_zero() {
        let mut profile = test_profile();
        profile.deductions = dec!(10000000);

        let totals = aggregate(&profile).unwrap();

        assert_eq!(totals.gross_income, dec!(9450000));
        assert_eq!(totals.taxable_income, dec!(0));
    }

    #[test]
    fn negative_business_income_is_rejected() {
        let mut profile = test_profile();
        profile.business_income = dec!(-1);

        let result = aggregate(&profile);

        assert_eq!(
            result,
            Err(InvalidInputError::NegativeAmount {
                field: "business_income",
                value: dec!(-1),
            })
        );
    }

    #[test]
    fn negative_deductions_are_rejected() {
        let mut profile = test_profile();
        profile.deductions = dec!(-0.01);

        let result = aggregate(&profile);

        assert!(matches!(
            result,
            Err(InvalidInputError::NegativeAmount {
                field: "deductions",
                ..
            })
        ));
    }

    #[test]
    fn negative_pension_is_rejected() {
        let mut profile = test_profile();
        profile.pension_income = dec!(-5);

        assert!(aggregate(&profile).is_err());
    }

    #[test]
    fn zero_profile_aggregates_to_zero() {
        let profile = IncomeProfile::new(2025, TaxpayerType::Salaried);

        let totals = aggregate(&profile).unwrap();

        assert_eq!(totals.gross_income, Decimal::ZERO);
        assert_eq!(totals.taxable_income, Decimal::ZERO);
    }
}
