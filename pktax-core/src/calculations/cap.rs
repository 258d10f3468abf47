//! Professional-firm relief cap.
//!
//! Associations of Persons that are professional firms may not pay more than
//! [`PROFESSIONAL_FIRM_CAP_RATE`] of their taxable income. When the slab total
//! exceeds the cap every allocation is scaled by `cap / total` so the
//! breakdown still explains the clamped figure. The cap itself is truncated
//! to paisa so it never exceeds the ceiling. Rounding residue from the
//! scaling (a few paisa at most) is folded into the top allocation.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::{ratio_or_zero, round_down, round_half_up};
use crate::models::{IncomeProfile, TaxResult, TaxpayerType};

/// Maximum effective rate for professional-firm AOPs.
pub const PROFESSIONAL_FIRM_CAP_RATE: Decimal = Decimal::from_parts(40, 0, 0, false, 2);

/// Effective-rate ceiling that applies to `profile`, if any.
pub fn cap_rate_for(profile: &IncomeProfile) -> Option<Decimal> {
    match profile.taxpayer_type {
        TaxpayerType::AssociationOfPersons if profile.professional_firm => {
            Some(PROFESSIONAL_FIRM_CAP_RATE)
        }
        TaxpayerType::AssociationOfPersons | TaxpayerType::Individual | TaxpayerType::Salaried => {
            None
        }
    }
}

/// Clamps `result` to the category cap of `profile`.
///
/// A pass-through for every category and election without a cap, and for
/// results already at or below the cap.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use pktax_core::calculations::apply_cap;
/// use pktax_core::{IncomeProfile, SlabAllocation, TaxResult, TaxpayerType};
///
/// let mut profile = IncomeProfile::new(2025, TaxpayerType::AssociationOfPersons);
/// profile.professional_firm = true;
///
/// let uncapped = TaxResult {
///     gross_income: dec!(1000),
///     taxable_income: dec!(1000),
///     total_tax: dec!(500),
///     average_rate: dec!(0.5),
///     breakdown: vec![SlabAllocation {
///         slab_label: "Flat".to_string(),
///         taxable_portion: dec!(1000),
///         rate: dec!(0.5),
///         computed_tax: dec!(500),
///     }],
///     cap_applied: false,
/// };
///
/// let capped = apply_cap(uncapped, &profile);
///
/// assert_eq!(capped.total_tax, dec!(400));
/// assert_eq!(capped.breakdown[0].computed_tax, dec!(400));
/// assert!(capped.cap_applied);
/// ```
pub fn apply_cap(
    result: TaxResult,
    profile: &IncomeProfile,
) -> TaxResult {
    let Some(rate) = cap_rate_for(profile) else {
        return result;
    };

    let cap = round_down(result.taxable_income * rate);
    if result.total_tax <= cap {
        debug!(total_tax = %result.total_tax, cap = %cap, "tax within professional-firm cap");
        return result;
    }

    warn!(
        total_tax = %result.total_tax,
        cap = %cap,
        taxable_income = %result.taxable_income,
        "tax exceeds professional-firm cap; scaling breakdown"
    );

    let factor = cap / result.total_tax;
    let mut breakdown = result.breakdown;
    for allocation in breakdown.iter_mut() {
        allocation.computed_tax = round_half_up(allocation.computed_tax * factor);
    }

    let scaled: Decimal = breakdown.iter().map(|a| a.computed_tax).sum();
    if let Some(top) = breakdown.last_mut() {
        top.computed_tax += cap - scaled;
    }

    TaxResult {
        total_tax: cap,
        average_rate: ratio_or_zero(cap, result.taxable_income),
        breakdown,
        cap_applied: true,
        ..result
    }
}
