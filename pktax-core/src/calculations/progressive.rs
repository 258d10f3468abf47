//! Progressive slab calculation.
//!
//! Walks a slab table in ascending order and allocates taxable income band by
//! band. A band `[lower, upper)` receives `min(taxable, upper) - lower` when
//! that is positive; income sitting exactly on a boundary belongs to the
//! lower band. Each band's tax is rounded to paisa and the total is the sum
//! of the rounded bands, so the breakdown always adds up exactly.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use pktax_core::SlabDefinition;
//! use pktax_core::calculations::ProgressiveTaxCalculator;
//!
//! let slabs = vec![
//!     SlabDefinition::new(dec!(0), Some(dec!(600000)), dec!(0), "Up to 600,000"),
//!     SlabDefinition::new(dec!(600000), Some(dec!(1200000)), dec!(0.15), "600,001 - 1,200,000"),
//!     SlabDefinition::new(dec!(1200000), None, dec!(0.20), "Above 1,200,000"),
//! ];
//!
//! let calculation = ProgressiveTaxCalculator::new(&slabs).apply(dec!(1000000));
//!
//! assert_eq!(calculation.total_tax, dec!(60000));
//! assert_eq!(calculation.breakdown.len(), 2);
//! assert_eq!(calculation.average_rate, dec!(0.06));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::calculations::common::{max, ratio_or_zero, round_half_up};
use crate::models::{SlabAllocation, SlabDefinition};

/// Output of a single progressive pass, before any cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressiveTax {
    pub total_tax: Decimal,
    pub average_rate: Decimal,
    pub breakdown: Vec<SlabAllocation>,
}

/// Applies a slab table to a taxable income figure.
///
/// The slabs are expected to have passed registry validation: ascending,
/// contiguous from zero, with an unbounded top band.
#[derive(Debug, Clone, Copy)]
pub struct ProgressiveTaxCalculator<'a> {
    slabs: &'a [SlabDefinition],
}

impl<'a> ProgressiveTaxCalculator<'a> {
    pub fn new(slabs: &'a [SlabDefinition]) -> Self {
        Self { slabs }
    }

    pub fn apply(
        &self,
        taxable_income: Decimal,
    ) -> ProgressiveTax {
        let mut breakdown = Vec::new();
        let mut total_tax = Decimal::ZERO;
        let mut covered = Decimal::ZERO;

        for slab in self.slabs {
            if covered >= taxable_income {
                break;
            }

            let portion = self.portion_in_slab(slab, taxable_income);
            covered = slab
                .upper_bound
                .map_or(taxable_income, |upper| upper.min(taxable_income));

            if portion <= Decimal::ZERO {
                continue;
            }

            let computed_tax = round_half_up(portion * slab.marginal_rate);
            trace!(
                slab = %slab.label,
                portion = %portion,
                rate = %slab.marginal_rate,
                tax = %computed_tax,
                "allocated income to slab"
            );

            total_tax += computed_tax;
            breakdown.push(SlabAllocation {
                slab_label: slab.label.clone(),
                taxable_portion: portion,
                rate: slab.marginal_rate,
                computed_tax,
            });
        }

        ProgressiveTax {
            total_tax,
            average_rate: ratio_or_zero(total_tax, taxable_income),
            breakdown,
        }
    }

    /// Income of `taxable_income` falling inside `slab`.
    fn portion_in_slab(
        &self,
        slab: &SlabDefinition,
        taxable_income: Decimal,
    ) -> Decimal {
        let ceiling = slab
            .upper_bound
            .map_or(taxable_income, |upper| upper.min(taxable_income));
        max(ceiling - slab.lower_bound, Decimal::ZERO)
    }
}
