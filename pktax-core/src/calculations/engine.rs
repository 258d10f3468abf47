//! Composite pipeline: aggregate, apply slabs, apply cap.
//!
//! The pension surcharge runs beside the pipeline on the same profile and is
//! returned separately in a [`TaxSnapshot`].

use tracing::debug;

use crate::calculations::aggregator::aggregate;
use crate::calculations::cap::apply_cap;
use crate::calculations::pension::{PensionSurchargeCalculator, PensionSurchargeConfig};
use crate::calculations::progressive::ProgressiveTaxCalculator;
use crate::error::TaxError;
use crate::models::{IncomeProfile, PensionTaxResult, TaxResult, TaxSnapshot};
use crate::registry::SlabTableRegistry;

/// Stateless tax engine bound to a read-only slab registry.
///
/// Cheap to construct and `Copy`; share one registry across threads and build
/// an engine wherever a computation is needed.
#[derive(Debug, Clone, Copy)]
pub struct TaxEngine<'a> {
    registry: &'a SlabTableRegistry,
    pension: PensionSurchargeCalculator,
}

impl<'a> TaxEngine<'a> {
    pub fn new(registry: &'a SlabTableRegistry) -> Self {
        Self {
            registry,
            pension: PensionSurchargeCalculator::default(),
        }
    }

    /// Replaces the statutory pension policy.
    pub fn with_pension_config(
        mut self,
        config: PensionSurchargeConfig,
    ) -> Self {
        self.pension = PensionSurchargeCalculator::new(config);
        self
    }

    pub fn registry(&self) -> &'a SlabTableRegistry {
        self.registry
    }

    /// Computes the main tax result for `profile`.
    ///
    /// # Errors
    ///
    /// - [`TaxError::InvalidInput`] if any amount on the profile is negative.
    /// - [`TaxError::Configuration`] if no slab table is registered for the
    ///   profile's category, residency and tax year.
    pub fn compute_composite_tax(
        &self,
        profile: &IncomeProfile,
    ) -> Result<TaxResult, TaxError> {
        let totals = aggregate(profile)?;
        let slabs = self.registry.slabs_for(
            profile.taxpayer_type,
            profile.residency(),
            profile.tax_year,
        )?;

        let progressive = ProgressiveTaxCalculator::new(slabs).apply(totals.taxable_income);
        debug!(
            tax_year = profile.tax_year,
            taxpayer_type = profile.taxpayer_type.as_str(),
            taxable_income = %totals.taxable_income,
            total_tax = %progressive.total_tax,
            bands = progressive.breakdown.len(),
            "computed slab tax"
        );

        let result = TaxResult {
            gross_income: totals.gross_income,
            taxable_income: totals.taxable_income,
            total_tax: progressive.total_tax,
            average_rate: progressive.average_rate,
            breakdown: progressive.breakdown,
            cap_applied: false,
        };

        Ok(apply_cap(result, profile))
    }

    /// Computes the pension surcharge for `profile` under the engine's policy.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError`] for a negative pension amount or an invalid policy.
    pub fn compute_pension_tax(
        &self,
        profile: &IncomeProfile,
    ) -> Result<PensionTaxResult, TaxError> {
        self.pension.calculate(profile.pension_income)
    }

    /// Main result and pension surcharge side by side.
    ///
    /// Fails as a whole if either computation fails.
    pub fn snapshot(
        &self,
        profile: &IncomeProfile,
    ) -> Result<TaxSnapshot, TaxError> {
        let tax = self.compute_composite_tax(profile)?;
        let pension = self.compute_pension_tax(profile)?;
        Ok(TaxSnapshot { tax, pension })
    }
}
