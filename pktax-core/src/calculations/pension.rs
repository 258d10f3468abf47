//! Flat surcharge on large pension receipts.
//!
//! Pension income at or below the exemption threshold is fully exempt. Above
//! it, a flat rate applies. Whether that rate applies to the whole receipt or
//! only to the excess over the threshold is selected by
//! [`PensionSurchargeBasis`]; [`PENSION_SURCHARGE_BASIS`] is the basis used by
//! [`calculate_pension_tax`].
//!
//! The surcharge is independent of category, residency and slab tables and is
//! never added into [`TaxResult::total_tax`](crate::TaxResult).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::aggregator::ensure_non_negative;
use crate::calculations::common::round_half_up;
use crate::error::{ConfigurationError, TaxError};
use crate::models::PensionTaxResult;

/// Receipts up to and including this amount are exempt (PKR 10 million).
pub const PENSION_EXEMPTION_THRESHOLD: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);

/// Flat surcharge rate above the threshold (5%).
pub const PENSION_SURCHARGE_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

// TODO: confirm the surcharge base against the ordinance text and switch to
// ExcessOverThreshold if only the excess is chargeable.
pub const PENSION_SURCHARGE_BASIS: PensionSurchargeBasis = PensionSurchargeBasis::FullAmount;

/// Amount the surcharge rate is applied to once the threshold is exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PensionSurchargeBasis {
    /// The whole pension receipt.
    #[default]
    FullAmount,
    /// Only the part above the exemption threshold.
    ExcessOverThreshold,
}

/// Policy parameters of the pension surcharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PensionSurchargeConfig {
    pub threshold: Decimal,
    pub rate: Decimal,
    pub basis: PensionSurchargeBasis,
}

impl Default for PensionSurchargeConfig {
    fn default() -> Self {
        Self {
            threshold: PENSION_EXEMPTION_THRESHOLD,
            rate: PENSION_SURCHARGE_RATE,
            basis: PENSION_SURCHARGE_BASIS,
        }
    }
}

impl PensionSurchargeConfig {
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the rate is outside `[0, 1]` or the
    /// threshold is negative.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.rate < Decimal::ZERO || self.rate > Decimal::ONE {
            return Err(ConfigurationError::InvalidPensionRate(self.rate));
        }
        if self.threshold < Decimal::ZERO {
            return Err(ConfigurationError::NegativePensionThreshold(
                self.threshold,
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PensionSurchargeCalculator {
    config: PensionSurchargeConfig,
}

impl PensionSurchargeCalculator {
    pub fn new(config: PensionSurchargeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PensionSurchargeConfig {
        &self.config
    }

    /// # Errors
    ///
    /// Returns [`TaxError::Configuration`] for an invalid policy and
    /// [`TaxError::InvalidInput`] for a negative pension amount.
    pub fn calculate(
        &self,
        pension_income: Decimal,
    ) -> Result<PensionTaxResult, TaxError> {
        self.config.validate()?;
        ensure_non_negative("pension_income", pension_income)?;

        if pension_income <= self.config.threshold {
            debug!(
                pension_income = %pension_income,
                threshold = %self.config.threshold,
                "pension at or below threshold; exempt"
            );
            return Ok(PensionTaxResult::EXEMPT);
        }

        let base = match self.config.basis {
            PensionSurchargeBasis::FullAmount => pension_income,
            PensionSurchargeBasis::ExcessOverThreshold => pension_income - self.config.threshold,
        };

        Ok(PensionTaxResult {
            total_tax: round_half_up(base * self.config.rate),
        })
    }
}

/// Pension surcharge under the statutory defaults.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use pktax_core::calculate_pension_tax;
///
/// assert!(calculate_pension_tax(dec!(10000000)).unwrap().is_exempt());
/// assert_eq!(calculate_pension_tax(dec!(15000000)).unwrap().total_tax, dec!(750000));
/// ```
///
/// # Errors
///
/// Returns [`TaxError::InvalidInput`] for a negative amount.
pub fn calculate_pension_tax(pension_income: Decimal) -> Result<PensionTaxResult, TaxError> {
    PensionSurchargeCalculator::default().calculate(pension_income)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::error::InvalidInputError;

    #[test]
    fn defaults_match_statutory_values() {
        let config = PensionSurchargeConfig::default();

        assert_eq!(config.threshold, dec!(10000000));
        assert_eq!(config.rate, dec!(0.05));
        assert_eq!(config.basis, PensionSurchargeBasis::FullAmount);
    }

    #[test]
    fn threshold_amount_is_exempt() {
        let result = calculate_pension_tax(dec!(10000000)).unwrap();

        assert_eq!(result, PensionTaxResult::EXEMPT);
        assert!(result.is_exempt());
    }

    #[test]
    fn one_rupee_over_threshold_is_taxed() {
        let result = calculate_pension_tax(dec!(10000001)).unwrap();

        assert_eq!(result.total_tax, dec!(500000.05));
        assert!(!result.is_exempt());
    }

    #[test]
    fn full_amount_basis_taxes_whole_receipt() {
        let result = calculate_pension_tax(dec!(15000000)).unwrap();

        assert_eq!(result.total_tax, dec!(750000));
    }

    #[test]
    fn excess_basis_taxes_only_excess() {
        let calculator = PensionSurchargeCalculator::new(PensionSurchargeConfig {
            basis: PensionSurchargeBasis::ExcessOverThreshold,
            ..PensionSurchargeConfig::default()
        });

        let result = calculator.calculate(dec!(15000000)).unwrap();

        assert_eq!(result.total_tax, dec!(250000));
    }

    #[test]
    fn zero_pension_is_exempt() {
        assert!(calculate_pension_tax(Decimal::ZERO).unwrap().is_exempt());
    }

    #[test]
    fn negative_pension_is_invalid_input() {
        let result = calculate_pension_tax(dec!(-1));

        assert_eq!(
            result,
            Err(TaxError::InvalidInput(InvalidInputError::NegativeAmount {
                field: "pension_income",
                value: dec!(-1),
            }))
        );
    }

    #[test]
    fn invalid_rate_is_configuration_error() {
        let calculator = PensionSurchargeCalculator::new(PensionSurchargeConfig {
            rate: dec!(1.05),
            ..PensionSurchargeConfig::default()
        });

        let result = calculator.calculate(dec!(20000000));

        assert_eq!(
            result,
            Err(TaxError::Configuration(
                ConfigurationError::InvalidPensionRate(dec!(1.05))
            ))
        );
    }

    #[test]
    fn negative_threshold_is_configuration_error() {
        let config = PensionSurchargeConfig {
            threshold: dec!(-1),
            ..PensionSurchargeConfig::default()
        };

        assert_eq!(
            config.validate(),
            Err(ConfigurationError::NegativePensionThreshold(dec!(-1)))
        );
    }
}
