use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Residency, TaxpayerType};

/// Everything the engine needs to know about one taxpayer for one tax year.
///
/// Amounts are PKR. The engine never reads any state beyond this value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeProfile {
    pub tax_year: i32,
    pub taxpayer_type: TaxpayerType,
    pub resident: bool,

    /// Only meaningful for [`TaxpayerType::AssociationOfPersons`].
    pub professional_firm: bool,

    pub salary_income: Decimal,
    pub business_income: Decimal,
    pub other_taxable_income: Decimal,
    pub deductions: Decimal,

    /// Taxed only through the pension surcharge, never through the slabs.
    pub pension_income: Decimal,
}

impl IncomeProfile {
    /// A resident profile with every amount set to zero.
    pub fn new(
        tax_year: i32,
        taxpayer_type: TaxpayerType,
    ) -> Self {
        Self {
            tax_year,
            taxpayer_type,
            resident: true,
            professional_firm: false,
            salary_income: Decimal::ZERO,
            business_income: Decimal::ZERO,
            other_taxable_income: Decimal::ZERO,
            deductions: Decimal::ZERO,
            pension_income: Decimal::ZERO,
        }
    }

    pub fn residency(&self) -> Residency {
        Residency::from(self.resident)
    }
}
