use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Income and tax falling into a single slab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlabAllocation {
    pub slab_label: String,
    pub taxable_portion: Decimal,
    /// Statutory marginal rate of the slab. Not rewritten by the cap.
    pub rate: Decimal,
    pub computed_tax: Decimal,
}

/// Result of the main progressive computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub gross_income: Decimal,
    pub taxable_income: Decimal,
    pub total_tax: Decimal,
    /// `total_tax / taxable_income`, or zero when there is no taxable income.
    pub average_rate: Decimal,
    pub breakdown: Vec<SlabAllocation>,
    /// Set when the professional-firm cap clamped `total_tax`.
    pub cap_applied: bool,
}

impl TaxResult {
    pub fn allocated_tax(&self) -> Decimal {
        self.breakdown.iter().map(|a| a.computed_tax).sum()
    }

    pub fn allocated_income(&self) -> Decimal {
        self.breakdown.iter().map(|a| a.taxable_portion).sum()
    }
}

/// Result of the flat pension surcharge. Deliberately not band-decomposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PensionTaxResult {
    pub total_tax: Decimal,
}

impl PensionTaxResult {
    pub const EXEMPT: PensionTaxResult = PensionTaxResult {
        total_tax: Decimal::ZERO,
    };

    pub fn is_exempt(&self) -> bool {
        self.total_tax.is_zero()
    }
}

/// Main result and pension surcharge for one profile, kept side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSnapshot {
    pub tax: TaxResult,
    pub pension: PensionTaxResult,
}
