use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One band of a progressive schedule: `[lower_bound, upper_bound)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlabDefinition {
    pub lower_bound: Decimal,
    /// `None` for the unbounded top band.
    pub upper_bound: Option<Decimal>,
    pub marginal_rate: Decimal,
    pub label: String,
}

impl SlabDefinition {
    pub fn new(
        lower_bound: Decimal,
        upper_bound: Option<Decimal>,
        marginal_rate: Decimal,
        label: impl Into<String>,
    ) -> Self {
        Self {
            lower_bound,
            upper_bound,
            marginal_rate,
            label: label.into(),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.upper_bound.is_none()
    }
}
