//! Income tax calculations.
//!
//! The main pipeline is aggregate → progressive slabs → professional-firm cap,
//! composed by [`TaxEngine`]. The pension surcharge is a separate path.

pub mod aggregator;
pub mod cap;
pub mod common;
pub mod engine;
pub mod pension;
pub mod progressive;

pub use aggregator::{IncomeTotals, aggregate};
pub use cap::{PROFESSIONAL_FIRM_CAP_RATE, apply_cap, cap_rate_for};
pub use engine::TaxEngine;
pub use pension::{
    PENSION_EXEMPTION_THRESHOLD, PENSION_SURCHARGE_BASIS, PENSION_SURCHARGE_RATE,
    PensionSurchargeBasis, PensionSurchargeCalculator, PensionSurchargeConfig,
    calculate_pension_tax,
};
pub use progressive::{ProgressiveTax, ProgressiveTaxCalculator};
