//! Progressive income-tax engine for Pakistani tax returns.
//!
//! Given an [`IncomeProfile`], the engine aggregates income, applies the slab
//! table registered for the taxpayer's category, residency and tax year,
//! enforces the professional-firm cap, and returns a [`TaxResult`] with a
//! slab-by-slab breakdown. The flat pension surcharge is computed separately
//! and returned as a [`PensionTaxResult`].
//!
//! ```
//! use rust_decimal_macros::dec;
//! use pktax_core::{
//!     IncomeProfile, Residency, SlabDefinition, SlabTableKey, SlabTableRegistry, TaxEngine,
//!     TaxpayerType,
//! };
//!
//! let mut registry = SlabTableRegistry::new();
//! registry
//!     .register(
//!         SlabTableKey::new(TaxpayerType::Salaried, Residency::Resident, 2025),
//!         vec![
//!             SlabDefinition::new(dec!(0), Some(dec!(600000)), dec!(0), "Up to 600,000"),
//!             SlabDefinition::new(dec!(600000), None, dec!(0.05), "Above 600,000"),
//!         ],
//!     )
//!     .unwrap();
//!
//! let mut profile = IncomeProfile::new(2025, TaxpayerType::Salaried);
//! profile.salary_income = dec!(1000000);
//!
//! let result = TaxEngine::new(&registry).compute_composite_tax(&profile).unwrap();
//!
//! assert_eq!(result.total_tax, dec!(20000));
//! ```

pub mod calculations;
pub mod error;
pub mod export;
pub mod models;
pub mod registry;

pub use calculations::{TaxEngine, calculate_pension_tax};
pub use error::{ConfigurationError, InvalidInputError, TaxError};
pub use export::{TaxCalcCell, TaxCalcRow, TaxCalcSheet};
pub use models::*;
pub use registry::{SlabTableKey, SlabTableRegistry};
