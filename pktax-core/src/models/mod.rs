mod income_profile;
mod slab_definition;
mod tax_result;
mod taxpayer_type;

pub use income_profile::IncomeProfile;
pub use slab_definition::SlabDefinition;
pub use tax_result::{PensionTaxResult, SlabAllocation, TaxResult, TaxSnapshot};
pub use taxpayer_type::{Residency, TaxpayerType};
