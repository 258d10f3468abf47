//! Slab table data for the tax engine: CSV format, loader and the bundled
//! schedules.

pub mod bundled;
pub mod loader;

pub use bundled::{BUNDLED_SLAB_TABLES, bundled_registry, registry_from_path};
pub use loader::{SlabTableLoader, SlabTableLoaderError, SlabTableRecord};
