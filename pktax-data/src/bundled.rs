//! Slab tables shipped with the crate.
//!
//! TY2024 (Finance Act 2023) and TY2025 (Finance Act 2024) schedules for
//! salaried individuals, non-salaried individuals and AOPs, registered for
//! both residency statuses.

use std::fs::File;
use std::path::Path;
use std::sync::OnceLock;

use pktax_core::SlabTableRegistry;

use crate::loader::{SlabTableLoader, SlabTableLoaderError};

/// Raw CSV of the bundled tables.
pub const BUNDLED_SLAB_TABLES: &str = include_str!("../data/slab_tables.csv");

static BUNDLED: OnceLock<SlabTableRegistry> = OnceLock::new();

/// Process-wide registry built from [`BUNDLED_SLAB_TABLES`].
///
/// Parsed on first use and shared read-only afterwards.
pub fn bundled_registry() -> Result<&'static SlabTableRegistry, SlabTableLoaderError> {
    if let Some(registry) = BUNDLED.get() {
        return Ok(registry);
    }
    let registry = SlabTableLoader::registry_from_reader(BUNDLED_SLAB_TABLES.as_bytes())?;
    Ok(BUNDLED.get_or_init(|| registry))
}

/// Builds a registry from a slab table CSV on disk.
pub fn registry_from_path(path: &Path) -> Result<SlabTableRegistry, SlabTableLoaderError> {
    let file = File::open(path).map_err(|source| SlabTableLoaderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    SlabTableLoader::registry_from_reader(file)
}
