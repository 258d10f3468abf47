//! Versioned slab tables keyed by category, residency and tax year.
//!
//! The registry is filled once at start-up and only read afterwards. Tables
//! for different tax years live side by side so historical workspaces keep
//! computing against the schedule that applied to them.

use std::collections::HashMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigurationError;
use crate::models::{Residency, SlabDefinition, TaxpayerType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlabTableKey {
    pub tax_year: i32,
    pub taxpayer_type: TaxpayerType,
    pub residency: Residency,
}

impl SlabTableKey {
    pub fn new(
        taxpayer_type: TaxpayerType,
        residency: Residency,
        tax_year: i32,
    ) -> Self {
        Self {
            tax_year,
            taxpayer_type,
            residency,
        }
    }
}

impl fmt::Display for SlabTableKey {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "{}/{} TY{}",
            self.taxpayer_type.as_str(),
            self.residency.as_str(),
            self.tax_year
        )
    }
}

/// Read-only store of validated slab tables.
///
/// Typical lifetime:
/// 1. Create with `SlabTableRegistry::new()`.
/// 2. Call `register` once per (category, residency, year) table.
/// 3. Share `&SlabTableRegistry` with every computation.
#[derive(Debug, Clone, Default)]
pub struct SlabTableRegistry {
    tables: HashMap<SlabTableKey, Vec<SlabDefinition>>,
}

impl SlabTableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and stores a table.
    ///
    /// Registering the same key twice is rejected; a published table is never
    /// replaced in place.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the key is already taken or if the
    /// slabs are not a contiguous, ascending schedule starting at zero with a
    /// single unbounded top band and rates in `[0, 1]`.
    pub fn register(
        &mut self,
        key: SlabTableKey,
        slabs: Vec<SlabDefinition>,
    ) -> Result<(), ConfigurationError> {
        if self.tables.contains_key(&key) {
            return Err(ConfigurationError::DuplicateSlabTable(key));
        }
        validate_slabs(key, &slabs)?;

        debug!(%key, slabs = slabs.len(), "registered slab table");
        self.tables.insert(key, slabs);
        Ok(())
    }

    /// Returns the ordered schedule for the given key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::NoSlabTable`] when nothing is registered
    /// for the key. There is no fallback to another year or category.
    pub fn slabs_for(
        &self,
        taxpayer_type: TaxpayerType,
        residency: Residency,
        tax_year: i32,
    ) -> Result<&[SlabDefinition], ConfigurationError> {
        let key = SlabTableKey::new(taxpayer_type, residency, tax_year);
        self.tables
            .get(&key)
            .map(Vec::as_slice)
            .ok_or(ConfigurationError::NoSlabTable(key))
    }

    /// Registered tax years, ascending and deduplicated.
    pub fn tax_years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.tables.keys().map(|k| k.tax_year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// Every registered key, sorted.
    pub fn keys(&self) -> Vec<SlabTableKey> {
        let mut keys: Vec<_> = self.tables.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

fn validate_slabs(
    key: SlabTableKey,
    slabs: &[SlabDefinition],
) -> Result<(), ConfigurationError> {
    let first = slabs
        .first()
        .ok_or(ConfigurationError::EmptySlabTable(key))?;
    if !first.lower_bound.is_zero() {
        return Err(ConfigurationError::FirstSlabNotAtZero {
            key,
            lower_bound: first.lower_bound,
        });
    }

    let last_index = slabs.len() - 1;
    let mut expected_lower = Decimal::ZERO;

    for (index, slab) in slabs.iter().enumerate() {
        if slab.marginal_rate < Decimal::ZERO || slab.marginal_rate > Decimal::ONE {
            return Err(ConfigurationError::InvalidMarginalRate {
                key,
                index,
                rate: slab.marginal_rate,
            });
        }
        if slab.lower_bound != expected_lower {
            return Err(ConfigurationError::NonContiguousSlabs {
                key,
                index,
                expected: expected_lower,
                actual: slab.lower_bound,
            });
        }

        match slab.upper_bound {
            Some(upper) if upper <= slab.lower_bound => {
                return Err(ConfigurationError::InvalidSlabBounds {
                    key,
                    index,
                    lower_bound: slab.lower_bound,
                    upper_bound: upper,
                });
            }
            Some(upper) => expected_lower = upper,
            None if index != last_index => {
                return Err(ConfigurationError::UnboundedSlabNotLast { key, index });
            }
            None => {}
        }
    }

    if slabs[last_index].upper_bound.is_some() {
        return Err(ConfigurationError::MissingUnboundedSlab(key));
    }

    Ok(())
}
