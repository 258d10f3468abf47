//! Error types for the tax engine.
//!
//! Two kinds of failure exist. [`InvalidInputError`] means the caller handed
//! the engine a profile that is not a valid domain state. [`ConfigurationError`]
//! means the slab tables or policy parameters the engine was set up with are
//! missing or malformed. Both abort the computation; no partial result is
//! ever produced.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::registry::SlabTableKey;

/// A profile field holds a value the engine refuses to compute with.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidInputError {
    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },
}

/// The engine's reference data is missing or inconsistent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// No table is registered for the requested key. Never defaulted.
    #[error("no slab table registered for {0}")]
    NoSlabTable(SlabTableKey),

    #[error("a slab table is already registered for {0}")]
    DuplicateSlabTable(SlabTableKey),

    #[error("slab table for {0} has no slabs")]
    EmptySlabTable(SlabTableKey),

    #[error("slab table for {key} must start at 0, first slab starts at {lower_bound}")]
    FirstSlabNotAtZero {
        key: SlabTableKey,
        lower_bound: Decimal,
    },

    #[error("slab table for {key} has a gap or overlap at slab {index}: expected lower bound {expected}, got {actual}")]
    NonContiguousSlabs {
        key: SlabTableKey,
        index: usize,
        expected: Decimal,
        actual: Decimal,
    },

    #[error("slab {index} of {key} has upper bound {upper_bound} not above lower bound {lower_bound}")]
    InvalidSlabBounds {
        key: SlabTableKey,
        index: usize,
        lower_bound: Decimal,
        upper_bound: Decimal,
    },

    #[error("slab {index} of {key} is unbounded but is not the last slab")]
    UnboundedSlabNotLast { key: SlabTableKey, index: usize },

    #[error("slab table for {0} has no unbounded top slab")]
    MissingUnboundedSlab(SlabTableKey),

    #[error("slab {index} of {key} has marginal rate {rate}, expected a value between 0 and 1")]
    InvalidMarginalRate {
        key: SlabTableKey,
        index: usize,
        rate: Decimal,
    },

    #[error("pension surcharge rate must be between 0 and 1, got {0}")]
    InvalidPensionRate(Decimal),

    #[error("pension exemption threshold must be non-negative, got {0}")]
    NegativePensionThreshold(Decimal),
}

/// Error type of the public engine surface.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}
