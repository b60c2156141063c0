//! Typed errors for dataset loading and aggregation.
//!
//! The application boundary wraps these in `anyhow` context; callers inside
//! the crate match on the variants.

use thiserror::Error;

/// Errors produced by the aggregation operations.
#[derive(Debug, Error, PartialEq)]
pub enum AggregateError {
    /// The requested year does not appear in the dataset.
    #[error("unknown year {year}: the dataset covers {known:?}")]
    InvalidYear { year: u16, known: Vec<u16> },

    /// The summed population for a year is zero, so no ratio exists.
    #[error("total population for year {year} is zero; cannot compute a national ratio")]
    EmptyPopulation { year: u16 },

    /// A selected province does not appear in the dataset.
    #[error("unknown province: {0}")]
    UnknownProvince(String),
}

/// Errors produced while validating a loaded dataset.
#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    /// Two rows share the same (province, year) key.
    #[error("duplicate record for province '{province}' in year {year}")]
    DuplicateRecord { province: String, year: u16 },

    /// A row failed validation (1-indexed data row, header excluded).
    #[error("invalid record at data row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },
}
