//! Error types for the scoring engine
//!
//! Registry and configuration problems are `ScoringError`s and stop a run
//! before it starts. Species-level problems are `SpeciesValidationError`s:
//! they reject one species and leave the rest of the list untouched.

use thiserror::Error;

/// Registry / configuration failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoringError {
    #[error("criterion '{0}' is already registered")]
    DuplicateCriterion(String),

    #[error("configuration overrides unknown criterion '{0}'")]
    UnknownCriterion(String),

    #[error("criterion '{key}' has invalid weight {weight} (must be finite and >= 0)")]
    InvalidWeight { key: String, weight: f64 },

    #[error("adding criterion '{0}' makes the total criterion weight non-finite")]
    TotalWeightOverflow(String),

    #[error("criterion '{key}' has invalid tolerance margin {margin} (must be finite and >= 0)")]
    InvalidToleranceMargin { key: String, margin: f64 },
}

/// Per-species input failures, reported alongside the ranked results
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpeciesValidationError {
    #[error("species {species_id}: range for '{criterion}' is inverted (min {min} > max {max})")]
    InvertedRange {
        species_id: i64,
        criterion: String,
        min: f64,
        max: f64,
    },

    #[error("species {species_id}: range for '{criterion}' has a non-finite bound")]
    NonFiniteRange { species_id: i64, criterion: String },
}

impl SpeciesValidationError {
    pub fn species_id(&self) -> i64 {
        match self {
            SpeciesValidationError::InvertedRange { species_id, .. }
            | SpeciesValidationError::NonFiniteRange { species_id, .. } => *species_id,
        }
    }
}
