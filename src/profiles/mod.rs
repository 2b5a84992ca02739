//! Farm and species profiles
//!
//! Scoring works on key → value maps rather than fixed structs so that new
//! criteria can be added without touching the scorer:
//! - `farm.rs` - FarmRecord (data dictionary) and FarmProfile (scoring view)
//! - `species.rs` - SpeciesRecord (data dictionary) and SpeciesProfile
//! - `texture.rs` - USDA soil texture classes and name normalisation

pub mod farm;
pub mod species;
pub mod texture;

pub use farm::{FarmProfile, FarmRecord, RangeViolation};
pub use species::{SpeciesProfile, SpeciesRecord};
pub use texture::{normalize_texture_name, SoilTexture};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A farm-side value for one criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FarmValue {
    /// Scalar measurement (rainfall, temperature, elevation, pH, slope)
    Number(f64),
    /// Single categorical label (soil texture)
    Label(String),
    /// Need flag (farm needs a nitrogen-fixing species, ...)
    Flag(bool),
    /// Set of categorical labels (desired agroforestry types)
    Labels(BTreeSet<String>),
}

/// A species-side tolerance descriptor for one criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeciesDescriptor {
    /// Numeric tolerance range, invariant min <= max
    Range { min: f64, max: f64 },
    /// Acceptable labels (preferred soil textures, agroforestry uses)
    Labels(BTreeSet<String>),
    /// Whether the species provides / tolerates a condition
    Capability(bool),
}

/// Normalise a free-text label for set comparison: trimmed and lower-cased.
/// Returns None for blank input.
pub fn normalize_label(raw: &str) -> Option<String> {
    let label = raw.trim().to_lowercase();
    if label.is_empty() {
        None
    } else {
        Some(label)
    }
}

/// Collect labels into a normalised set; empty input gives None
pub(crate) fn label_set<I, S>(labels: I) -> Option<BTreeSet<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let set: BTreeSet<String> = labels
        .into_iter()
        .filter_map(|label| normalize_label(label.as_ref()))
        .collect();

    if set.is_empty() {
        None
    } else {
        Some(set)
    }
}
