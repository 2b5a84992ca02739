//! Categorical-set evaluator
//!
//! Exact membership only: texture classes and agroforestry types have no
//! ordering, so a near miss earns nothing.

use super::{FitLabel, SubScore};
use crate::profiles::{FarmValue, SpeciesDescriptor};
use std::collections::BTreeSet;

fn same_label(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

fn accepts(acceptable: &BTreeSet<String>, label: &str) -> bool {
    acceptable.contains(label) || acceptable.iter().any(|candidate| same_label(candidate, label))
}

/// Single farm label vs the species' acceptable set
pub fn score_label(label: &str, acceptable: &BTreeSet<String>) -> SubScore {
    if accepts(acceptable, label) {
        SubScore::new(1.0, FitLabel::Match)
    } else {
        SubScore::new(0.0, FitLabel::Mismatch)
    }
}

/// Farm label set vs the species' acceptable set.
///
/// Matches when the species serves at least one of the requested labels.
/// An empty request carries no information and yields None.
pub fn score_label_set(requested: &BTreeSet<String>, acceptable: &BTreeSet<String>) -> Option<SubScore> {
    if requested.is_empty() {
        return None;
    }

    if requested.iter().any(|label| accepts(acceptable, label)) {
        Some(SubScore::new(1.0, FitLabel::Match))
    } else {
        Some(SubScore::new(0.0, FitLabel::Mismatch))
    }
}

/// Shape-checked entry point used by the dispatcher
pub fn evaluate(farm_value: &FarmValue, species_descriptor: &SpeciesDescriptor) -> Option<SubScore> {
    match (farm_value, species_descriptor) {
        (FarmValue::Label(label), SpeciesDescriptor::Labels(acceptable)) => {
            Some(score_label(label, acceptable))
        }
        (FarmValue::Labels(requested), SpeciesDescriptor::Labels(acceptable)) => {
            score_label_set(requested, acceptable)
        }
        _ => None,
    }
}
