//! Criterion Evaluators
//!
//! One evaluator per value shape, selected by the criterion's declared
//! `ValueShape`:
//! - `range.rs` - numeric farm value vs species (min, max), soft boundaries
//! - `categorical.rs` - farm label(s) vs species acceptable labels
//! - `boolean.rs` - farm need flag vs species capability flag
//!
//! Every evaluator yields a sub-score in [0, 1] and a `FitLabel`. A missing
//! value on either side, or a value of the wrong kind for the shape, yields
//! no result at all: the criterion is left out of aggregation.

pub mod boolean;
pub mod categorical;
pub mod range;

use crate::criteria::{CriterionDefinition, CriterionFamily, ValueShape};
use crate::profiles::{FarmValue, SpeciesDescriptor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative outcome of one criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FitLabel {
    /// Inside the species range
    Ideal,
    /// Below the range, within the tolerance margin
    BelowOptimal,
    /// Above the range, within the tolerance margin
    AboveOptimal,
    /// Beyond the tolerance margin
    Unsuitable,
    Match,
    Mismatch,
    /// Farm has no need for the capability
    NotApplicable,
}

impl FitLabel {
    /// Text used in reason strings
    pub fn reason_text(&self) -> &'static str {
        match self {
            FitLabel::Ideal => "ideal",
            FitLabel::BelowOptimal => "below optimal",
            FitLabel::AboveOptimal => "above optimal",
            FitLabel::Unsuitable => "unsuitable",
            FitLabel::Match => "match",
            FitLabel::Mismatch => "mismatch",
            FitLabel::NotApplicable => "not applicable",
        }
    }
}

impl fmt::Display for FitLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason_text())
    }
}

/// Sub-score and label produced by a single evaluator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScore {
    pub score: f64,
    pub label: FitLabel,
}

impl SubScore {
    pub fn new(score: f64, label: FitLabel) -> Self {
        Self {
            score: score.clamp(0.0, 1.0),
            label,
        }
    }
}

/// Outcome of one (species, criterion) evaluation.
///
/// Borrows its definition: results live only as long as one species is
/// being scored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriterionResult<'a> {
    pub definition: &'a CriterionDefinition,
    pub sub_score: f64,
    pub label: FitLabel,
}

impl<'a> CriterionResult<'a> {
    pub fn key(&self) -> &'a str {
        &self.definition.key
    }

    pub fn reason_key(&self) -> &'a str {
        &self.definition.reason_key
    }

    pub fn family(&self) -> CriterionFamily {
        self.definition.family
    }

    pub fn weight(&self) -> f64 {
        self.definition.weight
    }
}

/// Evaluate one criterion.
///
/// Returns None when the criterion must be excluded from aggregation.
pub fn evaluate<'a>(
    definition: &'a CriterionDefinition,
    farm_value: Option<&FarmValue>,
    species_descriptor: Option<&SpeciesDescriptor>,
) -> Option<CriterionResult<'a>> {
    let (Some(farm_value), Some(species_descriptor)) = (farm_value, species_descriptor) else {
        return None;
    };

    let sub_score = match definition.shape {
        ValueShape::Range => {
            range::evaluate(farm_value, species_descriptor, definition.tolerance_margin)
        }
        ValueShape::CategoricalSet => categorical::evaluate(farm_value, species_descriptor),
        ValueShape::BooleanCapability => boolean::evaluate(farm_value, species_descriptor),
    };

    match sub_score {
        Some(SubScore { score, label }) => Some(CriterionResult {
            definition,
            sub_score: score,
            label,
        }),
        None => {
            tracing::debug!(
                "Criterion '{}' excluded: {:?} not comparable with {:?} as {:?}",
                definition.key,
                farm_value,
                species_descriptor,
                definition.shape
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{keys, CriterionFamily};
    use approx::assert_relative_eq;

    #[test]
    fn test_dispatch_by_shape() {
        let def = CriterionDefinition::range(keys::RAINFALL, "rainfall", CriterionFamily::Bioclimate, 1.0);
        let result = evaluate(
            &def,
            Some(&FarmValue::Number(1600.0)),
            Some(&SpeciesDescriptor::Range { min: 800.0, max: 1500.0 }),
        )
        .unwrap();

        assert_eq!(result.label, FitLabel::AboveOptimal);
        assert_relative_eq!(result.sub_score, 1.0 - 100.0 / 350.0, epsilon = 1e-12);
        assert_eq!(result.reason_key(), "rainfall");
        assert_eq!(result.weight(), 1.0);
    }

    #[test]
    fn test_missing_side_excluded() {
        let def = CriterionDefinition::capability(keys::RIPARIAN, "riparian", 0.5);
        assert!(evaluate(&def, None, Some(&SpeciesDescriptor::Capability(true))).is_none());
        assert!(evaluate(&def, Some(&FarmValue::Flag(true)), None).is_none());
    }

    #[test]
    fn test_kind_mismatch_excluded() {
        let def = CriterionDefinition::range(keys::PH, "ph", CriterionFamily::Soil, 1.0);
        let result = evaluate(
            &def,
            Some(&FarmValue::Label("acidic".to_string())),
            Some(&SpeciesDescriptor::Range { min: 5.0, max: 7.0 }),
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_sub_score_clamped() {
        assert_eq!(SubScore::new(1.2, FitLabel::Ideal).score, 1.0);
        assert_eq!(SubScore::new(-0.1, FitLabel::Unsuitable).score, 0.0);
    }
}
