//! Boolean-capability evaluator

use super::{FitLabel, SubScore};
use crate::profiles::{FarmValue, SpeciesDescriptor};

/// Farm need vs species capability.
///
/// No need means nothing to satisfy: full score, `NotApplicable`.
pub fn score_capability(farm_needs: bool, species_provides: bool) -> SubScore {
    match (farm_needs, species_provides) {
        (false, _) => SubScore::new(1.0, FitLabel::NotApplicable),
        (true, true) => SubScore::new(1.0, FitLabel::Match),
        (true, false) => SubScore::new(0.0, FitLabel::Mismatch),
    }
}

/// Shape-checked entry point used by the dispatcher
pub fn evaluate(farm_value: &FarmValue, species_descriptor: &SpeciesDescriptor) -> Option<SubScore> {
    match (farm_value, species_descriptor) {
        (FarmValue::Flag(need), SpeciesDescriptor::Capability(provides)) => {
            Some(score_capability(*need, *provides))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_truth_table() {
        assert_eq!(score_capability(false, false), SubScore::new(1.0, FitLabel::NotApplicable));
        assert_eq!(score_capability(false, true), SubScore::new(1.0, FitLabel::NotApplicable));
        assert_eq!(score_capability(true, true), SubScore::new(1.0, FitLabel::Match));
        assert_eq!(score_capability(true, false), SubScore::new(0.0, FitLabel::Mismatch));
    }

    #[test]
    fn test_evaluate_requires_flags() {
        assert!(evaluate(&FarmValue::Number(1.0), &SpeciesDescriptor::Capability(true)).is_none());
        assert_eq!(
            evaluate(&FarmValue::Flag(true), &SpeciesDescriptor::Capability(false)),
            Some(SubScore::new(0.0, FitLabel::Mismatch))
        );
    }
}
