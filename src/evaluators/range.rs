//! Range evaluator
//!
//! Compares a numeric farm value against a species tolerance range with a
//! soft boundary on each side. Inside the range scores 1.0; outside, the
//! score falls linearly to 0.0 at `tolerance_margin × range width` beyond
//! the nearest bound.

use super::{FitLabel, SubScore};
use crate::profiles::{FarmValue, SpeciesDescriptor};

/// Where a value falls relative to a range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeFit {
    /// value < min
    BelowRange,
    /// min <= value <= max
    WithinRange,
    /// value > max
    AboveRange,
}

/// A value compared against a species range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeComparison {
    pub fit: RangeFit,
    pub value: f64,
    pub min: f64,
    pub max: f64,
    /// Distance from nearest bound (0 inside the range)
    pub distance_from_range: f64,
}

impl RangeComparison {
    pub fn range_width(&self) -> f64 {
        self.max - self.min
    }

    pub fn is_within_range(&self) -> bool {
        self.fit == RangeFit::WithinRange
    }

    /// Width of the soft boundary for a given margin fraction
    pub fn margin_width(&self, tolerance_margin: f64) -> f64 {
        tolerance_margin * self.range_width()
    }
}

/// Compare a value against a (validated, min <= max) range
pub fn compare_to_range(value: f64, min: f64, max: f64) -> RangeComparison {
    let (fit, distance) = if value < min {
        (RangeFit::BelowRange, min - value)
    } else if value > max {
        (RangeFit::AboveRange, value - max)
    } else {
        (RangeFit::WithinRange, 0.0)
    };

    RangeComparison {
        fit,
        value,
        min,
        max,
        distance_from_range: distance,
    }
}

/// Score a numeric value against a range.
///
/// A zero-width range (or zero margin) has no soft boundary: any value
/// outside it is unsuitable.
pub fn score_range(value: f64, min: f64, max: f64, tolerance_margin: f64) -> SubScore {
    let comparison = compare_to_range(value, min, max);
    let margin = comparison.margin_width(tolerance_margin);

    let partial_label = match comparison.fit {
        RangeFit::WithinRange => return SubScore::new(1.0, FitLabel::Ideal),
        RangeFit::BelowRange => FitLabel::BelowOptimal,
        RangeFit::AboveRange => FitLabel::AboveOptimal,
    };

    if comparison.distance_from_range >= margin {
        SubScore::new(0.0, FitLabel::Unsuitable)
    } else {
        SubScore::new(1.0 - comparison.distance_from_range / margin, partial_label)
    }
}

/// Shape-checked entry point used by the dispatcher
pub fn evaluate(
    farm_value: &FarmValue,
    species_descriptor: &SpeciesDescriptor,
    tolerance_margin: f64,
) -> Option<SubScore> {
    match (farm_value, species_descriptor) {
        (FarmValue::Number(value), SpeciesDescriptor::Range { min, max }) if value.is_finite() => {
            Some(score_range(*value, *min, *max, tolerance_margin))
        }
        _ => None,
    }
}
