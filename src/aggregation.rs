//! Aggregator
//!
//! Weighted mean of the applicable sub-scores:
//!
//! ```text
//! score = Σ(sub_score_i × weight_i) / Σ(weight_i)
//! ```
//!
//! Excluded criteria never reach this point, so missing data neither helps
//! nor hurts a species.

use crate::evaluators::CriterionResult;

/// Aggregated score for one species
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    /// Final score in [0, 1]
    pub score: f64,
    /// Σ weight over the applicable criteria (may be infinite for weights
    /// not vetted by a registry)
    pub total_weight: f64,
    /// Number of applicable criteria
    pub applicable: usize,
}

impl Aggregate {
    /// True when nothing could be scored
    pub fn is_insufficient(&self) -> bool {
        self.applicable == 0
    }
}

fn weighted_mean(results: &[CriterionResult<'_>], scale: f64) -> Option<f64> {
    let (weighted_sum, total_weight) = results.iter().fold((0.0, 0.0), |(sum, total), r| {
        let weight = r.weight() / scale;
        (sum + r.sub_score * weight, total + weight)
    });

    if total_weight > 0.0 {
        Some(weighted_sum / total_weight)
    } else {
        None
    }
}

/// Combine criterion results into one score.
///
/// An empty set, or one where every weight is zero, scores 0.0. Weights
/// whose sum overflows are rescaled by the largest weight first; a score
/// that still is not finite becomes 0.0.
pub fn aggregate(results: &[CriterionResult<'_>]) -> Aggregate {
    let total_weight: f64 = results.iter().map(|r| r.weight()).sum();

    let mean = if total_weight.is_finite() {
        weighted_mean(results, 1.0)
    } else {
        let largest = results.iter().map(|r| r.weight()).fold(0.0, f64::max);
        if largest.is_finite() && largest > 0.0 {
            weighted_mean(results, largest)
        } else {
            None
        }
    };

    let score = match mean {
        Some(mean) if mean.is_finite() => mean.clamp(0.0, 1.0),
        _ => 0.0,
    };

    Aggregate {
        score,
        total_weight,
        applicable: results.len(),
    }
}
