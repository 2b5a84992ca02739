//! Species Scorer - public entry point of the scoring engine
//!
//! For each species: validate → evaluate every registry criterion →
//! build reasons → aggregate. Species are independent, so the per-species
//! step runs sequentially or fanned out over rayon; ranking is one
//! sequential pass over the complete result set either way.

use crate::aggregation::aggregate;
use crate::config::ScoringConfig;
use crate::criteria::CriterionRegistry;
use crate::error::{ScoringError, SpeciesValidationError};
use crate::evaluators::{evaluate, CriterionResult};
use crate::explanation::ExplanationBuilder;
use crate::profiles::{FarmProfile, SpeciesProfile};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;

/// Criterion results for one species; the built-in registry fits inline
type CriterionResults<'a> = SmallVec<[CriterionResult<'a>; 16]>;

/// Main species scorer
#[derive(Debug, Clone)]
pub struct SpeciesScorer {
    registry: CriterionRegistry,
    parallel: bool,
}

/// Unranked score for one species
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesScore {
    pub species_id: i64,
    pub species_name: String,
    pub species_common_name: String,
    /// Weighted score in [0, 1]
    pub score: f64,
    /// Reasons in registry order
    pub reasons: Vec<String>,
    /// Criteria that contributed to the score
    pub applicable: usize,
}

/// Ranked recommendation, serialised as one entry of `recommendations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecommendation {
    pub species_id: i64,
    pub species_name: String,
    pub species_common_name: String,
    pub score_mcda: f64,
    /// 1 = best
    pub rank_overall: usize,
    pub key_reasons: Vec<String>,
}

/// Result of scoring one farm against a species list
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringRun {
    pub farm_id: i64,
    /// Ranked, best first
    pub recommendations: Vec<ScoredRecommendation>,
    /// Species refused for invalid input, in input order; never ranked
    pub rejected: Vec<SpeciesValidationError>,
}

impl ScoringRun {
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty() && self.rejected.is_empty()
    }
}

impl SpeciesScorer {
    /// Scorer over an explicit registry (sequential by default)
    pub fn new(registry: CriterionRegistry) -> Self {
        Self {
            registry,
            parallel: false,
        }
    }

    /// Scorer over the configured registry; honours `config.parallel`
    pub fn from_config(config: &ScoringConfig) -> Result<Self, ScoringError> {
        let registry = CriterionRegistry::from_config(config)?;
        Ok(Self {
            registry,
            parallel: config.parallel,
        })
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn registry(&self) -> &CriterionRegistry {
        &self.registry
    }

    /// Score one species against a farm.
    ///
    /// Keys present in either profile but absent from the registry are
    /// ignored; criteria missing on either side are left out.
    pub fn score_species(
        &self,
        farm: &FarmProfile,
        species: &SpeciesProfile,
    ) -> Result<SpeciesScore, SpeciesValidationError> {
        species.validate()?;

        let results: CriterionResults<'_> = self
            .registry
            .iter()
            .filter_map(|def| evaluate(def, farm.get(&def.key), species.get(&def.key)))
            .collect();

        let reasons = ExplanationBuilder::build(&results);
        let aggregate = aggregate(&results);

        tracing::debug!(
            "Species {} ({}): score {:.4} from {}/{} criteria",
            species.species_id,
            species.species_name,
            aggregate.score,
            aggregate.applicable,
            self.registry.len()
        );

        Ok(SpeciesScore {
            species_id: species.species_id,
            species_name: species.species_name.clone(),
            species_common_name: species.species_common_name.clone(),
            score: aggregate.score,
            reasons,
            applicable: aggregate.applicable,
        })
    }

    /// Score every species sequentially, then rank
    pub fn score(&self, farm: &FarmProfile, species_list: &[SpeciesProfile]) -> ScoringRun {
        let outcomes: Vec<_> = species_list
            .iter()
            .map(|species| self.score_species(farm, species))
            .collect();

        Self::finish(farm.farm_id, outcomes)
    }

    /// Score every species on the rayon pool, then rank.
    ///
    /// Produces exactly the output of `score`.
    pub fn score_parallel(&self, farm: &FarmProfile, species_list: &[SpeciesProfile]) -> ScoringRun {
        let outcomes: Vec<_> = species_list
            .par_iter()
            .map(|species| self.score_species(farm, species))
            .collect();

        Self::finish(farm.farm_id, outcomes)
    }

    /// Score using the configured mode
    pub fn run(&self, farm: &FarmProfile, species_list: &[SpeciesProfile]) -> ScoringRun {
        if self.parallel {
            self.score_parallel(farm, species_list)
        } else {
            self.score(farm, species_list)
        }
    }

    fn finish(
        farm_id: i64,
        outcomes: Vec<Result<SpeciesScore, SpeciesValidationError>>,
    ) -> ScoringRun {
        let mut scores = Vec::with_capacity(outcomes.len());
        let mut rejected = Vec::new();

        for outcome in outcomes {
            match outcome {
                Ok(score) => scores.push(score),
                Err(err) => {
                    tracing::warn!("Rejected species: {}", err);
                    rejected.push(err);
                }
            }
        }

        let recommendations = rank(scores);

        tracing::info!(
            "Farm {}: ranked {} species ({} rejected)",
            farm_id,
            recommendations.len(),
            rejected.len()
        );

        ScoringRun {
            farm_id,
            recommendations,
            rejected,
        }
    }
}

impl Default for SpeciesScorer {
    fn default() -> Self {
        Self::new(CriterionRegistry::builtin())
    }
}

/// Order for ranking: higher score first, then lower species id
fn ranking_order(a: &SpeciesScore, b: &SpeciesScore) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.species_id.cmp(&b.species_id))
}

/// Assign ranks 1..N.
///
/// Needs the complete score set; the sort is stable, so duplicate ids with
/// equal scores keep their input order.
pub fn rank(mut scores: Vec<SpeciesScore>) -> Vec<ScoredRecommendation> {
    scores.sort_by(ranking_order);

    scores
        .into_iter()
        .enumerate()
        .map(|(idx, s)| ScoredRecommendation {
            species_id: s.species_id,
            species_name: s.species_name,
            species_common_name: s.species_common_name,
            score_mcda: s.score,
            rank_overall: idx + 1,
            key_reasons: s.reasons,
        })
        .collect()
}
