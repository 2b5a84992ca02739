//! Tree Suitability Scorer
//!
//! Scores how well each candidate tree species suits a farm, explains each
//! score with short reasons, and ranks the candidates.
//!
//! Pipeline per species:
//! - `criteria/`: Criterion registry (key, family, value shape, weight, tolerance)
//! - `evaluators/`: Range, categorical-set and boolean-capability sub-scores
//! - `explanation/`: `"<criterion>:<label>"` reasons
//! - `aggregation`: Weighted mean of applicable sub-scores
//! - `scorer`: Orchestration, sequential or rayon-parallel, plus ranking
//!
//! Supporting modules:
//! - `profiles/`: Farm and species records and their key → value profiles
//! - `data`: Species catalog loading with Polars
//! - `config`: JSON scoring configuration
//! - `output`: Recommendation payload

pub mod aggregation;
pub mod config;
pub mod criteria;
pub mod data;
pub mod error;
pub mod evaluators;
pub mod explanation;
pub mod output;
pub mod profiles;
pub mod scorer;

// Re-export commonly used types
pub use aggregation::{aggregate, Aggregate};
pub use config::{CriterionOverride, ScoringConfig};
pub use criteria::{CriterionDefinition, CriterionFamily, CriterionRegistry, ValueShape};
pub use data::SpeciesCatalog;
pub use error::{ScoringError, SpeciesValidationError};
pub use evaluators::{CriterionResult, FitLabel, SubScore};
pub use explanation::{ExplanationBuilder, INSUFFICIENT_DATA};
pub use output::RecommendationReport;
pub use profiles::{FarmProfile, FarmRecord, FarmValue, SpeciesDescriptor, SpeciesProfile, SpeciesRecord};
pub use scorer::{rank, ScoredRecommendation, ScoringRun, SpeciesScore, SpeciesScorer};
