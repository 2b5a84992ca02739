//! Recommendation payload
//!
//! JSON shape handed to the downstream ranking/reporting layer:
//!
//! ```json
//! {
//!   "farm_id": 12,
//!   "timestamp_utc": "2026-01-01T00:00:00Z",
//!   "recommendations": [
//!     { "species_id": 3, "species_name": "...", "species_common_name": "...",
//!       "score_mcda": 0.93, "rank_overall": 1, "key_reasons": ["rainfall:ideal"] }
//!   ]
//! }
//! ```

use crate::scorer::{ScoredRecommendation, ScoringRun};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationReport {
    pub farm_id: i64,
    /// ISO-8601, supplied by the caller
    pub timestamp_utc: String,
    pub recommendations: Vec<ScoredRecommendation>,
}

impl RecommendationReport {
    pub fn new(
        farm_id: i64,
        timestamp_utc: impl Into<String>,
        recommendations: Vec<ScoredRecommendation>,
    ) -> Self {
        Self {
            farm_id,
            timestamp_utc: timestamp_utc.into(),
            recommendations,
        }
    }

    /// Build from a finished run; rejected species are not part of the payload
    pub fn from_run(run: ScoringRun, timestamp_utc: impl Into<String>) -> Self {
        Self::new(run.farm_id, timestamp_utc, run.recommendations)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).with_context(|| "Failed to serialise recommendations")
    }
}
