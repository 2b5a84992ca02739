//! Scoring configuration
//!
//! Loaded from a JSON file, e.g.
//!
//! ```json
//! {
//!   "default_tolerance_margin": 0.5,
//!   "family_weights": { "bioclimate": 2.0 },
//!   "criteria": { "ph": { "weight": 1.5, "tolerance_margin": 0.25 } },
//!   "extra_criteria": [
//!     { "key": "frost_days", "reason_key": "frost", "family": "bioclimate",
//!       "shape": "range", "weight": 0.5 }
//!   ],
//!   "parallel": true
//! }
//! ```
//!
//! Every field is optional; an empty object gives the built-in behaviour.

use crate::criteria::{CriterionDefinition, CriterionFamily, DEFAULT_TOLERANCE_MARGIN};
use crate::error::ScoringError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Per-criterion weight / margin override
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriterionOverride {
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub tolerance_margin: Option<f64>,
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Tolerance margin for range criteria without an explicit override
    pub default_tolerance_margin: f64,

    /// Multiplier applied to every criterion weight in a family (default 1.0)
    pub family_weights: BTreeMap<CriterionFamily, f64>,

    /// Overrides keyed by criterion key
    pub criteria: BTreeMap<String, CriterionOverride>,

    /// Criteria appended after the built-in ones
    pub extra_criteria: Vec<CriterionDefinition>,

    /// Score species on the rayon pool
    pub parallel: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            default_tolerance_margin: DEFAULT_TOLERANCE_MARGIN,
            family_weights: BTreeMap::new(),
            criteria: BTreeMap::new(),
            extra_criteria: Vec::new(),
            parallel: true,
        }
    }
}

pub(crate) fn check_weight(key: &str, weight: f64) -> std::result::Result<(), ScoringError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(ScoringError::InvalidWeight { key: key.to_string(), weight })
    }
}

pub(crate) fn check_margin(key: &str, margin: f64) -> std::result::Result<(), ScoringError> {
    if margin.is_finite() && margin >= 0.0 {
        Ok(())
    } else {
        Err(ScoringError::InvalidToleranceMargin { key: key.to_string(), margin })
    }
}

impl ScoringConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scoring config: {:?}", path))?;

        let config: ScoringConfig = serde_json::from_str(&contents)
            .with_context(|| "Failed to parse scoring config JSON")?;

        config.validate()?;

        Ok(config)
    }

    /// Multiplier for a family
    pub fn family_weight(&self, family: CriterionFamily) -> f64 {
        self.family_weights.get(&family).copied().unwrap_or(1.0)
    }

    /// Check numeric fields. Unknown criterion keys are only detectable
    /// against a registry, see `CriterionRegistry::from_config`.
    pub fn validate(&self) -> std::result::Result<(), ScoringError> {
        check_margin("default", self.default_tolerance_margin)?;

        for (family, weight) in &self.family_weights {
            check_weight(family.display_text(), *weight)?;
        }

        for (key, over) in &self.criteria {
            if let Some(weight) = over.weight {
                check_weight(key, weight)?;
            }
            if let Some(margin) = over.tolerance_margin {
                check_margin(key, margin)?;
            }
        }

        for def in &self.extra_criteria {
            check_weight(&def.key, def.weight)?;
            check_margin(&def.key, def.tolerance_margin)?;
        }

        Ok(())
    }
}
