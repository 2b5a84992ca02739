//! Criterion definitions
//!
//! A criterion is declarative data: which key it reads on both profiles,
//! which value shape decides its evaluator, which family it belongs to and
//! how much it weighs. Adding a criterion means adding a definition here
//! (or pushing one into a registry at runtime); evaluators, aggregation and
//! ranking never name individual criteria.

pub mod registry;

pub use registry::CriterionRegistry;

use serde::{Deserialize, Serialize};

/// Criterion keys shared by profiles and the built-in registry
pub mod keys {
    pub const RAINFALL: &str = "rainfall_mm";
    pub const TEMPERATURE: &str = "temperature_celsius";
    pub const ELEVATION: &str = "elevation_m";
    pub const SLOPE: &str = "slope";
    pub const PH: &str = "ph";
    pub const SOIL_TEXTURE: &str = "soil_texture";
    pub const COASTAL: &str = "coastal";
    pub const RIPARIAN: &str = "riparian";
    pub const NITROGEN_FIXING: &str = "nitrogen_fixing";
    pub const SHADE_TOLERANT: &str = "shade_tolerant";
    pub const BANK_STABILISING: &str = "bank_stabilising";
    pub const AGROFORESTRY_TYPES: &str = "agroforestry_types";
}

/// Default soft-boundary width, as a fraction of the species' range width
pub const DEFAULT_TOLERANCE_MARGIN: f64 = 0.5;

/// Feature family a criterion belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionFamily {
    Bioclimate,
    Soil,
    Topographic,
    EcologicalFunction,
    AgroforestryUse,
}

impl CriterionFamily {
    pub fn display_text(&self) -> &'static str {
        match self {
            CriterionFamily::Bioclimate => "bioclimate",
            CriterionFamily::Soil => "soil",
            CriterionFamily::Topographic => "topographic",
            CriterionFamily::EcologicalFunction => "ecological function",
            CriterionFamily::AgroforestryUse => "agroforestry use",
        }
    }
}

/// How a farm value is compared against a species descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueShape {
    /// Numeric farm value vs species (min, max)
    Range,
    /// Farm label (or label set) vs species acceptable labels
    CategoricalSet,
    /// Farm need flag vs species capability flag
    BooleanCapability,
}

/// One scoring criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionDefinition {
    /// Key read from FarmProfile and SpeciesProfile
    pub key: String,
    /// Prefix of the reason string, e.g. "rainfall" in "rainfall:ideal"
    pub reason_key: String,
    pub family: CriterionFamily,
    pub shape: ValueShape,
    /// Relative importance, finite and >= 0
    pub weight: f64,
    /// Soft-boundary width as a fraction of range width (range criteria only)
    #[serde(default = "default_tolerance_margin")]
    pub tolerance_margin: f64,
}

fn default_tolerance_margin() -> f64 {
    DEFAULT_TOLERANCE_MARGIN
}

impl CriterionDefinition {
    pub fn new(
        key: impl Into<String>,
        reason_key: impl Into<String>,
        family: CriterionFamily,
        shape: ValueShape,
        weight: f64,
    ) -> Self {
        Self {
            key: key.into(),
            reason_key: reason_key.into(),
            family,
            shape,
            weight,
            tolerance_margin: DEFAULT_TOLERANCE_MARGIN,
        }
    }

    pub fn range(key: &str, reason_key: &str, family: CriterionFamily, weight: f64) -> Self {
        Self::new(key, reason_key, family, ValueShape::Range, weight)
    }

    pub fn categorical(key: &str, reason_key: &str, family: CriterionFamily, weight: f64) -> Self {
        Self::new(key, reason_key, family, ValueShape::CategoricalSet, weight)
    }

    pub fn capability(key: &str, reason_key: &str, weight: f64) -> Self {
        Self::new(
            key,
            reason_key,
            CriterionFamily::EcologicalFunction,
            ValueShape::BooleanCapability,
            weight,
        )
    }

    pub fn with_tolerance_margin(mut self, margin: f64) -> Self {
        self.tolerance_margin = margin;
        self
    }
}

/// The built-in criteria in reason order
pub fn builtin_criteria() -> Vec<CriterionDefinition> {
    use CriterionFamily::*;

    vec![
        // Bioclimate
        CriterionDefinition::range(keys::RAINFALL, "rainfall", Bioclimate, 1.0),
        CriterionDefinition::range(keys::TEMPERATURE, "temp", Bioclimate, 1.0),
        // Topography
        CriterionDefinition::range(keys::ELEVATION, "elevation", Topographic, 1.0),
        CriterionDefinition::range(keys::SLOPE, "slope", Topographic, 0.5),
        // Soil
        CriterionDefinition::range(keys::PH, "ph", Soil, 1.0),
        CriterionDefinition::categorical(keys::SOIL_TEXTURE, "soil", Soil, 1.0),
        // Ecological function
        CriterionDefinition::capability(keys::COASTAL, "coastal", 0.5),
        CriterionDefinition::capability(keys::RIPARIAN, "riparian", 0.5),
        CriterionDefinition::capability(keys::NITROGEN_FIXING, "nitrogen_fixing", 0.5),
        CriterionDefinition::capability(keys::SHADE_TOLERANT, "shade_tolerant", 0.5),
        CriterionDefinition::capability(keys::BANK_STABILISING, "bank_stabilising", 0.5),
        // Agroforestry use
        CriterionDefinition::categorical(keys::AGROFORESTRY_TYPES, "agroforestry", AgroforestryUse, 0.5),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_keys_unique() {
        let criteria = builtin_criteria();
        let mut seen = std::collections::HashSet::new();
        for def in &criteria {
            assert!(seen.insert(def.key.clone()), "duplicate key {}", def.key);
            assert!(def.weight >= 0.0);
        }
        assert_eq!(criteria.len(), 12);
    }

    #[test]
    fn test_definition_deserialize_defaults_margin() {
        let def: CriterionDefinition = serde_json::from_str(
            r#"{"key": "frost_days", "reason_key": "frost", "family": "bioclimate",
                "shape": "range", "weight": 0.8}"#,
        )
        .unwrap();
        assert_eq!(def.shape, ValueShape::Range);
        assert_eq!(def.tolerance_margin, DEFAULT_TOLERANCE_MARGIN);
    }
}
