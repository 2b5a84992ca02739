//! Criterion Definition Registry
//!
//! Ordered list of criteria with an O(1) key index. The order is the order
//! reasons appear in every explanation. A registry is read-only once a run
//! starts and is shared by reference across rayon workers.

use super::{builtin_criteria, CriterionDefinition};
use crate::config::{check_margin, check_weight, ScoringConfig};
use crate::error::ScoringError;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default)]
pub struct CriterionRegistry {
    definitions: Vec<CriterionDefinition>,
    index: FxHashMap<String, usize>,
}

impl CriterionRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in criteria
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for def in builtin_criteria() {
            // Built-ins have unique keys and valid weights
            if let Err(err) = registry.push(def) {
                tracing::error!("Invalid built-in criterion: {}", err);
            }
        }
        registry
    }

    /// Build from an ordered list of definitions
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = CriterionDefinition>,
    ) -> Result<Self, ScoringError> {
        let mut registry = Self::new();
        for def in definitions {
            registry.push(def)?;
        }
        Ok(registry)
    }

    /// Built-in criteria with the configuration applied.
    ///
    /// Order of application:
    /// 1. `default_tolerance_margin` on every built-in criterion
    /// 2. `extra_criteria` appended after the built-ins, margins as declared
    /// 3. per-criterion overrides (unknown keys are an error)
    /// 4. family multipliers on the resulting weights
    pub fn from_config(config: &ScoringConfig) -> Result<Self, ScoringError> {
        config.validate()?;

        let mut definitions: Vec<CriterionDefinition> = builtin_criteria()
            .into_iter()
            .map(|def| def.with_tolerance_margin(config.default_tolerance_margin))
            .collect();
        definitions.extend(config.extra_criteria.iter().cloned());

        let mut registry = Self::from_definitions(definitions)?;

        for (key, over) in &config.criteria {
            let idx = *registry
                .index
                .get(key)
                .ok_or_else(|| ScoringError::UnknownCriterion(key.clone()))?;
            let def = &mut registry.definitions[idx];
            if let Some(weight) = over.weight {
                def.weight = weight;
            }
            if let Some(margin) = over.tolerance_margin {
                def.tolerance_margin = margin;
            }
        }

        let mut total_weight = 0.0;
        for def in &mut registry.definitions {
            def.weight *= config.family_weight(def.family);
            check_weight(&def.key, def.weight)?;

            total_weight += def.weight;
            if !total_weight.is_finite() {
                return Err(ScoringError::TotalWeightOverflow(def.key.clone()));
            }
        }

        Ok(registry)
    }

    /// Append a criterion
    pub fn push(&mut self, definition: CriterionDefinition) -> Result<(), ScoringError> {
        if self.index.contains_key(&definition.key) {
            return Err(ScoringError::DuplicateCriterion(definition.key));
        }
        check_weight(&definition.key, definition.weight)?;
        check_margin(&definition.key, definition.tolerance_margin)?;
        if !(self.total_weight() + definition.weight).is_finite() {
            return Err(ScoringError::TotalWeightOverflow(definition.key));
        }

        self.index.insert(definition.key.clone(), self.definitions.len());
        self.definitions.push(definition);
        Ok(())
    }

    /// Builder form of `push`
    pub fn with(mut self, definition: CriterionDefinition) -> Result<Self, ScoringError> {
        self.push(definition)?;
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&CriterionDefinition> {
        self.index.get(key).map(|&idx| &self.definitions[idx])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Criteria in registry order
    pub fn iter(&self) -> impl Iterator<Item = &CriterionDefinition> {
        self.definitions.iter()
    }

    /// Σ weight over every criterion; finite for any registry built here
    pub fn total_weight(&self) -> f64 {
        self.definitions.iter().map(|def| def.weight).sum()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CriterionOverride;
    use crate::criteria::{keys, CriterionFamily, ValueShape};
    use approx::assert_relative_eq;

    #[test]
    fn test_builtin_order_and_lookup() {
        let registry = CriterionRegistry::builtin();
        assert_eq!(registry.len(), 12);

        let first = registry.iter().next().unwrap();
        assert_eq!(first.key, keys::RAINFALL);

        let soil = registry.get(keys::SOIL_TEXTURE).unwrap();
        assert_eq!(soil.shape, ValueShape::CategoricalSet);
        assert_eq!(soil.reason_key, "soil");
        assert!(registry.get("canopy_height").is_none());
    }

    #[test]
    fn test_push_rejects_duplicates() {
        let mut registry = CriterionRegistry::builtin();
        let dup = CriterionDefinition::range(keys::PH, "ph", CriterionFamily::Soil, 1.0);
        assert_eq!(
            registry.push(dup),
            Err(ScoringError::DuplicateCriterion(keys::PH.to_string()))
        );
    }

    #[test]
    fn test_push_appends_in_order() {
        let registry = CriterionRegistry::builtin()
            .with(CriterionDefinition::range("frost_days", "frost", CriterionFamily::Bioclimate, 0.5))
            .unwrap();
        assert_eq!(registry.len(), 13);
        assert_eq!(registry.iter().last().unwrap().key, "frost_days");
        assert!(registry.contains("frost_days"));
    }

    #[test]
    fn test_push_rejects_invalid_weight() {
        let mut registry = CriterionRegistry::new();
        let def = CriterionDefinition::range("x", "x", CriterionFamily::Soil, f64::INFINITY);
        assert!(matches!(registry.push(def), Err(ScoringError::InvalidWeight { .. })));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_push_rejects_total_weight_overflow() {
        let mut registry = CriterionRegistry::new();
        registry
            .push(CriterionDefinition::range("a", "a", CriterionFamily::Bioclimate, f64::MAX))
            .unwrap();

        let second = CriterionDefinition::range("b", "b", CriterionFamily::Bioclimate, f64::MAX);
        assert_eq!(
            registry.push(second),
            Err(ScoringError::TotalWeightOverflow("b".to_string()))
        );
        assert_eq!(registry.len(), 1);
        assert!(registry.total_weight().is_finite());
    }

    #[test]
    fn test_from_config_rejects_overflowing_family_weight() {
        let mut config = ScoringConfig::default();
        config.family_weights.insert(CriterionFamily::Bioclimate, 1e308);
        config.criteria.insert(
            keys::RAINFALL.to_string(),
            CriterionOverride { weight: Some(1e308), tolerance_margin: None },
        );

        assert!(matches!(
            CriterionRegistry::from_config(&config),
            Err(ScoringError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn test_from_config_rejects_overflowing_total() {
        let mut config = ScoringConfig::default();
        config.family_weights.insert(CriterionFamily::Bioclimate, f64::MAX);

        // rainfall and temperature each reach f64::MAX; their sum does not fit
        assert_eq!(
            CriterionRegistry::from_config(&config).unwrap_err(),
            ScoringError::TotalWeightOverflow(keys::TEMPERATURE.to_string())
        );
    }

    #[test]
    fn test_from_config_applies_overrides_and_family_weights() {
        let mut config = ScoringConfig::default();
        config.default_tolerance_margin = 0.3;
        config.family_weights.insert(CriterionFamily::Soil, 2.0);
        config.criteria.insert(
            keys::PH.to_string(),
            CriterionOverride { weight: Some(1.5), tolerance_margin: Some(0.1) },
        );

        let registry = CriterionRegistry::from_config(&config).unwrap();

        let ph = registry.get(keys::PH).unwrap();
        assert_relative_eq!(ph.weight, 3.0);
        assert_relative_eq!(ph.tolerance_margin, 0.1);

        let rainfall = registry.get(keys::RAINFALL).unwrap();
        assert_relative_eq!(rainfall.weight, 1.0);
        assert_relative_eq!(rainfall.tolerance_margin, 0.3);

        let soil = registry.get(keys::SOIL_TEXTURE).unwrap();
        assert_relative_eq!(soil.weight, 2.0);
    }

    #[test]
    fn test_from_config_unknown_override() {
        let mut config = ScoringConfig::default();
        config.criteria.insert("canopy_height".to_string(), CriterionOverride::default());
        assert_eq!(
            CriterionRegistry::from_config(&config).unwrap_err(),
            ScoringError::UnknownCriterion("canopy_height".to_string())
        );
    }

    #[test]
    fn test_from_config_extra_criteria() {
        let mut config = ScoringConfig::default();
        config.extra_criteria.push(CriterionDefinition::range(
            "frost_days",
            "frost",
            CriterionFamily::Bioclimate,
            0.5,
        ));
        config.criteria.insert(
            "frost_days".to_string(),
            CriterionOverride { weight: Some(0.25), tolerance_margin: None },
        );

        let registry = CriterionRegistry::from_config(&config).unwrap();
        assert_eq!(registry.len(), 13);
        assert_relative_eq!(registry.get("frost_days").unwrap().weight, 0.25);
    }
}
