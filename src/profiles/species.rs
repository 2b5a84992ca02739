//! Species records and profiles

use super::{label_set, SpeciesDescriptor};
use crate::criteria::keys;
use crate::error::SpeciesValidationError;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// One candidate species as described by the species data dictionary.
///
/// Ranges are stored as `<criterion>_min` / `<criterion>_max` pairs. A pair
/// with only one side present carries no usable tolerance and is dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub species_id: i64,
    pub species_name: String,
    #[serde(default)]
    pub species_common_name: String,

    #[serde(default)]
    pub rainfall_mm_min: Option<f64>,
    #[serde(default)]
    pub rainfall_mm_max: Option<f64>,
    #[serde(default)]
    pub temperature_celsius_min: Option<f64>,
    #[serde(default)]
    pub temperature_celsius_max: Option<f64>,
    #[serde(default)]
    pub elevation_m_min: Option<f64>,
    #[serde(default)]
    pub elevation_m_max: Option<f64>,
    #[serde(default)]
    pub slope_min: Option<f64>,
    #[serde(default)]
    pub slope_max: Option<f64>,
    #[serde(default)]
    pub ph_min: Option<f64>,
    #[serde(default)]
    pub ph_max: Option<f64>,

    #[serde(default)]
    pub preferred_soil_texture: Option<Vec<String>>,

    #[serde(default, alias = "costal")]
    pub coastal: Option<bool>,
    #[serde(default)]
    pub riparian: Option<bool>,
    #[serde(default)]
    pub nitrogen_fixing: Option<bool>,
    #[serde(default)]
    pub shade_tolerant: Option<bool>,
    #[serde(default)]
    pub bank_stabilising: Option<bool>,
    #[serde(default)]
    pub agroforestry_types: Option<Vec<String>>,
}

/// Species-side tolerances keyed by criterion key, plus display identity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeciesProfile {
    pub species_id: i64,
    pub species_name: String,
    /// Display only, never scored
    pub species_common_name: String,
    descriptors: FxHashMap<String, SpeciesDescriptor>,
}

fn range(min: Option<f64>, max: Option<f64>) -> Option<SpeciesDescriptor> {
    match (min, max) {
        (Some(min), Some(max)) => Some(SpeciesDescriptor::Range { min, max }),
        _ => None,
    }
}

impl SpeciesProfile {
    pub fn new(
        species_id: i64,
        species_name: impl Into<String>,
        species_common_name: impl Into<String>,
    ) -> Self {
        Self {
            species_id,
            species_name: species_name.into(),
            species_common_name: species_common_name.into(),
            descriptors: FxHashMap::default(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, descriptor: SpeciesDescriptor) {
        self.descriptors.insert(key.into(), descriptor);
    }

    /// Builder form of `insert`
    pub fn with(mut self, key: impl Into<String>, descriptor: SpeciesDescriptor) -> Self {
        self.insert(key, descriptor);
        self
    }

    pub fn get(&self, key: &str) -> Option<&SpeciesDescriptor> {
        self.descriptors.get(key)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Reject ranges that break the min <= max invariant.
    ///
    /// Checked in key order so the reported error is stable.
    pub fn validate(&self) -> Result<(), SpeciesValidationError> {
        let mut range_keys: Vec<&String> = self
            .descriptors
            .iter()
            .filter(|(_, d)| matches!(d, SpeciesDescriptor::Range { .. }))
            .map(|(key, _)| key)
            .collect();
        range_keys.sort();

        for key in range_keys {
            if let Some(SpeciesDescriptor::Range { min, max }) = self.descriptors.get(key) {
                if !min.is_finite() || !max.is_finite() {
                    return Err(SpeciesValidationError::NonFiniteRange {
                        species_id: self.species_id,
                        criterion: key.clone(),
                    });
                }
                if min > max {
                    return Err(SpeciesValidationError::InvertedRange {
                        species_id: self.species_id,
                        criterion: key.clone(),
                        min: *min,
                        max: *max,
                    });
                }
            }
        }

        Ok(())
    }

    /// Build the scoring view of a data-dictionary record
    pub fn from_record(record: &SpeciesRecord) -> Self {
        let mut profile = SpeciesProfile::new(
            record.species_id,
            record.species_name.clone(),
            record.species_common_name.clone(),
        );

        let ranges = [
            (keys::RAINFALL, record.rainfall_mm_min, record.rainfall_mm_max),
            (keys::TEMPERATURE, record.temperature_celsius_min, record.temperature_celsius_max),
            (keys::ELEVATION, record.elevation_m_min, record.elevation_m_max),
            (keys::SLOPE, record.slope_min, record.slope_max),
            (keys::PH, record.ph_min, record.ph_max),
        ];
        for (key, min, max) in ranges {
            if let Some(descriptor) = range(min, max) {
                profile.insert(key, descriptor);
            }
        }

        // Already one texture per entry; no comma-list truncation here
        if let Some(textures) = record.preferred_soil_texture.as_ref().and_then(label_set) {
            profile.insert(keys::SOIL_TEXTURE, SpeciesDescriptor::Labels(textures));
        }

        let capabilities = [
            (keys::COASTAL, record.coastal),
            (keys::RIPARIAN, record.riparian),
            (keys::NITROGEN_FIXING, record.nitrogen_fixing),
            (keys::SHADE_TOLERANT, record.shade_tolerant),
            (keys::BANK_STABILISING, record.bank_stabilising),
        ];
        for (key, value) in capabilities {
            if let Some(flag) = value {
                profile.insert(key, SpeciesDescriptor::Capability(flag));
            }
        }

        if let Some(types) = record.agroforestry_types.as_ref().and_then(label_set) {
            profile.insert(keys::AGROFORESTRY_TYPES, SpeciesDescriptor::Labels(types));
        }

        profile
    }
}

impl From<&SpeciesRecord> for SpeciesProfile {
    fn from(record: &SpeciesRecord) -> Self {
        SpeciesProfile::from_record(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_record_pairs_ranges() {
        let record = SpeciesRecord {
            species_id: 3,
            species_name: "Grevillea robusta".to_string(),
            species_common_name: "Silky oak".to_string(),
            rainfall_mm_min: Some(800.0),
            rainfall_mm_max: Some(1500.0),
            ph_min: Some(5.0), // no ph_max: dropped
            preferred_soil_texture: Some(vec!["Loam".to_string(), "Clay Loam".to_string()]),
            nitrogen_fixing: Some(false),
            ..Default::default()
        };

        let profile = SpeciesProfile::from_record(&record);
        assert_eq!(
            profile.get(keys::RAINFALL),
            Some(&SpeciesDescriptor::Range { min: 800.0, max: 1500.0 })
        );
        assert!(profile.get(keys::PH).is_none());
        match profile.get(keys::SOIL_TEXTURE) {
            Some(SpeciesDescriptor::Labels(set)) => {
                assert!(set.contains("loam"));
                assert!(set.contains("clay loam"));
            }
            other => panic!("unexpected soil descriptor: {:?}", other),
        }
        assert_eq!(
            profile.get(keys::NITROGEN_FIXING),
            Some(&SpeciesDescriptor::Capability(false))
        );
        assert_eq!(profile.species_common_name, "Silky oak");
    }

    #[test]
    fn test_soil_preferences_keep_whole_entries() {
        let record = SpeciesRecord {
            species_id: 12,
            species_name: "Cordia africana".to_string(),
            preferred_soil_texture: Some(vec!["Clay, Clay Loam".to_string(), " Silt Loam".to_string()]),
            ..Default::default()
        };

        match SpeciesProfile::from_record(&record).get(keys::SOIL_TEXTURE) {
            Some(SpeciesDescriptor::Labels(set)) => {
                assert!(set.contains("clay, clay loam"));
                assert!(set.contains("silt loam"));
                assert!(!set.contains("clay"));
            }
            other => panic!("unexpected soil descriptor: {:?}", other),
        }
    }

    #[test]
    fn test_validate_inverted_range() {
        let profile = SpeciesProfile::new(9, "Bad record", "")
            .with(keys::RAINFALL, SpeciesDescriptor::Range { min: 800.0, max: 1500.0 })
            .with(keys::PH, SpeciesDescriptor::Range { min: 7.5, max: 5.5 });

        assert_eq!(
            profile.validate(),
            Err(SpeciesValidationError::InvertedRange {
                species_id: 9,
                criterion: keys::PH.to_string(),
                min: 7.5,
                max: 5.5,
            })
        );
    }

    #[test]
    fn test_validate_non_finite_range() {
        let profile = SpeciesProfile::new(4, "NaN record", "")
            .with(keys::ELEVATION, SpeciesDescriptor::Range { min: f64::NAN, max: 100.0 });

        assert!(matches!(
            profile.validate(),
            Err(SpeciesValidationError::NonFiniteRange { species_id: 4, .. })
        ));
    }

    #[test]
    fn test_validate_equal_bounds_ok() {
        let profile = SpeciesProfile::new(1, "Narrow", "")
            .with(keys::PH, SpeciesDescriptor::Range { min: 6.0, max: 6.0 });
        assert!(profile.validate().is_ok());
    }
}
