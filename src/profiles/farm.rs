//! Farm records and profiles
//!
//! `FarmRecord` mirrors the farms data dictionary; `FarmProfile` is the
//! key → value view the scorer consumes.

use super::texture::{normalize_texture_name, SoilTexture};
use super::{label_set, FarmValue};
use crate::criteria::keys;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// One farm as described by the farms data dictionary.
///
/// Every scoring field is optional: partial records score on whatever they
/// carry. `area_ha`, `latitude` and `longitude` are passthrough metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FarmRecord {
    pub farm_id: i64,

    #[serde(default)]
    pub rainfall_mm: Option<f64>,
    #[serde(default)]
    pub temperature_celsius: Option<f64>,
    #[serde(default)]
    pub elevation_m: Option<f64>,
    #[serde(default)]
    pub ph: Option<f64>,
    /// Terrain slope in degrees
    #[serde(default)]
    pub slope: Option<f64>,

    /// Texture class name, e.g. "clay loam"
    #[serde(default)]
    pub soil_texture: Option<String>,
    /// USDA texture id (1-12), used when no name is given
    #[serde(default)]
    pub soil_texture_id: Option<u8>,

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

    #[serde(default)]
    pub area_ha: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// A farm value outside the data dictionary's plausible range
#[derive(Debug, Clone, PartialEq)]
pub struct RangeViolation {
    pub field: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

/// Plausible ranges from the farms data dictionary
const FARM_FIELD_RANGES: [(&str, f64, f64); 8] = [
    ("rainfall_mm", 1000.0, 3000.0),
    ("temperature_celsius", 15.0, 30.0),
    ("elevation_m", 0.0, 2963.0),
    ("ph", 4.0, 8.5),
    ("slope", 0.0, 90.0),
    ("area_ha", 0.0, 100.0),
    ("latitude", -90.0, 90.0),
    ("longitude", -180.0, 180.0),
];

impl FarmRecord {
    fn numeric_field(&self, field: &str) -> Option<f64> {
        match field {
            "rainfall_mm" => self.rainfall_mm,
            "temperature_celsius" => self.temperature_celsius,
            "elevation_m" => self.elevation_m,
            "ph" => self.ph,
            "slope" => self.slope,
            "area_ha" => self.area_ha,
            "latitude" => self.latitude,
            "longitude" => self.longitude,
            _ => None,
        }
    }

    /// Values outside the data dictionary ranges.
    ///
    /// Advisory: input is expected to be validated upstream, and the scorer
    /// does not consult this.
    pub fn range_violations(&self) -> Vec<RangeViolation> {
        FARM_FIELD_RANGES
            .iter()
            .filter_map(|&(field, min, max)| {
                let value = self.numeric_field(field)?;
                if value < min || value > max || !value.is_finite() {
                    Some(RangeViolation { field, value, min, max })
                } else {
                    None
                }
            })
            .collect()
    }

    /// Canonical soil texture name, from `soil_texture` or else `soil_texture_id`
    pub fn resolved_soil_texture(&self) -> Option<String> {
        if let Some(name) = self.soil_texture.as_deref().and_then(normalize_texture_name) {
            return Some(name);
        }
        self.soil_texture_id
            .and_then(SoilTexture::from_id)
            .map(|texture| texture.name().to_string())
    }
}

/// Farm-side scoring inputs keyed by criterion key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FarmProfile {
    pub farm_id: i64,
    values: FxHashMap<String, FarmValue>,
}

impl FarmProfile {
    pub fn new(farm_id: i64) -> Self {
        Self {
            farm_id,
            values: FxHashMap::default(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FarmValue) {
        self.values.insert(key.into(), value);
    }

    /// Builder form of `insert`
    pub fn with(mut self, key: impl Into<String>, value: FarmValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FarmValue> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build the scoring view of a data-dictionary record
    pub fn from_record(record: &FarmRecord) -> Self {
        let mut profile = FarmProfile::new(record.farm_id);

        let numbers = [
            (keys::RAINFALL, record.rainfall_mm),
            (keys::TEMPERATURE, record.temperature_celsius),
            (keys::ELEVATION, record.elevation_m),
            (keys::SLOPE, record.slope),
            (keys::PH, record.ph),
        ];
        for (key, value) in numbers {
            if let Some(v) = value {
                profile.insert(key, FarmValue::Number(v));
            }
        }

        if let Some(texture) = record.resolved_soil_texture() {
            profile.insert(keys::SOIL_TEXTURE, FarmValue::Label(texture));
        }

        let flags = [
            (keys::COASTAL, record.coastal),
            (keys::RIPARIAN, record.riparian),
            (keys::NITROGEN_FIXING, record.nitrogen_fixing),
            (keys::SHADE_TOLERANT, record.shade_tolerant),
            (keys::BANK_STABILISING, record.bank_stabilising),
        ];
        for (key, value) in flags {
            if let Some(flag) = value {
                profile.insert(key, FarmValue::Flag(flag));
            }
        }

        if let Some(types) = record.agroforestry_types.as_ref().and_then(label_set) {
            profile.insert(keys::AGROFORESTRY_TYPES, FarmValue::Labels(types));
        }

        profile
    }
}

impl From<&FarmRecord> for FarmProfile {
    fn from(record: &FarmRecord) -> Self {
        FarmProfile::from_record(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> FarmRecord {
        FarmRecord {
            farm_id: 12,
            rainfall_mm: Some(1200.0),
            temperature_celsius: Some(24.0),
            ph: Some(6.2),
            soil_texture: Some("Loam".to_string()),
            coastal: Some(false),
            nitrogen_fixing: Some(true),
            agroforestry_types: Some(vec!["Boundary planting".to_string()]),
            area_ha: Some(3.5),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_record_maps_present_fields_only() {
        let profile = FarmProfile::from_record(&sample_record());

        assert_eq!(profile.farm_id, 12);
        assert_eq!(profile.get(keys::RAINFALL), Some(&FarmValue::Number(1200.0)));
        assert_eq!(profile.get(keys::SOIL_TEXTURE), Some(&FarmValue::Label("loam".to_string())));
        assert_eq!(profile.get(keys::NITROGEN_FIXING), Some(&FarmValue::Flag(true)));
        assert!(profile.get(keys::ELEVATION).is_none());
        assert!(profile.get(keys::RIPARIAN).is_none());
        assert!(profile.get("area_ha").is_none()); // passthrough, never scored
    }

    #[test]
    fn test_costal_spelling_accepted() {
        let record: FarmRecord =
            serde_json::from_str(r#"{"farm_id": 1, "costal": true}"#).unwrap();
        assert_eq!(record.coastal, Some(true));

        let record: FarmRecord =
            serde_json::from_str(r#"{"farm_id": 1, "coastal": false}"#).unwrap();
        assert_eq!(record.coastal, Some(false));
    }

    #[test]
    fn test_texture_id_fallback() {
        let record = FarmRecord {
            farm_id: 1,
            soil_texture_id: Some(8),
            ..Default::default()
        };
        assert_eq!(record.resolved_soil_texture(), Some("clay loam".to_string()));

        let record = FarmRecord {
            farm_id: 1,
            soil_texture: Some("Organic".to_string()),
            soil_texture_id: Some(99),
            ..Default::default()
        };
        assert_eq!(record.resolved_soil_texture(), None);
    }

    #[test]
    fn test_empty_agroforestry_types_absent() {
        let record = FarmRecord {
            farm_id: 1,
            agroforestry_types: Some(vec![]),
            ..Default::default()
        };
        let profile = FarmProfile::from_record(&record);
        assert!(profile.get(keys::AGROFORESTRY_TYPES).is_none());
    }

    #[test]
    fn test_range_violations() {
        let mut record = sample_record();
        assert!(record.range_violations().is_empty());

        record.rainfall_mm = Some(800.0);
        record.ph = Some(9.1);
        let violations = record.range_violations();
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].field, "rainfall_mm");
        assert_eq!(violations[1].field, "ph");
    }
}
