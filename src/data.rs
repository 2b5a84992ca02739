//! Species Catalog Loading
//!
//! Loads candidate species from a CSV laid out like the species data
//! dictionary (one column per field, `_min` / `_max` column pairs for
//! ranges, pipe-separated lists such as `loam|clay loam`) or from a JSON
//! array of `SpeciesRecord`s. Missing columns and null cells become absent
//! values, which the scorer excludes per criterion.

use crate::profiles::{SpeciesProfile, SpeciesRecord};
use anyhow::{Context, Result};
use polars::prelude::*;
use rustc_hash::FxHashMap;
use std::fs;
use std::path::Path;

/// In-memory species catalog with O(1) id lookup
#[derive(Debug, Clone, Default)]
pub struct SpeciesCatalog {
    species: Vec<SpeciesProfile>,
    index: FxHashMap<i64, usize>,
}

impl SpeciesCatalog {
    /// Build from profiles; the first profile wins for a repeated id
    pub fn from_profiles(profiles: Vec<SpeciesProfile>) -> Self {
        let mut index = FxHashMap::default();
        for (idx, profile) in profiles.iter().enumerate() {
            if index.contains_key(&profile.species_id) {
                tracing::warn!("Duplicate species id {} in catalog", profile.species_id);
                continue;
            }
            index.insert(profile.species_id, idx);
        }

        Self {
            species: profiles,
            index,
        }
    }

    pub fn from_records(records: &[SpeciesRecord]) -> Self {
        Self::from_profiles(records.iter().map(SpeciesProfile::from_record).collect())
    }

    /// Load a JSON array of species records
    pub fn from_json(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read species file: {:?}", path))?;

        let records: Vec<SpeciesRecord> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse species JSON: {:?}", path))?;

        Ok(Self::from_records(&records))
    }

    /// Load a species CSV
    pub fn from_csv(path: &Path) -> Result<Self> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .with_context(|| format!("Failed to create CSV reader: {:?}", path))?
            .finish()
            .with_context(|| format!("Failed to load species CSV: {:?}", path))?;

        let catalog = Self::from_frame(&df)?;
        tracing::info!("Loaded {} species from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    /// Convert a species DataFrame.
    ///
    /// `species_id` and `species_name` are required columns; rows with a
    /// null id are skipped.
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let height = df.height();

        let ids = required_i64_column(df, "species_id")?;
        let names = required_str_column(df, "species_name")?;
        let common_names = str_column(df, "species_common_name")?;

        let rainfall_min = f64_column(df, "rainfall_mm_min")?;
        let rainfall_max = f64_column(df, "rainfall_mm_max")?;
        let temperature_min = f64_column(df, "temperature_celsius_min")?;
        let temperature_max = f64_column(df, "temperature_celsius_max")?;
        let elevation_min = f64_column(df, "elevation_m_min")?;
        let elevation_max = f64_column(df, "elevation_m_max")?;
        let slope_min = f64_column(df, "slope_min")?;
        let slope_max = f64_column(df, "slope_max")?;
        let ph_min = f64_column(df, "ph_min")?;
        let ph_max = f64_column(df, "ph_max")?;

        let soil_textures = str_column(df, "preferred_soil_texture")?;
        let agroforestry = str_column(df, "agroforestry_types")?;

        // Both spellings appear in the data dictionaries
        let coastal = if df.column("coastal").is_ok() {
            bool_column(df, "coastal")?
        } else {
            bool_column(df, "costal")?
        };
        let riparian = bool_column(df, "riparian")?;
        let nitrogen_fixing = bool_column(df, "nitrogen_fixing")?;
        let shade_tolerant = bool_column(df, "shade_tolerant")?;
        let bank_stabilising = bool_column(df, "bank_stabilising")?;

        let mut records = Vec::with_capacity(height);
        for idx in 0..height {
            let Some(species_id) = ids[idx] else {
                tracing::warn!("Skipping species row {} without species_id", idx);
                continue;
            };

            records.push(SpeciesRecord {
                species_id,
                species_name: names[idx].clone().unwrap_or_default(),
                species_common_name: common_names[idx].clone().unwrap_or_default(),
                rainfall_mm_min: rainfall_min[idx],
                rainfall_mm_max: rainfall_max[idx],
                temperature_celsius_min: temperature_min[idx],
                temperature_celsius_max: temperature_max[idx],
                elevation_m_min: elevation_min[idx],
                elevation_m_max: elevation_max[idx],
                slope_min: slope_min[idx],
                slope_max: slope_max[idx],
                ph_min: ph_min[idx],
                ph_max: ph_max[idx],
                preferred_soil_texture: soil_textures[idx].as_deref().map(split_list),
                coastal: coastal[idx],
                riparian: riparian[idx],
                nitrogen_fixing: nitrogen_fixing[idx],
                shade_tolerant: shade_tolerant[idx],
                bank_stabilising: bank_stabilising[idx],
                agroforestry_types: agroforestry[idx].as_deref().map(split_list),
            });
        }

        Ok(Self::from_records(&records))
    }

    pub fn get(&self, species_id: i64) -> Option<&SpeciesProfile> {
        self.index.get(&species_id).map(|&idx| &self.species[idx])
    }

    /// Profiles for the given ids, in the order given; unknown ids skipped
    pub fn select(&self, species_ids: &[i64]) -> Vec<SpeciesProfile> {
        species_ids
            .iter()
            .filter_map(|id| {
                let found = self.get(*id);
                if found.is_none() {
                    tracing::debug!("Species {} not in catalog", id);
                }
                found.cloned()
            })
            .collect()
    }

    pub fn profiles(&self) -> &[SpeciesProfile] {
        &self.species
    }

    /// Take the profiles, in load order
    pub fn into_profiles(self) -> Vec<SpeciesProfile> {
        self.species
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}

/// Split a pipe-separated list cell
fn split_list(cell: &str) -> Vec<String> {
    cell.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

fn f64_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let Ok(col) = df.column(name) else {
        return Ok(vec![None; df.height()]);
    };

    let cast = col
        .cast(&DataType::Float64)
        .with_context(|| format!("Column '{}' is not numeric", name))?;
    let values = cast
        .f64()
        .with_context(|| format!("Column '{}' is not numeric", name))?;

    Ok(values.into_iter().collect())
}

fn str_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let Ok(col) = df.column(name) else {
        return Ok(vec![None; df.height()]);
    };

    let cast = col
        .cast(&DataType::String)
        .with_context(|| format!("Column '{}' is not string type", name))?;
    let values = cast
        .str()
        .with_context(|| format!("Column '{}' is not string type", name))?;

    Ok(values.into_iter().map(|v| v.map(|s| s.to_string())).collect())
}

fn bool_column(df: &DataFrame, name: &str) -> Result<Vec<Option<bool>>> {
    let Ok(col) = df.column(name) else {
        return Ok(vec![None; df.height()]);
    };

    match col.dtype() {
        DataType::Boolean => {
            let values = col
                .bool()
                .with_context(|| format!("Column '{}' is not boolean", name))?;
            Ok(values.into_iter().collect())
        }
        _ => Ok(str_column(df, name)?
            .into_iter()
            .map(|v| v.as_deref().and_then(parse_flag))
            .collect()),
    }
}

fn required_i64_column(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let col = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?;

    let cast = col
        .cast(&DataType::Int64)
        .with_context(|| format!("Column '{}' is not integer", name))?;
    let values = cast
        .i64()
        .with_context(|| format!("Column '{}' is not integer", name))?;

    Ok(values.into_iter().collect())
}

fn required_str_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    df.column(name)
        .with_context(|| format!("Column '{}' not found", name))?;
    str_column(df, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::keys;
    use crate::profiles::SpeciesDescriptor;

    fn sample_frame() -> DataFrame {
        df! {
            "species_id" => &[3i64, 5, 7],
            "species_name" => &["Grevillea robusta", "Markhamia lutea", "Croton megalocarpus"],
            "species_common_name" => &[Some("Silky oak"), None, Some("Croton")],
            "rainfall_mm_min" => &[Some(800.0), Some(1000.0), None],
            "rainfall_mm_max" => &[Some(1500.0), Some(2000.0), Some(1800.0)],
            "preferred_soil_texture" => &[Some("loam|clay loam"), None, Some("sandy loam")],
            "nitrogen_fixing" => &[Some(false), Some(true), None],
            "costal" => &[Some("yes"), Some("no"), None]
        }
        .unwrap()
    }

    #[test]
    fn test_from_frame() {
        let catalog = SpeciesCatalog::from_frame(&sample_frame()).unwrap();
        assert_eq!(catalog.len(), 3);

        let grevillea = catalog.get(3).unwrap();
        assert_eq!(grevillea.species_common_name, "Silky oak");
        assert_eq!(
            grevillea.get(keys::RAINFALL),
            Some(&SpeciesDescriptor::Range { min: 800.0, max: 1500.0 })
        );
        match grevillea.get(keys::SOIL_TEXTURE) {
            Some(SpeciesDescriptor::Labels(set)) => assert_eq!(set.len(), 2),
            other => panic!("unexpected soil descriptor: {:?}", other),
        }
        assert_eq!(grevillea.get(keys::COASTAL), Some(&SpeciesDescriptor::Capability(true)));

        // Half a range is no range
        let croton = catalog.get(7).unwrap();
        assert!(croton.get(keys::RAINFALL).is_none());
        assert!(croton.get(keys::NITROGEN_FIXING).is_none());

        // Columns absent from the frame
        assert!(croton.get(keys::ELEVATION).is_none());
    }

    #[test]
    fn test_missing_required_column() {
        let df = df! { "species_name" => &["Nameless"] }.unwrap();
        let err = SpeciesCatalog::from_frame(&df).unwrap_err();
        assert!(err.to_string().contains("species_id"));
    }

    #[test]
    fn test_select_keeps_requested_order() {
        let catalog = SpeciesCatalog::from_frame(&sample_frame()).unwrap();
        let selected = catalog.select(&[7, 99, 3]);
        let ids: Vec<i64> = selected.iter().map(|s| s.species_id).collect();
        assert_eq!(ids, vec![7, 3]);
    }

    #[test]
    fn test_into_profiles_keeps_load_order() {
        let catalog = SpeciesCatalog::from_frame(&sample_frame()).unwrap();
        let profiles = catalog.into_profiles();
        let ids: Vec<i64> = profiles.iter().map(|s| s.species_id).collect();
        assert_eq!(ids, vec![3, 5, 7]);
    }

    #[test]
    fn test_split_list_and_flags() {
        assert_eq!(split_list("loam| clay loam ||"), vec!["loam", "clay loam"]);
        assert_eq!(parse_flag("Yes"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_duplicate_ids_first_wins() {
        let first = SpeciesProfile::new(1, "First", "");
        let second = SpeciesProfile::new(1, "Second", "");
        let catalog = SpeciesCatalog::from_profiles(vec![first, second]);
        assert_eq!(catalog.get(1).unwrap().species_name, "First");
    }
}
