//! USDA Soil Texture Classes
//!
//! Farms report soil texture either by class name or by its USDA texture id
//! (1-12). Both are resolved to a canonical lower-case name, which is the
//! form species `preferred_soil_texture` sets are compared in.

use serde::{Deserialize, Serialize};

/// The 12 USDA texture classes, ids in texture-triangle order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SoilTexture {
    Sand,
    LoamySand,
    SandyLoam,
    Loam,
    SiltLoam,
    Silt,
    SandyClayLoam,
    ClayLoam,
    SiltyClayLoam,
    SandyClay,
    SiltyClay,
    Clay,
}

/// All texture classes in id order (id = index + 1)
pub static USDA_TEXTURE_CLASSES: [SoilTexture; 12] = [
    SoilTexture::Sand,
    SoilTexture::LoamySand,
    SoilTexture::SandyLoam,
    SoilTexture::Loam,
    SoilTexture::SiltLoam,
    SoilTexture::Silt,
    SoilTexture::SandyClayLoam,
    SoilTexture::ClayLoam,
    SoilTexture::SiltyClayLoam,
    SoilTexture::SandyClay,
    SoilTexture::SiltyClay,
    SoilTexture::Clay,
];

impl SoilTexture {
    /// Canonical lower-case class name
    pub fn name(&self) -> &'static str {
        match self {
            SoilTexture::Sand => "sand",
            SoilTexture::LoamySand => "loamy sand",
            SoilTexture::SandyLoam => "sandy loam",
            SoilTexture::Loam => "loam",
            SoilTexture::SiltLoam => "silt loam",
            SoilTexture::Silt => "silt",
            SoilTexture::SandyClayLoam => "sandy clay loam",
            SoilTexture::ClayLoam => "clay loam",
            SoilTexture::SiltyClayLoam => "silty clay loam",
            SoilTexture::SandyClay => "sandy clay",
            SoilTexture::SiltyClay => "silty clay",
            SoilTexture::Clay => "clay",
        }
    }

    /// USDA texture id (1-12)
    pub fn id(&self) -> u8 {
        USDA_TEXTURE_CLASSES
            .iter()
            .position(|t| t == self)
            .map(|idx| idx as u8 + 1)
            .unwrap_or(0)
    }

    pub fn from_id(id: u8) -> Option<Self> {
        if id == 0 {
            return None;
        }
        USDA_TEXTURE_CLASSES.get(id as usize - 1).copied()
    }

    /// Look up a class by (already normalised) name
    pub fn from_name(name: &str) -> Option<Self> {
        USDA_TEXTURE_CLASSES.iter().copied().find(|t| t.name() == name)
    }
}

/// Normalise a reported texture name.
///
/// Trims and lower-cases; keeps only the first entry of a comma list
/// ("Clay, Clay Loam" -> "clay"); drops "organic" and "variable", which are
/// not texture classes. Names outside the USDA set are kept as given so
/// that species data using other vocabularies still compares exactly.
pub fn normalize_texture_name(raw: &str) -> Option<String> {
    let mut txt = raw.trim().to_lowercase();
    if txt.is_empty() {
        return None;
    }

    if let Some((first, _)) = txt.split_once(',') {
        txt = first.trim().to_string();
    }

    match txt.as_str() {
        "" | "organic" | "variable" => None,
        _ => Some(txt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_texture_name() {
        assert_eq!(normalize_texture_name("Clay, Clay Loam"), Some("clay".to_string()));
        assert_eq!(normalize_texture_name("  Sandy Loam  "), Some("sandy loam".to_string()));
        assert_eq!(normalize_texture_name("Organic"), None);
        assert_eq!(normalize_texture_name("Variable"), None);
        assert_eq!(normalize_texture_name(""), None);
    }

    #[test]
    fn test_texture_ids_round_trip() {
        for (idx, texture) in USDA_TEXTURE_CLASSES.iter().enumerate() {
            assert_eq!(texture.id() as usize, idx + 1);
            assert_eq!(SoilTexture::from_id(texture.id()), Some(*texture));
            assert_eq!(SoilTexture::from_name(texture.name()), Some(*texture));
        }
    }

    #[test]
    fn test_invalid_texture_ids() {
        assert_eq!(SoilTexture::from_id(0), None);
        assert_eq!(SoilTexture::from_id(13), None);
        assert_eq!(SoilTexture::from_id(4), Some(SoilTexture::Loam));
    }
}
