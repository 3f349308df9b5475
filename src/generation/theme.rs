//! Scene themes: which material each batch uses, which tall decoration grows
//! on the dirt band, and the colour palette handed to the renderer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::decoration::TallDecoration;
use crate::core::{Error, Result};
use crate::terrain::BiomeKind;

/// Renderer-side material identifier (a texture or material name)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(pub String);

impl MaterialId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MaterialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MaterialId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// sRGB colours the renderer applies around the generated geometry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub background: [u8; 3],
    pub sea: [u8; 3],
    pub cloud: [u8; 3],
}

/// Theme descriptor. The generation pass is identical for every theme; only
/// this data changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub materials: BTreeMap<BiomeKind, MaterialId>,
    pub sea_material: MaterialId,
    pub cloud_material: MaterialId,
    pub tall_decoration: TallDecoration,
    pub palette: Palette,
}

impl Theme {
    /// Temperate forest: conifer clusters on the dirt band.
    pub fn forest() -> Self {
        Self {
            name: "forest".into(),
            materials: materials(&[
                (BiomeKind::Stone, "stone"),
                (BiomeKind::Dirt, "dirt"),
                (BiomeKind::Grass, "grass"),
                (BiomeKind::Sand, "sand"),
                (BiomeKind::SubmergedDirt, "dirt2"),
            ]),
            sea_material: "water".into(),
            cloud_material: "cloud".into(),
            tall_decoration: TallDecoration::TreeCluster,
            palette: Palette {
                background: [0xFF, 0xCB, 0x8E],
                sea: [0x55, 0xAA, 0xFF],
                cloud: [0xFF, 0xFF, 0xFF],
            },
        }
    }

    /// Arctic: snow replaces grass and sand.
    pub fn winter() -> Self {
        Self {
            name: "winter".into(),
            materials: materials(&[
                (BiomeKind::Stone, "stone"),
                (BiomeKind::Dirt, "dirt"),
                (BiomeKind::Grass, "snow"),
                (BiomeKind::Sand, "more_snow"),
                (BiomeKind::SubmergedDirt, "dirt2"),
            ]),
            ..Self::forest()
        }
    }

    /// Infernal: soul sand, lava sea, dark clouds, skeletal figures.
    pub fn inferno() -> Self {
        Self {
            name: "inferno".into(),
            materials: materials(&[
                (BiomeKind::Stone, "stone"),
                (BiomeKind::Dirt, "dirt"),
                (BiomeKind::Grass, "soul_sand"),
                (BiomeKind::Sand, "soul_sand"),
                (BiomeKind::SubmergedDirt, "dirt2"),
                (BiomeKind::Bone, "bone"),
            ]),
            sea_material: "water".into(),
            cloud_material: "cloud".into(),
            tall_decoration: TallDecoration::SkeletalFigure,
            palette: Palette {
                background: [0x14, 0x08, 0x03],
                sea: [0xFF, 0x66, 0x00],
                cloud: [0x0F, 0x0E, 0x0D],
            },
        }
    }

    /// Look up a built-in theme by name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "forest" => Some(Self::forest()),
            "winter" => Some(Self::winter()),
            "inferno" => Some(Self::inferno()),
            _ => None,
        }
    }

    /// Every batch this theme can fill: the five height bands plus the batch
    /// its tall decoration merges into.
    pub fn batch_keys(&self) -> Vec<BiomeKind> {
        let mut keys = BiomeKind::BANDS.to_vec();
        let extra = self.tall_decoration.kind().batch();
        if !keys.contains(&extra) {
            keys.push(extra);
        }
        keys
    }

    pub fn material_for(&self, biome: BiomeKind) -> Option<&MaterialId> {
        self.materials.get(&biome)
    }

    /// Every batch key must have a material.
    pub fn validate(&self) -> Result<()> {
        for key in self.batch_keys() {
            if self.material_for(key).is_none() {
                return Err(Error::config(format!(
                    "theme '{}' has no material for the {} batch",
                    self.name, key
                )));
            }
        }
        Ok(())
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::forest()
    }
}

fn materials(pairs: &[(BiomeKind, &str)]) -> BTreeMap<BiomeKind, MaterialId> {
    pairs
        .iter()
        .map(|&(biome, name)| (biome, MaterialId::new(name)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_themes_valid() {
        for name in ["forest", "winter", "inferno"] {
            let theme = Theme::by_name(name).unwrap();
            assert_eq!(theme.name, name);
            assert!(theme.validate().is_ok(), "{} should validate", name);
        }
        assert!(Theme::by_name("desert").is_none());
    }

    #[test]
    fn test_batch_keys() {
        assert_eq!(Theme::forest().batch_keys(), BiomeKind::BANDS.to_vec());

        let inferno = Theme::inferno().batch_keys();
        assert_eq!(inferno.len(), 6);
        assert!(inferno.contains(&BiomeKind::Bone));
    }

    #[test]
    fn test_winter_materials() {
        let theme = Theme::winter();
        assert_eq!(theme.material_for(BiomeKind::Grass).unwrap().as_str(), "snow");
        assert_eq!(theme.material_for(BiomeKind::Sand).unwrap().as_str(), "more_snow");
        assert_eq!(theme.tall_decoration, TallDecoration::TreeCluster);
        assert_eq!(theme.palette, Theme::forest().palette);
    }

    #[test]
    fn test_missing_material_rejected() {
        let mut theme = Theme::inferno();
        theme.materials.remove(&BiomeKind::Bone);
        assert!(theme.validate().is_err());
    }

    #[test]
    fn test_theme_json_round_trip() {
        let theme = Theme::inferno();
        let json = serde_json::to_string(&theme).unwrap();
        assert!(json.contains("\"submerged_dirt\":\"dirt2\""));
        let back: Theme = serde_json::from_str(&json).unwrap();
        assert_eq!(back, theme);
    }
}
