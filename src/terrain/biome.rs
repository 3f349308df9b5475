//! Height-band biome classification

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Biome types, ordered from the highest band down.
///
/// `Bone` is never produced by the classifier; it only exists as a batch for
/// themes that scatter skeletal figures over the dirt band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiomeKind {
    Stone,
    Dirt,
    Grass,
    Sand,
    SubmergedDirt,
    Bone,
}

impl BiomeKind {
    /// The five height bands, highest first.
    pub const BANDS: [BiomeKind; 5] = [
        BiomeKind::Stone,
        BiomeKind::Dirt,
        BiomeKind::Grass,
        BiomeKind::Sand,
        BiomeKind::SubmergedDirt,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BiomeKind::Stone => "stone",
            BiomeKind::Dirt => "dirt",
            BiomeKind::Grass => "grass",
            BiomeKind::Sand => "sand",
            BiomeKind::SubmergedDirt => "submerged_dirt",
            BiomeKind::Bone => "bone",
        }
    }
}

impl std::fmt::Display for BiomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Lower bound of each band as a fraction of the max height.
///
/// A height belongs to the first band (stone first) whose bound it strictly
/// exceeds. The submerged band is closed at its bound, so a height exactly at
/// `submerged` still yields a tile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeThresholds {
    pub stone: f32,
    pub dirt: f32,
    pub grass: f32,
    pub sand: f32,
    pub submerged: f32,
}

impl Default for BiomeThresholds {
    fn default() -> Self {
        Self {
            stone: 0.8,
            dirt: 0.7,
            grass: 0.5,
            sand: 0.3,
            submerged: 0.0,
        }
    }
}

impl BiomeThresholds {
    /// Bands paired with their fractional bound, in evaluation order.
    pub fn bands(&self) -> [(BiomeKind, f32); 5] {
        [
            (BiomeKind::Stone, self.stone),
            (BiomeKind::Dirt, self.dirt),
            (BiomeKind::Grass, self.grass),
            (BiomeKind::Sand, self.sand),
            (BiomeKind::SubmergedDirt, self.submerged),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        let bands = self.bands();
        for (kind, bound) in bands {
            if !bound.is_finite() {
                return Err(Error::config(format!("biomes.{} threshold must be finite", kind)));
            }
        }
        for pair in bands.windows(2) {
            let ((upper, hi), (lower, lo)) = (pair[0], pair[1]);
            if !(hi > lo) {
                return Err(Error::config(format!(
                    "biome thresholds must strictly descend: {} ({}) <= {} ({})",
                    upper, hi, lower, lo
                )));
            }
        }
        Ok(())
    }
}

/// Assigns a biome to a tile height using descending bands.
#[derive(Clone, Debug)]
pub struct BiomeClassifier {
    bands: [(BiomeKind, f32); 5],
}

impl BiomeClassifier {
    /// Build a classifier with absolute bounds for the given max height.
    pub fn new(thresholds: &BiomeThresholds, max_height: f32) -> Self {
        let mut bands = thresholds.bands();
        for (_, bound) in &mut bands {
            *bound *= max_height;
        }
        Self { bands }
    }

    /// Absolute lower bound of a band, `None` for `Bone`.
    pub fn bound(&self, biome: BiomeKind) -> Option<f32> {
        self.bands.iter().find(|(kind, _)| *kind == biome).map(|(_, b)| *b)
    }

    /// Biome for a height, or `None` below the lowest band (no tile).
    pub fn classify(&self, height: f32) -> Option<BiomeKind> {
        let (last, rest) = self.bands.split_last()?;
        rest.iter()
            .find(|(_, bound)| height > *bound)
            .map(|(kind, _)| *kind)
            .or_else(|| (height >= last.1).then_some(last.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> BiomeClassifier {
        BiomeClassifier::new(&BiomeThresholds::default(), 10.0)
    }

    #[test]
    fn test_bands() {
        let c = classifier();
        assert_eq!(c.classify(9.5), Some(BiomeKind::Stone));
        assert_eq!(c.classify(7.5), Some(BiomeKind::Dirt));
        assert_eq!(c.classify(6.0), Some(BiomeKind::Grass));
        assert_eq!(c.classify(4.0), Some(BiomeKind::Sand));
        assert_eq!(c.classify(1.0), Some(BiomeKind::SubmergedDirt));
    }

    #[test]
    fn test_boundaries_are_strict() {
        let c = classifier();
        assert_eq!(c.classify(8.0), Some(BiomeKind::Dirt));
        assert_eq!(c.classify(8.0001), Some(BiomeKind::Stone));
        assert_eq!(c.classify(7.0), Some(BiomeKind::Grass));
        assert_eq!(c.classify(5.0), Some(BiomeKind::Sand));
        assert_eq!(c.classify(3.0), Some(BiomeKind::SubmergedDirt));
    }

    #[test]
    fn test_zero_height_is_submerged() {
        let c = classifier();
        assert_eq!(c.classify(0.0), Some(BiomeKind::SubmergedDirt));
        assert_eq!(c.classify(-0.01), None);
        assert_eq!(c.classify(f32::NAN), None);
    }

    #[test]
    fn test_classify_total_over_range() {
        let c = classifier();
        let mut previous = BiomeKind::SubmergedDirt;
        // Walk upward; bands must appear contiguously in ascending order
        for i in 0..=10_000 {
            let h = i as f32 * 0.001;
            let biome = c.classify(h).expect("every height in [0, max] has a biome");
            assert!(biome <= previous, "band order broken at {}", h);
            previous = biome;
        }
        assert_eq!(previous, BiomeKind::Stone);
    }

    #[test]
    fn test_max_height_is_stone() {
        assert_eq!(classifier().classify(10.0), Some(BiomeKind::Stone));
    }

    #[test]
    fn test_custom_thresholds_scale_with_height() {
        let thresholds = BiomeThresholds { stone: 0.9, ..Default::default() };
        let c = BiomeClassifier::new(&thresholds, 20.0);
        assert_eq!(c.bound(BiomeKind::Stone), Some(18.0));
        assert_eq!(c.bound(BiomeKind::Bone), None);
        assert_eq!(c.classify(17.0), Some(BiomeKind::Dirt));
    }

    #[test]
    fn test_non_monotonic_rejected() {
        let bad = BiomeThresholds { grass: 0.75, ..Default::default() };
        assert!(bad.validate().is_err());

        let equal = BiomeThresholds { sand: 0.5, ..Default::default() };
        assert!(equal.validate().is_err());

        assert!(BiomeThresholds::default().validate().is_ok());
    }
}
