//! Generation configuration: every tunable of a pass in one serde document.

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::clouds::CloudParams;
use super::decoration::DecorationParams;
use super::fixtures::FixtureParams;
use crate::core::{Error, Result};
use crate::mesh::primitives::{MAX_SEGMENTS, MIN_SEGMENTS};
use crate::terrain::{BiomeThresholds, GridParams, HeightParams};

/// Half-open range `[min, max)` sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: f32,
    pub max: f32,
}

impl SizeRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// One uniform draw, always below `max`. An empty or unbounded range
    /// yields `min`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let width = self.max - self.min;
        if !(width > 0.0) || !width.is_finite() {
            return self.min;
        }
        let value = rng.random_range(self.min..self.max);
        // Float rounding can still land on the upper bound
        if value < self.max { value } else { next_below(self.max) }
    }

    pub fn validate(&self, field: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(Error::config(format!(
                "{field} must be a finite range with min <= max, got [{}, {})",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Largest f32 strictly below `x` (finite `x`).
fn next_below(x: f32) -> f32 {
    if x > 0.0 {
        f32::from_bits(x.to_bits() - 1)
    } else if x == 0.0 {
        -f32::from_bits(1)
    } else {
        f32::from_bits(x.to_bits() + 1)
    }
}

/// Segment counts must stay within what the primitive builders accept.
pub(crate) fn validate_segments(field: &str, segments: u32) -> Result<()> {
    if !(MIN_SEGMENTS..=MAX_SEGMENTS).contains(&segments) {
        return Err(Error::config(format!(
            "{field} must be within [{MIN_SEGMENTS}, {MAX_SEGMENTS}], got {segments}"
        )));
    }
    Ok(())
}

/// Reject non-finite or negative values.
pub(crate) fn validate_non_negative(field: &str, value: f32) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::config(format!("{field} must be finite and non-negative, got {value}")));
    }
    Ok(())
}

/// Reject non-finite, zero, or negative values.
pub(crate) fn validate_positive(field: &str, value: f32) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::config(format!("{field} must be finite and positive, got {value}")));
    }
    Ok(())
}

/// Configuration for one generation pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Seed of the height noise.
    pub noise_seed: u32,
    /// Seed of decoration and cloud placement.
    pub rng_seed: u64,
    pub grid: GridParams,
    pub height: HeightParams,
    pub biomes: BiomeThresholds,
    pub decorations: DecorationParams,
    pub clouds: CloudParams,
    pub fixtures: FixtureParams,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            noise_seed: 12345,
            rng_seed: 12345,
            grid: GridParams::default(),
            height: HeightParams::default(),
            biomes: BiomeThresholds::default(),
            decorations: DecorationParams::default(),
            clouds: CloudParams::default(),
            fixtures: FixtureParams::default(),
        }
    }
}

impl GenerationConfig {
    /// Default configuration with both seeds set.
    pub fn with_seeds(noise_seed: u32, rng_seed: u64) -> Self {
        Self {
            noise_seed,
            rng_seed,
            ..Default::default()
        }
    }

    /// Reject configurations that cannot produce a coherent world.
    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        self.height.validate()?;
        self.biomes.validate()?;
        self.decorations.validate()?;
        self.clouds.validate()?;
        self.fixtures.validate()?;
        Ok(())
    }

    /// Parse a (possibly partial) JSON document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded generation config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_valid() {
        let config = GenerationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid.play_radius, 16.0);
        assert_eq!(config.height.max_height, 10.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = GenerationConfig::from_json_str(
            r#"{ "rng_seed": 99, "height": { "max_height": 20.0 }, "grid": { "play_radius": 8.0 } }"#,
        )
        .unwrap();
        assert_eq!(config.rng_seed, 99);
        assert_eq!(config.noise_seed, 12345);
        assert_eq!(config.height.max_height, 20.0);
        assert_eq!(config.height.exponent, 1.5);
        assert_eq!(config.grid.play_radius, 8.0);
        assert_eq!(config.grid.min_index, -20);
    }

    #[test]
    fn test_invalid_json_values_rejected() {
        let err = GenerationConfig::from_json_str(r#"{ "height": { "max_height": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = GenerationConfig::from_json_str(r#"{ "biomes": { "dirt": 0.9 } }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = GenerationConfig::from_json_str(r#"{ "grid": { "play_radius": -1.0 } }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = GenerationConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let config = GenerationConfig::with_seeds(7, 8);
        write!(file, "{}", serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = GenerationConfig::from_json_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GenerationConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_size_range() {
        use crate::generation::seed::tile_rng;
        let range = SizeRange::new(1.25, 2.25);
        let mut rng = tile_rng(1, 0, 0);
        for _ in 0..1000 {
            let v = range.sample(&mut rng);
            assert!((1.25..2.25).contains(&v));
        }
        assert!(SizeRange::new(2.0, 1.0).validate("x").is_err());
        assert!(SizeRange::new(f32::NAN, 1.0).validate("x").is_err());
        assert!(SizeRange::new(1.0, 1.0).validate("x").is_ok());
    }

    /// Every draw returns the largest possible value.
    struct SaturatedRng;

    impl rand::RngCore for SaturatedRng {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }

        fn next_u64(&mut self) -> u64 {
            u64::MAX
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0xFF);
        }
    }

    #[test]
    fn test_size_range_excludes_upper_bound() {
        for range in [
            SizeRange::new(1.25, 2.25),
            SizeRange::new(0.1, 0.4),
            SizeRange::new(7.0, 14.0),
            SizeRange::new(-10.0, 10.0),
            SizeRange::new(-3.0, -1.0),
            SizeRange::new(-1.0, 0.0),
        ] {
            let v = range.sample(&mut SaturatedRng);
            assert!(v >= range.min && v < range.max, "{:?} sampled {}", range, v);
        }
    }

    #[test]
    fn test_size_range_empty_yields_min() {
        let range = SizeRange::new(2.0, 2.0);
        assert_eq!(range.sample(&mut SaturatedRng), 2.0);
        let range = SizeRange::new(3.0, f32::INFINITY);
        assert_eq!(range.sample(&mut SaturatedRng), 3.0);
    }

    #[test]
    fn test_next_below() {
        assert!(next_below(2.25) < 2.25);
        assert!(next_below(0.0) < 0.0);
        assert!(next_below(-1.0) < -1.0);
        assert!(2.25 - next_below(2.25) < 1e-6);
    }

    #[test]
    fn test_segment_bounds() {
        assert!(validate_segments("s", 7).is_ok());
        assert!(validate_segments("s", 2).is_err());
        assert!(validate_segments("s", u32::MAX).is_err());
    }

    #[test]
    fn test_infinite_values_rejected() {
        let mut config = GenerationConfig::default();
        config.decorations.rock_jitter = f32::INFINITY;
        assert!(config.validate().is_err());

        let mut config = GenerationConfig::default();
        config.decorations.skeleton_scale = f32::INFINITY;
        assert!(config.validate().is_err());

        let mut config = GenerationConfig::default();
        config.clouds.horizontal_span = f32::INFINITY;
        assert!(config.validate().is_err());

        let mut config = GenerationConfig::default();
        config.fixtures.floor_radius = -1.0;
        assert!(config.validate().is_err());

        let mut config = GenerationConfig::default();
        config.decorations.rock_segments = 1 << 30;
        assert!(config.validate().is_err());
    }
}
