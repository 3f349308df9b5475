//! Noise-driven terrain height per tile

use noise::{NoiseFn, Simplex};
use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Any 2D gradient-noise source returning values in roughly [-1, 1].
///
/// Implemented for every `noise` crate function, so callers can hand in a
/// `Simplex`, an `Fbm<Perlin>`, or a `Constant` for tests.
pub trait NoiseSampler: Send + Sync {
    fn sample(&self, x: f64, y: f64) -> f64;
}

impl<N> NoiseSampler for N
where
    N: NoiseFn<f64, 2> + Send + Sync,
{
    fn sample(&self, x: f64, y: f64) -> f64 {
        self.get([x, y])
    }
}

/// Parameters controlling height sampling
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightParams {
    pub max_height: f32,      // Vertical scale (tallest possible tile)
    pub frequency: f64,       // Tile index to noise space (smaller = smoother)
    pub exponent: f32,        // Shaping power; > 1 favours lowland
    pub fallback_height: f32, // Substituted when the noise source misbehaves
}

impl Default for HeightParams {
    fn default() -> Self {
        Self {
            max_height: 10.0,
            frequency: 0.1,
            exponent: 1.5,
            fallback_height: 0.0,
        }
    }
}

impl HeightParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.max_height > 0.0) || !self.max_height.is_finite() {
            return Err(Error::config(format!(
                "height.max_height must be positive, got {}",
                self.max_height
            )));
        }
        if !(self.frequency > 0.0) || !self.frequency.is_finite() {
            return Err(Error::config(format!(
                "height.frequency must be positive, got {}",
                self.frequency
            )));
        }
        if !(self.exponent > 0.0) || !self.exponent.is_finite() {
            return Err(Error::config(format!(
                "height.exponent must be positive, got {}",
                self.exponent
            )));
        }
        if !self.fallback_height.is_finite() {
            return Err(Error::config("height.fallback_height must be finite"));
        }
        Ok(())
    }
}

/// Maps tile indices to terrain heights in `[0, max_height]`.
pub struct HeightField {
    params: HeightParams,
    sampler: Box<dyn NoiseSampler>,
}

impl HeightField {
    /// Height field over seeded simplex noise.
    pub fn new(params: HeightParams, seed: u32) -> Self {
        Self::with_sampler(params, Simplex::new(seed))
    }

    /// Height field over a caller-supplied noise source.
    pub fn with_sampler<S: NoiseSampler + 'static>(params: HeightParams, sampler: S) -> Self {
        Self {
            params,
            sampler: Box::new(sampler),
        }
    }

    pub fn params(&self) -> &HeightParams {
        &self.params
    }

    /// Height at a tile, or `None` when the noise source returned NaN/inf.
    pub fn try_sample(&self, column: i32, row: i32) -> Option<f32> {
        let raw = self.sampler.sample(
            column as f64 * self.params.frequency,
            row as f64 * self.params.frequency,
        );
        raw.is_finite().then(|| self.shape(raw))
    }

    /// Height at a tile, substituting the fallback height on a bad sample.
    pub fn sample(&self, column: i32, row: i32) -> f32 {
        self.try_sample(column, row)
            .unwrap_or_else(|| self.fallback_for(column, row))
    }

    /// Fallback height for a rejected sample. Logs the anomaly.
    pub fn fallback_for(&self, column: i32, row: i32) -> f32 {
        log::warn!(
            "Non-finite noise at tile ({}, {}), using fallback height {}",
            column, row, self.params.fallback_height
        );
        self.params.fallback_height
    }

    /// Remap raw noise to a height: normalize to [0, 1], apply the shaping
    /// power, then scale.
    pub fn shape(&self, raw: f64) -> f32 {
        let normalized = ((raw.clamp(-1.0, 1.0) + 1.0) * 0.5) as f32;
        normalized.powf(self.params.exponent) * self.params.max_height
    }
}

impl std::fmt::Debug for HeightField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeightField")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
