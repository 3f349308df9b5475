//! Cloud field: a handful of puff clusters floating above the basin.
//!
//! Clouds ignore the terrain entirely. Each one stays a separate mesh with its
//! own transform so the caller can drift or spin it per frame.

use std::f32::consts::TAU;

use glam::{Mat4, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::{validate_non_negative, validate_positive, validate_segments, SizeRange};
use super::theme::MaterialId;
use crate::core::{Error, Result};
use crate::mesh::primitives::sphere;
use crate::mesh::MeshGeometry;

/// Parameters controlling the cloud field
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudParams {
    pub enabled: bool,
    /// Exclusive upper bound on the cloud count
    pub max_count: u32,
    /// Power applied to the count draw; < 1 biases toward more clouds
    pub count_exponent: f64,
    /// Radius of each puff, laid out left to right
    pub puff_radii: [f32; 3],
    /// Distance between neighbouring puff centres
    pub puff_spacing: f32,
    /// Maximum upward jitter of each puff
    pub puff_jitter: f32,
    /// Clouds are placed within `[-span, span)` on X and Z
    pub horizontal_span: f32,
    pub altitude: SizeRange,
    pub segments: u32,
}

impl Default for CloudParams {
    fn default() -> Self {
        Self {
            enabled: true,
            max_count: 4,
            count_exponent: 0.45,
            puff_radii: [1.2, 1.5, 0.9],
            puff_spacing: 1.85,
            puff_jitter: 0.3,
            horizontal_span: 10.0,
            altitude: SizeRange::new(7.0, 14.0),
            segments: 7,
        }
    }
}

impl CloudParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.count_exponent > 0.0) || !self.count_exponent.is_finite() {
            return Err(Error::config(format!(
                "clouds.count_exponent must be positive, got {}",
                self.count_exponent
            )));
        }
        validate_non_negative("clouds.horizontal_span", self.horizontal_span)?;
        for radius in self.puff_radii {
            validate_positive("clouds.puff_radii", radius)?;
        }
        validate_non_negative("clouds.puff_spacing", self.puff_spacing)?;
        validate_non_negative("clouds.puff_jitter", self.puff_jitter)?;
        validate_segments("clouds.segments", self.segments)?;
        self.altitude.validate("clouds.altitude")
    }
}

/// Number of clouds for one uniform draw in `[0, 1)`.
pub fn cloud_count(draw: f64, exponent: f64, max_count: u32) -> usize {
    (draw.powf(exponent) * max_count as f64).floor() as usize
}

/// One cloud: geometry in local space plus its placement.
#[derive(Clone, Debug)]
pub struct CloudMesh {
    pub geometry: MeshGeometry,
    pub offset: Vec3,
    pub yaw: f32,
    pub material: MaterialId,
}

impl CloudMesh {
    /// Local to world: translate to `offset`, then spin about the world Y
    /// axis. The yaw therefore swings the cloud around the basin centre.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_rotation_y(self.yaw) * Mat4::from_translation(self.offset)
    }

    pub fn world_geometry(&self) -> MeshGeometry {
        let mut geo = self.geometry.clone();
        geo.transform(&self.transform());
        geo
    }
}

/// Scatters clouds from an explicit RNG stream.
#[derive(Clone, Debug)]
pub struct CloudFieldGenerator<'a> {
    params: &'a CloudParams,
}

impl<'a> CloudFieldGenerator<'a> {
    pub fn new(params: &'a CloudParams) -> Self {
        Self { params }
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, material: &MaterialId) -> Vec<CloudMesh> {
        if !self.params.enabled {
            return Vec::new();
        }
        let count = cloud_count(rng.random(), self.params.count_exponent, self.params.max_count);
        let clouds: Vec<CloudMesh> = (0..count).map(|_| self.cloud(rng, material)).collect();
        log::debug!("Generated {} clouds", clouds.len());
        clouds
    }

    fn cloud<R: Rng + ?Sized>(&self, rng: &mut R, material: &MaterialId) -> CloudMesh {
        let p = self.params;
        let mut geometry = MeshGeometry::new();
        for (i, &radius) in p.puff_radii.iter().enumerate() {
            let x = (i as f32 - 1.0) * p.puff_spacing;
            let y = rng.random::<f32>() * p.puff_jitter;
            geometry.append(&sphere(radius, p.segments, p.segments).translated(Vec3::new(x, y, 0.0)));
        }

        let span = p.horizontal_span;
        let x = rng.random::<f32>() * span * 2.0 - span;
        let y = p.altitude.sample(rng);
        let z = rng.random::<f32>() * span * 2.0 - span;
        let yaw = rng.random::<f32>() * TAU;

        CloudMesh {
            geometry,
            offset: Vec3::new(x, y, z),
            yaw,
            material: material.clone(),
        }
    }
}
