//! Static basin around the tiles: sea disc, basin wall, and floor.

use std::f32::consts::PI;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::config::{validate_non_negative, validate_positive, validate_segments};
use super::theme::{MaterialId, Theme};
use crate::core::{Error, Result};
use crate::mesh::primitives::cylinder;
use crate::mesh::MeshBuffer;
use crate::terrain::BiomeKind;

/// Sizes of the basin cylinders. Heights are fractions of the max height.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureParams {
    pub enabled: bool,
    pub sea_radius: f32,
    pub sea_height: f32,
    pub wall_radius: f32,
    pub wall_height: f32,
    pub floor_radius: f32,
    pub floor_height: f32,
    pub segments: u32,
    /// Yaw of the sea and wall, aligning their facets with the hex rows
    pub yaw: f32,
}

impl Default for FixtureParams {
    fn default() -> Self {
        Self {
            enabled: true,
            sea_radius: 17.0,
            sea_height: 0.2,
            wall_radius: 17.1,
            wall_height: 0.25,
            floor_radius: 18.5,
            floor_height: 0.1,
            segments: 50,
            yaw: -PI * 0.333 * 0.5,
        }
    }
}

impl FixtureParams {
    pub fn validate(&self) -> Result<()> {
        validate_positive("fixtures.sea_radius", self.sea_radius)?;
        validate_positive("fixtures.wall_radius", self.wall_radius)?;
        validate_positive("fixtures.floor_radius", self.floor_radius)?;
        validate_non_negative("fixtures.sea_height", self.sea_height)?;
        validate_non_negative("fixtures.wall_height", self.wall_height)?;
        validate_non_negative("fixtures.floor_height", self.floor_height)?;
        validate_segments("fixtures.segments", self.segments)?;
        if !self.yaw.is_finite() {
            return Err(Error::config(format!("fixtures.yaw must be finite, got {}", self.yaw)));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureKind {
    Sea,
    BasinWall,
    Floor,
}

/// One basin mesh in world space.
#[derive(Clone, Debug)]
pub struct Fixture {
    pub kind: FixtureKind,
    pub material: MaterialId,
    pub buffer: MeshBuffer,
}

/// Build the basin fixtures for a theme. Empty when disabled.
///
/// The sea fills from the basin floor up to the sand line; the wall is open
/// so the tiles stay visible from above.
pub fn build_fixtures(params: &FixtureParams, max_height: f32, theme: &Theme) -> Vec<Fixture> {
    if !params.enabled {
        return Vec::new();
    }

    let material = |biome: BiomeKind| {
        theme
            .material_for(biome)
            .cloned()
            .unwrap_or_else(|| MaterialId::new(biome.name()))
    };

    let sea_h = max_height * params.sea_height;
    let mut sea = cylinder(params.sea_radius, params.sea_radius, sea_h, params.segments, false);
    sea.rotate_y(params.yaw);
    sea.translate(Vec3::Y * sea_h * 0.5);

    let wall_h = max_height * params.wall_height;
    let mut wall = cylinder(params.wall_radius, params.wall_radius, wall_h, params.segments, true);
    wall.rotate_y(params.yaw);
    wall.translate(Vec3::Y * wall_h * 0.5);

    let floor_h = max_height * params.floor_height;
    let floor = cylinder(params.floor_radius, params.floor_radius, floor_h, params.segments, false)
        .translated(Vec3::NEG_Y * floor_h * 0.5);

    vec![
        Fixture {
            kind: FixtureKind::Sea,
            material: theme.sea_material.clone(),
            buffer: sea.into(),
        },
        Fixture {
            kind: FixtureKind::BasinWall,
            material: material(BiomeKind::Dirt),
            buffer: wall.into(),
        },
        Fixture {
            kind: FixtureKind::Floor,
            material: material(BiomeKind::SubmergedDirt),
            buffer: floor.into(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_layout() {
        let fixtures = build_fixtures(&FixtureParams::default(), 10.0, &Theme::forest());
        assert_eq!(fixtures.len(), 3);

        let sea = fixtures[0].buffer.bounds().unwrap();
        assert!((sea.min.y - 0.0).abs() < 1e-5);
        assert!((sea.max.y - 2.0).abs() < 1e-5);
        assert!(sea.max.x <= 17.0 + 1e-4);

        let wall = fixtures[1].buffer.bounds().unwrap();
        assert!((wall.max.y - 2.5).abs() < 1e-5);

        let floor = fixtures[2].buffer.bounds().unwrap();
        assert!((floor.min.y + 1.0).abs() < 1e-5);
        assert!((floor.max.y - 0.0).abs() < 1e-5);
    }

    #[test]
    fn test_fixture_materials() {
        let fixtures = build_fixtures(&FixtureParams::default(), 10.0, &Theme::inferno());
        let materials: Vec<&str> = fixtures.iter().map(|f| f.material.as_str()).collect();
        assert_eq!(materials, ["water", "dirt", "dirt2"]);
    }

    #[test]
    fn test_wall_is_open() {
        let fixtures = build_fixtures(&FixtureParams::default(), 10.0, &Theme::forest());
        let (sea, wall) = (&fixtures[0].buffer, &fixtures[1].buffer);
        // Same side wall, but the sea also carries two 50-segment caps
        assert_eq!(sea.triangle_count(), wall.triangle_count() + 100);
    }

    #[test]
    fn test_params_validation() {
        assert!(FixtureParams::default().validate().is_ok());
        let params = FixtureParams { sea_radius: -17.0, ..Default::default() };
        assert!(params.validate().is_err());
        let params = FixtureParams { wall_height: f32::INFINITY, ..Default::default() };
        assert!(params.validate().is_err());
        let params = FixtureParams { segments: 1 << 31, ..Default::default() };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_disabled() {
        let params = FixtureParams { enabled: false, ..Default::default() };
        assert!(build_fixtures(&params, 10.0, &Theme::forest()).is_empty());
    }
}
