//! Decorations scattered over classified tiles.
//!
//! Stone and sand tiles sometimes carry a rock, dirt tiles sometimes carry
//! the theme's tall decoration (a conifer cluster or a skeletal figure).
//! Each decoration merges into exactly one batch, which need not be the
//! batch of the tile that spawned it.

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::{validate_non_negative, validate_positive, validate_segments, SizeRange};
use crate::core::{Error, Result};
use crate::mesh::primitives::{cone, cylinder, sphere};
use crate::mesh::MeshGeometry;
use crate::terrain::hex_grid::{to_world, Tile};
use crate::terrain::BiomeKind;

// Skeletal figure proportions, before scaling
const BONE_LENGTH: f32 = 0.2;
const HEAD_RADIUS: f32 = 0.15;
const BODY_RADIUS: f32 = 0.1;
const LEG_LENGTH: f32 = 0.6;
const LEG_RADIUS: f32 = 0.07;
const ARM_LENGTH: f32 = 0.4;
const ARM_RADIUS: f32 = 0.05;

/// Parameters controlling decoration density and size
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationParams {
    /// Chance of a rock on a stone or sand tile
    pub rock_probability: f64,
    /// Chance of the tall decoration on a dirt tile
    pub tall_probability: f64,
    pub rock_radius: SizeRange,
    /// Maximum horizontal offset of a rock from the tile centre, per axis
    pub rock_jitter: f32,
    pub rock_segments: u32,
    pub tree_height: SizeRange,
    /// Base radius of each stacked tier, bottom first
    pub tree_tier_radii: [f32; 3],
    /// Vertical offset of each tier as a multiple of the tree height
    pub tree_tier_offsets: [f32; 3],
    /// Extra lift so the lowest tier clears the tile surface
    pub tree_lift: f32,
    pub tree_segments: u32,
    pub skeleton_scale: f32,
    pub skeleton_segments: u32,
}

impl Default for DecorationParams {
    fn default() -> Self {
        Self {
            rock_probability: 0.2,
            tall_probability: 0.5,
            rock_radius: SizeRange::new(0.1, 0.4),
            rock_jitter: 0.4,
            rock_segments: 7,
            tree_height: SizeRange::new(1.25, 2.25),
            tree_tier_radii: [1.5, 1.15, 0.8],
            tree_tier_offsets: [0.0, 0.6, 1.25],
            tree_lift: 1.0,
            tree_segments: 3,
            skeleton_scale: 2.0,
            skeleton_segments: 7,
        }
    }
}

impl DecorationParams {
    pub fn validate(&self) -> Result<()> {
        for (name, p) in [
            ("decorations.rock_probability", self.rock_probability),
            ("decorations.tall_probability", self.tall_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::config(format!("{name} must be within [0, 1], got {p}")));
            }
        }
        self.rock_radius.validate("decorations.rock_radius")?;
        self.tree_height.validate("decorations.tree_height")?;
        validate_non_negative("decorations.rock_jitter", self.rock_jitter)?;
        validate_positive("decorations.skeleton_scale", self.skeleton_scale)?;
        for radius in self.tree_tier_radii {
            validate_positive("decorations.tree_tier_radii", radius)?;
        }
        if !self.tree_tier_offsets.iter().all(|o| o.is_finite()) || !self.tree_lift.is_finite() {
            return Err(Error::config("decorations tree offsets and lift must be finite"));
        }
        validate_segments("decorations.rock_segments", self.rock_segments)?;
        validate_segments("decorations.tree_segments", self.tree_segments)?;
        validate_segments("decorations.skeleton_segments", self.skeleton_segments)?;
        Ok(())
    }
}

/// Which decoration grows on the dirt band
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TallDecoration {
    TreeCluster,
    SkeletalFigure,
}

impl TallDecoration {
    pub fn kind(&self) -> DecorationKind {
        match self {
            TallDecoration::TreeCluster => DecorationKind::TreeCluster,
            TallDecoration::SkeletalFigure => DecorationKind::SkeletalFigure,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecorationKind {
    RockCluster,
    TreeCluster,
    SkeletalFigure,
}

impl DecorationKind {
    /// Batch the decoration's geometry merges into.
    pub fn batch(&self) -> BiomeKind {
        match self {
            DecorationKind::RockCluster => BiomeKind::Stone,
            DecorationKind::TreeCluster => BiomeKind::Grass,
            DecorationKind::SkeletalFigure => BiomeKind::Bone,
        }
    }
}

/// A decoration anchored to one tile. Built, merged, and dropped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Decoration {
    RockCluster {
        anchor: Vec2,
        height: f32,
        offset: Vec2,
        radius: f32,
    },
    TreeCluster {
        anchor: Vec2,
        height: f32,
        tree_height: f32,
    },
    SkeletalFigure {
        anchor: Vec2,
        height: f32,
        scale: f32,
    },
}

impl Decoration {
    pub fn kind(&self) -> DecorationKind {
        match self {
            Decoration::RockCluster { .. } => DecorationKind::RockCluster,
            Decoration::TreeCluster { .. } => DecorationKind::TreeCluster,
            Decoration::SkeletalFigure { .. } => DecorationKind::SkeletalFigure,
        }
    }

    /// Batch this decoration merges into, independent of the spawning tile.
    pub fn batch(&self) -> BiomeKind {
        self.kind().batch()
    }

    /// World-space anchor on the tile top (rocks include their jitter).
    pub fn anchor(&self) -> Vec3 {
        match *self {
            Decoration::RockCluster { anchor, height, offset, .. } => to_world(anchor + offset, height),
            Decoration::TreeCluster { anchor, height, .. }
            | Decoration::SkeletalFigure { anchor, height, .. } => to_world(anchor, height),
        }
    }

    /// Size driver: rock radius, tree tier height, or figure scale.
    pub fn scale(&self) -> f32 {
        match *self {
            Decoration::RockCluster { radius, .. } => radius,
            Decoration::TreeCluster { tree_height, .. } => tree_height,
            Decoration::SkeletalFigure { scale, .. } => scale,
        }
    }

    /// Build the decoration's world-space geometry.
    pub fn geometry(&self, params: &DecorationParams) -> MeshGeometry {
        match *self {
            Decoration::RockCluster { radius, .. } => {
                let seg = params.rock_segments;
                sphere(radius, seg, seg).translated(self.anchor())
            }
            Decoration::TreeCluster { anchor, height, tree_height } => MeshGeometry::merged(
                params
                    .tree_tier_radii
                    .iter()
                    .zip(params.tree_tier_offsets)
                    .map(|(&radius, k)| {
                        let y = height + tree_height * k + params.tree_lift;
                        cone(radius, tree_height, params.tree_segments)
                            .translated(to_world(anchor, y))
                    }),
            ),
            Decoration::SkeletalFigure { anchor, height, scale } => {
                skeleton(to_world(anchor, height), scale, params.skeleton_segments)
            }
        }
    }
}

/// Head, body, two legs, and two arms around a base point.
fn skeleton(base: Vec3, scale: f32, segments: u32) -> MeshGeometry {
    let bone = BONE_LENGTH * scale;
    let body_radius = BODY_RADIUS * scale;
    let leg = (LEG_RADIUS * scale, LEG_LENGTH * scale);
    let arm = (ARM_RADIUS * scale, ARM_LENGTH * scale);
    let limb = |(radius, length): (f32, f32), dx: f32, dy: f32| {
        cylinder(radius, radius, length, segments, false).translated(base + Vec3::new(dx, dy, 0.0))
    };

    MeshGeometry::merged([
        sphere(HEAD_RADIUS * scale, segments, segments).translated(base + Vec3::Y * bone * 3.0),
        limb((body_radius, bone), 0.0, bone * 2.0),
        limb(leg, -body_radius * 0.5, bone),
        limb(leg, body_radius * 0.5, bone),
        limb(arm, -body_radius * 1.5, bone * 2.0),
        limb(arm, body_radius * 1.5, bone * 2.0),
    ])
}

/// Record of a placed decoration, kept after its geometry is merged.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DecorationPlacement {
    pub kind: DecorationKind,
    pub anchor: Vec3,
    pub scale: f32,
    pub batch: BiomeKind,
}

impl From<&Decoration> for DecorationPlacement {
    fn from(decoration: &Decoration) -> Self {
        Self {
            kind: decoration.kind(),
            anchor: decoration.anchor(),
            scale: decoration.scale(),
            batch: decoration.batch(),
        }
    }
}

/// Decides, per tile, which decorations to emit.
#[derive(Clone, Copy, Debug)]
pub struct DecorationPlacer<'a> {
    params: &'a DecorationParams,
    tall: TallDecoration,
}

impl<'a> DecorationPlacer<'a> {
    pub fn new(params: &'a DecorationParams, tall: TallDecoration) -> Self {
        Self { params, tall }
    }

    /// Decorations for one tile. The presence roll is drawn first, then the
    /// shape parameters, all from the tile's own RNG.
    pub fn place<R: Rng + ?Sized>(&self, tile: &Tile, rng: &mut R) -> Vec<Decoration> {
        let decoration = match tile.biome {
            BiomeKind::Stone | BiomeKind::Sand => rng
                .random_bool(self.params.rock_probability)
                .then(|| self.rock(tile, rng)),
            BiomeKind::Dirt => rng
                .random_bool(self.params.tall_probability)
                .then(|| self.tall(tile, rng)),
            BiomeKind::Grass | BiomeKind::SubmergedDirt | BiomeKind::Bone => None,
        };
        decoration.into_iter().collect()
    }

    fn rock<R: Rng + ?Sized>(&self, tile: &Tile, rng: &mut R) -> Decoration {
        let jitter = self.params.rock_jitter;
        let dx = rng.random::<f32>() * jitter;
        let dz = rng.random::<f32>() * jitter;
        Decoration::RockCluster {
            anchor: tile.position,
            height: tile.height,
            offset: Vec2::new(dx, dz),
            radius: self.params.rock_radius.sample(rng),
        }
    }

    fn tall<R: Rng + ?Sized>(&self, tile: &Tile, rng: &mut R) -> Decoration {
        match self.tall {
            TallDecoration::TreeCluster => Decoration::TreeCluster {
                anchor: tile.position,
                height: tile.height,
                tree_height: self.params.tree_height.sample(rng),
            },
            TallDecoration::SkeletalFigure => Decoration::SkeletalFigure {
                anchor: tile.position,
                height: tile.height,
                scale: self.params.skeleton_scale,
            },
        }
    }
}
