//! World generation pipeline: hex tiles, decorations, clouds, and basin.
//!
//! The pipeline orchestrates:
//! 1. Tile enumeration and height sampling (HexGrid, HeightField)
//! 2. Biome classification (BiomeClassifier)
//! 3. Decoration placement from a per-tile RNG (DecorationPlacer)
//! 4. Single-writer merge into per-biome batches (GeometryBatcher)
//! 5. Cloud scattering and basin fixtures, independent of the tiles

pub mod config;
pub mod seed;
pub mod theme;
pub mod decoration;
pub mod clouds;
pub mod fixtures;

pub use config::{GenerationConfig, SizeRange};
pub use theme::{MaterialId, Palette, Theme};
pub use decoration::{
    Decoration, DecorationKind, DecorationParams, DecorationPlacement, DecorationPlacer,
    TallDecoration,
};
pub use clouds::{cloud_count, CloudFieldGenerator, CloudMesh, CloudParams};
pub use fixtures::{build_fixtures, Fixture, FixtureKind, FixtureParams};

use std::collections::BTreeMap;

use glam::Vec3;
use rayon::prelude::*;
use serde::Serialize;

use crate::core::Result;
use crate::math::Aabb;
use crate::mesh::primitives::cylinder;
use crate::mesh::{GeometryBatcher, MeshBuffer, MeshGeometry};
use crate::terrain::{BiomeClassifier, BiomeKind, HeightField, HexGrid, NoiseSampler, Tile, TileCoord};
use seed::{stream_rng, tile_rng, Stream};

/// Radius of one hex column
const TILE_RADIUS: f32 = 1.0;
const TILE_SIDES: u32 = 6;

/// One finished batch: every tile column and decoration of a biome.
#[derive(Clone, Debug)]
pub struct TerrainBatch {
    pub biome: BiomeKind,
    pub material: MaterialId,
    pub buffer: MeshBuffer,
}

/// Counters collected during a pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GenerationStats {
    pub tiles: usize,
    pub tiles_per_biome: BTreeMap<BiomeKind, usize>,
    pub decorations_per_kind: BTreeMap<DecorationKind, usize>,
    pub clouds: usize,
    /// Tiles whose noise sample was non-finite and replaced by the fallback
    pub noise_anomalies: usize,
}

impl GenerationStats {
    pub fn decorations(&self) -> usize {
        self.decorations_per_kind.values().sum()
    }
}

/// Everything one pass hands to the renderer.
#[derive(Clone, Debug)]
pub struct GeneratedWorld {
    pub theme: Theme,
    /// One batch per batch key of the theme, empty ones included
    pub batches: Vec<TerrainBatch>,
    pub placements: Vec<DecorationPlacement>,
    pub clouds: Vec<CloudMesh>,
    pub fixtures: Vec<Fixture>,
    pub stats: GenerationStats,
}

impl GeneratedWorld {
    pub fn batch(&self, biome: BiomeKind) -> Option<&TerrainBatch> {
        self.batches.iter().find(|b| b.biome == biome)
    }

    /// Bounds of all terrain batches, `None` when every batch is empty.
    pub fn terrain_bounds(&self) -> Option<Aabb> {
        self.batches
            .iter()
            .filter_map(|b| b.buffer.bounds())
            .reduce(|a, b| a.merged(&b))
    }
}

/// Per-tile output of the parallel stage, merged serially afterwards.
struct ProcessedTile {
    tile: Tile,
    column: MeshGeometry,
    decorations: Vec<(Decoration, MeshGeometry)>,
    anomaly: bool,
}

/// Runs one generation pass for a configuration and theme.
#[derive(Debug)]
pub struct GenerationPipeline {
    config: GenerationConfig,
    theme: Theme,
    grid: HexGrid,
    height: HeightField,
    classifier: BiomeClassifier,
}

impl GenerationPipeline {
    /// Create a pipeline over seeded simplex noise. Fails on invalid config.
    pub fn new(config: GenerationConfig, theme: Theme) -> Result<Self> {
        config.validate()?;
        let height = HeightField::new(config.height.clone(), config.noise_seed);
        Self::build(config, theme, height)
    }

    /// Create a pipeline over a caller-supplied noise source.
    pub fn with_sampler<S: NoiseSampler + 'static>(
        config: GenerationConfig,
        theme: Theme,
        sampler: S,
    ) -> Result<Self> {
        config.validate()?;
        let height = HeightField::with_sampler(config.height.clone(), sampler);
        Self::build(config, theme, height)
    }

    fn build(config: GenerationConfig, theme: Theme, height: HeightField) -> Result<Self> {
        theme.validate()?;
        let grid = HexGrid::new(config.grid.clone());
        let classifier = BiomeClassifier::new(&config.biomes, config.height.max_height);
        Ok(Self {
            config,
            theme,
            grid,
            height,
            classifier,
        })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Heights and biomes of every tile, in enumeration order, without
    /// building any geometry.
    pub fn classify_tiles(&self) -> Vec<Tile> {
        self.grid
            .tile_coords()
            .par_iter()
            .filter_map(|&coord| self.classify_tile(coord).map(|(tile, _)| tile))
            .collect()
    }

    /// Run the full pass.
    pub fn generate(&self) -> GeneratedWorld {
        let start = std::time::Instant::now();
        let coords = self.grid.tile_coords();
        log::info!(
            "Generating '{}' world: {} tiles inside radius {}",
            self.theme.name,
            coords.len(),
            self.config.grid.play_radius
        );

        // Phase 1: per-tile work in parallel, collected in enumeration order
        let placer = DecorationPlacer::new(&self.config.decorations, self.theme.tall_decoration);
        let processed: Vec<ProcessedTile> = coords
            .par_iter()
            .filter_map(|&coord| self.process_tile(coord, &placer))
            .collect();

        // Phase 2: single-writer merge
        let mut batcher = GeometryBatcher::with_keys(self.theme.batch_keys());
        let mut stats = GenerationStats {
            tiles_per_biome: BiomeKind::BANDS.iter().map(|&b| (b, 0)).collect(),
            ..Default::default()
        };
        let mut placements = Vec::new();

        for p in &processed {
            stats.tiles += 1;
            *stats.tiles_per_biome.entry(p.tile.biome).or_default() += 1;
            if p.anomaly {
                stats.noise_anomalies += 1;
            }
            batcher.append(p.tile.biome, &p.column);

            for (decoration, geometry) in &p.decorations {
                batcher.append(decoration.batch(), geometry);
                *stats.decorations_per_kind.entry(decoration.kind()).or_default() += 1;
                placements.push(DecorationPlacement::from(decoration));
            }
        }

        let batches: Vec<TerrainBatch> = batcher
            .finalize()
            .into_iter()
            .map(|(biome, buffer)| TerrainBatch {
                biome,
                material: self.material(biome),
                buffer,
            })
            .collect();

        // Phase 3: terrain-independent meshes
        let mut cloud_rng = stream_rng(self.config.rng_seed, Stream::Clouds);
        let clouds = CloudFieldGenerator::new(&self.config.clouds)
            .generate(&mut cloud_rng, &self.theme.cloud_material);
        stats.clouds = clouds.len();

        let fixtures = build_fixtures(&self.config.fixtures, self.config.height.max_height, &self.theme);

        let elapsed = start.elapsed();
        log::info!(
            "Generated {} tiles, {} decorations, {} clouds in {:.1}ms",
            stats.tiles,
            stats.decorations(),
            stats.clouds,
            elapsed.as_secs_f64() * 1000.0
        );
        if stats.noise_anomalies > 0 {
            log::warn!(
                "{} tiles used the fallback height after non-finite noise",
                stats.noise_anomalies
            );
        }

        GeneratedWorld {
            theme: self.theme.clone(),
            batches,
            placements,
            clouds,
            fixtures,
            stats,
        }
    }

    /// Position, height, and biome of one tile. `None` drops the tile.
    fn classify_tile(&self, coord: TileCoord) -> Option<(Tile, bool)> {
        let position = self.grid.position_for(coord.column, coord.row);
        let (height, anomaly) = match self.height.try_sample(coord.column, coord.row) {
            Some(h) => (h, false),
            None => (self.height.fallback_for(coord.column, coord.row), true),
        };
        let Some(biome) = self.classifier.classify(height) else {
            log::warn!(
                "Tile ({}, {}) at height {} falls below every band, skipping",
                coord.column, coord.row, height
            );
            return None;
        };
        Some((Tile { coord, position, height, biome }, anomaly))
    }

    fn process_tile(&self, coord: TileCoord, placer: &DecorationPlacer<'_>) -> Option<ProcessedTile> {
        let (tile, anomaly) = self.classify_tile(coord)?;

        let column = cylinder(TILE_RADIUS, TILE_RADIUS, tile.height, TILE_SIDES, false)
            .translated(Vec3::new(tile.position.x, tile.height * 0.5, tile.position.y));

        let mut rng = tile_rng(self.config.rng_seed, coord.column, coord.row);
        let decorations = placer
            .place(&tile, &mut rng)
            .into_iter()
            .map(|d| {
                let geometry = d.geometry(&self.config.decorations);
                (d, geometry)
            })
            .collect();

        Some(ProcessedTile { tile, column, decorations, anomaly })
    }

    fn material(&self, biome: BiomeKind) -> MaterialId {
        self.theme
            .material_for(biome)
            .cloned()
            .unwrap_or_else(|| MaterialId::new(biome.name()))
    }
}
