//! Hex grid layout, noise heights, and biome bands

pub mod hex_grid;
pub use hex_grid::{GridParams, HexGrid, Tile, TileCoord};

pub mod height_field;
pub use height_field::{HeightField, HeightParams, NoiseSampler};

pub mod biome;
pub use biome::{BiomeClassifier, BiomeKind, BiomeThresholds};
