//! Hex tile layout: axial tile indices to planar world positions.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::biome::BiomeKind;
use crate::core::{Error, Result};

/// Parameters controlling the tile enumeration and play area
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridParams {
    pub min_index: i32,           // Lowest column/row index enumerated
    pub max_index: i32,           // Highest column/row index enumerated (inclusive)
    pub play_radius: f32,         // Tiles further than this from the origin are dropped
    pub horizontal_spacing: f32,  // Distance between neighbouring columns
    pub vertical_spacing: f32,    // Distance between neighbouring rows
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            min_index: -20,
            max_index: 20,
            play_radius: 16.0,
            horizontal_spacing: 1.77,
            vertical_spacing: 1.535,
        }
    }
}

impl GridParams {
    pub fn validate(&self) -> Result<()> {
        if self.min_index > self.max_index {
            return Err(Error::config(format!(
                "grid.min_index ({}) exceeds grid.max_index ({})",
                self.min_index, self.max_index
            )));
        }
        if !(self.play_radius >= 0.0) || !self.play_radius.is_finite() {
            return Err(Error::config(format!(
                "grid.play_radius must be a finite non-negative number, got {}",
                self.play_radius
            )));
        }
        for (name, value) in [
            ("grid.horizontal_spacing", self.horizontal_spacing),
            ("grid.vertical_spacing", self.vertical_spacing),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(Error::config(format!("{name} must be positive, got {value}")));
            }
        }
        Ok(())
    }
}

/// Integer tile index. Only used to drive generation, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TileCoord {
    pub column: i32,
    pub row: i32,
}

impl TileCoord {
    pub fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }
}

/// A classified tile. `position` is planar: `x` is world X, `y` is world Z.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Tile {
    pub coord: TileCoord,
    pub position: Vec2,
    pub height: f32,
    pub biome: BiomeKind,
}

impl Tile {
    /// Centre of the tile's top face in world space.
    pub fn top(&self) -> Vec3 {
        to_world(self.position, self.height)
    }
}

/// Lift a planar position to world space at height `y`.
#[inline]
pub fn to_world(position: Vec2, y: f32) -> Vec3 {
    Vec3::new(position.x, y, position.y)
}

/// Offset-row hexagonal grid clipped to a circular play area
#[derive(Clone, Debug)]
pub struct HexGrid {
    params: GridParams,
}

impl HexGrid {
    pub fn new(params: GridParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &GridParams {
        &self.params
    }

    /// Planar position of a tile. Odd rows shift half a column so the
    /// hexagons interlock; the shift follows the sign of the row.
    pub fn position_for(&self, column: i32, row: i32) -> Vec2 {
        let shift = (row % 2) as f32 * 0.5;
        Vec2::new(
            (column as f32 + shift) * self.params.horizontal_spacing,
            row as f32 * self.params.vertical_spacing,
        )
    }

    /// Whether a planar position lies inside the play radius.
    pub fn is_in_bounds(&self, position: Vec2) -> bool {
        position.length() <= self.params.play_radius
    }

    /// All tile indices inside the play area, column by column.
    pub fn tile_coords(&self) -> Vec<TileCoord> {
        let range = self.params.min_index..=self.params.max_index;
        range
            .clone()
            .flat_map(|column| range.clone().map(move |row| TileCoord::new(column, row)))
            .filter(|c| self.is_in_bounds(self.position_for(c.column, c.row)))
            .collect()
    }
}

impl Default for HexGrid {
    fn default() -> Self {
        Self::new(GridParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_params_default() {
        let params = GridParams::default();
        assert_eq!(params.min_index, -20);
        assert_eq!(params.max_index, 20);
        assert_eq!(params.play_radius, 16.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_position_for() {
        let grid = HexGrid::default();
        assert_eq!(grid.position_for(0, 0), Vec2::ZERO);
        assert!(grid.position_for(2, 0).abs_diff_eq(Vec2::new(3.54, 0.0), 1e-6));

        let odd = grid.position_for(1, 1);
        assert!((odd.x - 1.5 * 1.77).abs() < 1e-6);
        assert!((odd.y - 1.535).abs() < 1e-6);

        let neg = grid.position_for(0, -1);
        assert!((neg.x + 0.5 * 1.77).abs() < 1e-6);
        assert!((neg.y + 1.535).abs() < 1e-6);
    }

    #[test]
    fn test_position_for_is_pure() {
        let grid = HexGrid::default();
        for column in -20..=20 {
            for row in -20..=20 {
                let a = grid.position_for(column, row);
                let b = grid.position_for(column, row);
                assert_eq!(a.x.to_bits(), b.x.to_bits());
                assert_eq!(a.y.to_bits(), b.y.to_bits());
            }
        }
    }

    #[test]
    fn test_is_in_bounds() {
        let grid = HexGrid::default();
        assert!(grid.is_in_bounds(Vec2::ZERO));
        assert!(grid.is_in_bounds(Vec2::new(16.0, 0.0)));
        assert!(!grid.is_in_bounds(Vec2::new(16.01, 0.0)));
        assert!(!grid.is_in_bounds(Vec2::new(12.0, 12.0)));
    }

    #[test]
    fn test_tile_count_golden() {
        let coords = HexGrid::default().tile_coords();
        assert_eq!(coords.len(), 301);
        assert!(coords.contains(&TileCoord::new(0, 0)));
        assert!(!coords.contains(&TileCoord::new(20, 20)));
    }

    #[test]
    fn test_zero_radius_keeps_origin_only() {
        let grid = HexGrid::new(GridParams { play_radius: 0.0, ..Default::default() });
        assert_eq!(grid.tile_coords(), vec![TileCoord::new(0, 0)]);
    }

    #[test]
    fn test_invalid_params() {
        let bad_radius = GridParams { play_radius: -1.0, ..Default::default() };
        assert!(bad_radius.validate().is_err());

        let bad_range = GridParams { min_index: 5, max_index: -5, ..Default::default() };
        assert!(bad_range.validate().is_err());

        let bad_spacing = GridParams { vertical_spacing: 0.0, ..Default::default() };
        assert!(bad_spacing.validate().is_err());
    }
}
