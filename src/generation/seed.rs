//! Deterministic seeded RNG streams.
//!
//! Every tile gets its own generator derived from the run seed and its index,
//! so placement never depends on processing order or thread count.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Independent streams drawn from one run seed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stream {
    Tiles = 1,
    Clouds = 2,
}

/// 64-bit finalizer (splitmix64): spreads nearby inputs over the whole range.
#[inline]
fn mix64(mut h: u64) -> u64 {
    h = (h ^ (h >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    h = (h ^ (h >> 27)).wrapping_mul(0x94d049bb133111eb);
    h ^ (h >> 31)
}

/// Derive a u64 seed for a tile from the run seed and tile index.
pub fn derive_tile_seed(run_seed: u64, column: i32, row: i32) -> u64 {
    let packed = ((column as u32 as u64) << 32) | row as u32 as u64;
    mix64(mix64(run_seed ^ Stream::Tiles as u64).wrapping_add(packed))
}

/// RNG for one tile. Same `(run_seed, column, row)` gives the same sequence.
pub fn tile_rng(run_seed: u64, column: i32, row: i32) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_tile_seed(run_seed, column, row))
}

/// RNG for a whole-run stream such as cloud scattering.
pub fn stream_rng(run_seed: u64, stream: Stream) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(mix64(run_seed ^ ((stream as u64) << 56)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::collections::HashSet;

    #[test]
    fn test_tile_rng_reproducible() {
        let mut a = tile_rng(42, 3, -7);
        let mut b = tile_rng(42, 3, -7);
        for _ in 0..16 {
            assert_eq!(a.random::<u64>(), b.random::<u64>());
        }
    }

    #[test]
    fn test_tile_seeds_distinct() {
        let mut seen = HashSet::new();
        for column in -20..=20 {
            for row in -20..=20 {
                assert!(seen.insert(derive_tile_seed(42, column, row)));
            }
        }
    }

    #[test]
    fn test_run_seed_changes_tile_seed() {
        assert_ne!(derive_tile_seed(1, 0, 0), derive_tile_seed(2, 0, 0));
        assert_ne!(derive_tile_seed(1, 1, 0), derive_tile_seed(1, 0, 1));
    }

    #[test]
    fn test_streams_independent() {
        let mut tiles = stream_rng(9, Stream::Tiles);
        let mut clouds = stream_rng(9, Stream::Clouds);
        assert_ne!(tiles.random::<u64>(), clouds.random::<u64>());
    }
}
