//! Mesh buffers, primitive builders, and per-material batching

pub mod geometry;
pub mod primitives;
pub mod batcher;

pub use geometry::{MeshGeometry, MeshVertex};
pub use batcher::{GeometryBatcher, MeshBuffer};
