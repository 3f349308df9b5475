//! Per-material geometry accumulation.
//!
//! Tiles and decorations are appended into one buffer per key so the whole
//! terrain draws in one call per material. Keys registered up front always
//! finalize, even when nothing was appended to them.

use std::collections::BTreeMap;

use super::geometry::{MeshGeometry, MeshVertex};
use crate::math::Aabb;

/// A finalized, read-only batch buffer ready for hand-off to a renderer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffer {
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
    bounds: Option<Aabb>,
}

impl MeshBuffer {
    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Raw vertex bytes for GPU upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index bytes for GPU upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Bounding volume, `None` for an empty buffer.
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }
}

impl From<MeshGeometry> for MeshBuffer {
    fn from(geometry: MeshGeometry) -> Self {
        let bounds = geometry.bounds();
        Self {
            vertices: geometry.vertices,
            indices: geometry.indices,
            bounds,
        }
    }
}

/// Accumulates geometry into one buffer per batch key.
#[derive(Debug)]
pub struct GeometryBatcher<K> {
    batches: BTreeMap<K, MeshGeometry>,
}

impl<K: Ord + Copy> Default for GeometryBatcher<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Copy> GeometryBatcher<K> {
    pub fn new() -> Self {
        Self { batches: BTreeMap::new() }
    }

    /// Create a batcher with every key pre-registered.
    pub fn with_keys<I: IntoIterator<Item = K>>(keys: I) -> Self {
        let mut batcher = Self::new();
        for key in keys {
            batcher.register(key);
        }
        batcher
    }

    /// Ensure `key` finalizes, even if nothing is ever appended to it.
    pub fn register(&mut self, key: K) {
        self.batches.entry(key).or_default();
    }

    /// Merge `geometry` into the buffer for `key`.
    pub fn append(&mut self, key: K, geometry: &MeshGeometry) {
        self.batches.entry(key).or_default().append(geometry);
    }

    /// Accumulated geometry for `key` so far.
    pub fn get(&self, key: &K) -> Option<&MeshGeometry> {
        self.batches.get(key)
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Consume the batcher, yielding one buffer per registered key.
    pub fn finalize(self) -> BTreeMap<K, MeshBuffer> {
        self.batches
            .into_iter()
            .map(|(key, geometry)| {
                log::debug!(
                    "Batch finalized: {} vertices, {} triangles",
                    geometry.vertex_count(),
                    geometry.triangle_count()
                );
                (key, MeshBuffer::from(geometry))
            })
            .collect()
    }
}
