//! Append-only triangle geometry shared by tiles, decorations, and clouds.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::math::Aabb;

/// A single vertex: position and normal, laid out for direct GPU upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, serde::Serialize)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    #[inline]
    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }
}

/// Indexed triangle list (3 indices per triangle).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshGeometry {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshGeometry {
    /// Creates an empty geometry.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Push a vertex and return its index.
    pub fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(MeshVertex::new(position, normal));
        index
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Move every vertex by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        for v in &mut self.vertices {
            v.position = (v.position() + offset).to_array();
        }
    }

    /// Builder form of [`translate`](Self::translate).
    pub fn translated(mut self, offset: Vec3) -> Self {
        self.translate(offset);
        self
    }

    /// Rotate positions and normals about the world Y axis through the origin.
    pub fn rotate_y(&mut self, angle: f32) {
        self.transform(&Mat4::from_rotation_y(angle));
    }

    /// Apply a rigid transform. Normals are rotated and renormalized.
    pub fn transform(&mut self, matrix: &Mat4) {
        for v in &mut self.vertices {
            let position = matrix.transform_point3(v.position());
            let normal = matrix.transform_vector3(v.normal()).normalize_or_zero();
            *v = MeshVertex::new(position, normal);
        }
    }

    /// Append another geometry, rebasing its indices onto this buffer.
    pub fn append(&mut self, other: &MeshGeometry) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Merge several geometries into one buffer.
    pub fn merged<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = MeshGeometry>,
    {
        let mut out = MeshGeometry::new();
        for part in parts {
            out.append(&part);
        }
        out
    }

    /// Bounding box of all vertices, `None` for an empty buffer.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().map(MeshVertex::position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> MeshGeometry {
        let mut geo = MeshGeometry::new();
        let a = geo.push_vertex(Vec3::ZERO, Vec3::Y);
        let b = geo.push_vertex(Vec3::X, Vec3::Y);
        let c = geo.push_vertex(Vec3::Z, Vec3::Y);
        geo.push_triangle(a, b, c);
        geo
    }

    #[test]
    fn test_vertex_is_pod() {
        let v = MeshVertex::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Y);
        let bytes = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 24);
    }

    #[test]
    fn test_append_rebases_indices() {
        let mut geo = triangle();
        geo.append(&triangle().translated(Vec3::Y));

        assert_eq!(geo.vertex_count(), 6);
        assert_eq!(geo.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(geo.triangle_count(), 2);
    }

    #[test]
    fn test_translate_moves_bounds() {
        let geo = triangle().translated(Vec3::new(2.0, 1.0, -1.0));
        let bounds = geo.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(2.0, 1.0, -1.0));
        assert_eq!(bounds.max, Vec3::new(3.0, 1.0, 0.0));
    }

    #[test]
    fn test_rotate_y_quarter_turn() {
        let mut geo = triangle();
        geo.rotate_y(std::f32::consts::FRAC_PI_2);

        // +X rotates onto -Z, +Z onto +X
        assert!(geo.vertices[1].position().abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(geo.vertices[2].position().abs_diff_eq(Vec3::X, 1e-6));
        assert!(geo.vertices[0].normal().abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn test_empty_geometry() {
        let geo = MeshGeometry::new();
        assert!(geo.is_empty());
        assert!(geo.bounds().is_none());
        assert!(MeshGeometry::merged(Vec::new()).is_empty());
    }
}
