//! Primitive shape builders.
//!
//! All shapes are centred on the origin with Y up. Cylinders span
//! `[-height / 2, height / 2]`; a zero top radius yields a cone whose apex
//! carries no degenerate triangles and no top cap.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::geometry::MeshGeometry;

/// Fewest sides a builder emits.
pub const MIN_SEGMENTS: u32 = 3;
/// Most sides a builder emits. Keeps every index within `u32`.
pub const MAX_SEGMENTS: u32 = 1024;

/// Build a (possibly tapered) cylinder with `radial_segments` sides.
///
/// A six-sided cylinder of radius 1 is one hex tile column.
pub fn cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    open_ended: bool,
) -> MeshGeometry {
    let segments = radial_segments.clamp(MIN_SEGMENTS, MAX_SEGMENTS);
    let ring = segments + 1;
    let half = height * 0.5;
    let slope = if height > 0.0 { (radius_bottom - radius_top) / height } else { 0.0 };

    let mut geo = MeshGeometry::with_capacity(
        (ring * 4 + 2) as usize,
        (segments * 12) as usize,
    );

    // Side wall: top ring then bottom ring, seam vertex duplicated
    for (y, radius) in [(half, radius_top), (-half, radius_bottom)] {
        for i in 0..=segments {
            let theta = i as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            let normal = Vec3::new(sin, slope, cos).normalize();
            geo.push_vertex(Vec3::new(radius * sin, y, radius * cos), normal);
        }
    }

    for i in 0..segments {
        let a = i;
        let b = i + ring;
        let c = i + 1 + ring;
        let d = i + 1;
        if radius_top > 0.0 {
            geo.push_triangle(a, b, d);
        }
        if radius_bottom > 0.0 {
            geo.push_triangle(b, c, d);
        }
    }

    if !open_ended {
        if radius_top > 0.0 {
            push_cap(&mut geo, radius_top, half, segments, true);
        }
        if radius_bottom > 0.0 {
            push_cap(&mut geo, radius_bottom, -half, segments, false);
        }
    }

    geo
}

/// Cone with its base at the bottom, the shape of one tree tier.
pub fn cone(radius: f32, height: f32, radial_segments: u32) -> MeshGeometry {
    cylinder(0.0, radius, height, radial_segments, false)
}

fn push_cap(geo: &mut MeshGeometry, radius: f32, y: f32, segments: u32, top: bool) {
    let normal = if top { Vec3::Y } else { Vec3::NEG_Y };
    let center = geo.push_vertex(Vec3::new(0.0, y, 0.0), normal);
    let first = center + 1;

    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        geo.push_vertex(Vec3::new(radius * sin, y, radius * cos), normal);
    }

    for i in 0..segments {
        let (p, q) = (first + i, first + i + 1);
        if top {
            geo.push_triangle(p, q, center);
        } else {
            geo.push_triangle(q, p, center);
        }
    }
}

/// UV sphere. Pole rows emit a single triangle per segment.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshGeometry {
    let ws = width_segments.clamp(MIN_SEGMENTS, MAX_SEGMENTS);
    let hs = height_segments.clamp(2, MAX_SEGMENTS);
    let row = ws + 1;

    let mut geo = MeshGeometry::with_capacity(
        (row * (hs + 1)) as usize,
        (ws * (hs - 1) * 6) as usize,
    );

    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        let (sin_v, cos_v) = (v * PI).sin_cos();
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let (sin_u, cos_u) = (u * TAU).sin_cos();
            let normal = Vec3::new(-cos_u * sin_v, cos_v, sin_u * sin_v);
            geo.push_vertex(normal * radius, normal);
        }
    }

    for iy in 0..hs {
        for ix in 0..ws {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                geo.push_triangle(a, b, d);
            }
            if iy != hs - 1 {
                geo.push_triangle(b, c, d);
            }
        }
    }

    geo
}
