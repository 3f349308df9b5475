//! Hexscape - procedural hex-tile terrain with per-material geometry batching

pub mod core;
pub mod math;
pub mod mesh;
pub mod terrain;
pub mod generation;
