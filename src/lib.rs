//! Fractal terrain-map generation library
//!
//! Generates a normalized diamond-square height field and a matching
//! biome color texture, both exportable as images.

pub mod biome;
pub mod export;
pub mod grid;
pub mod heightfield;
pub mod viewer;
