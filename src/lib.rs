//! Strata - procedural voxel terrain with view-driven chunk streaming
//!
//! Terrain is generated column by column from layered Perlin noise remapped
//! through splines, classified into biomes, meshed into packed 32-bit vertex
//! words and streamed around a moving observer.

pub mod config;
pub mod core;
pub mod math;
pub mod mesh;
pub mod streaming;
pub mod terrain;
pub mod voxel;

pub use config::WorldConfig;
pub use core::{Error, Result};
