//! Procedural terrain generation

pub mod biome;
pub mod generator;
pub mod layers;
pub mod noise_field;
pub mod tree;

pub use biome::{Biome, BiomeBlend, BiomeKind, BiomeTable, BiomeWeights};
pub use generator::{ColumnSample, LayerWeights, NoiseLayer, TerrainCurves, TerrainGenerator, TerrainParams};
pub use noise_field::{NoiseField, NoiseFields};
