//! Voxel data structures

pub mod block;
pub mod chunk;
pub mod voxel;

pub use block::BlockType;
pub use chunk::{Chunk, ChunkCoord, ChunkDims};
pub use voxel::Voxel;
