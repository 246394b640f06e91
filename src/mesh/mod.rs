//! Chunk meshing
//!
//! Converts a chunk's voxels into face-culled quads whose vertices are packed
//! into single `u32` words (see [`vertex`] for the bit layout).

pub mod face;
pub mod mesher;
pub mod vertex;

pub use face::Face;
pub use mesher::{build_mesh, ChunkMesh, Quad};
pub use vertex::{PackedVertex, VertexLayout};
