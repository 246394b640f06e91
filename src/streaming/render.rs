//! Hand-off of chunk geometry to an external renderer

use glam::Vec3;

use crate::voxel::chunk::ChunkCoord;

/// Draw request for one chunk
#[derive(Clone, Copy, Debug)]
pub struct ChunkDraw<'a> {
    pub coord: ChunkCoord,
    /// World position of the chunk's minimum corner
    pub origin: Vec3,
    /// Packed vertex words, three per triangle
    pub vertices: &'a [u32],
    pub vertex_count: usize,
}

/// Implemented by the rendering layer
///
/// A renderer binds `vertices`, issues `vertex_count` vertices as a triangle
/// list translated by `origin`, and unbinds.
pub trait ChunkRenderer {
    fn draw(&mut self, draw: ChunkDraw<'_>);
}
