//! Face-culled chunk meshing
//!
//! Every solid voxel contributes one quad per face whose neighbor is empty or
//! outside the chunk. Faces are not merged.

use glam::IVec3;

use super::face::{Face, CUBE_CORNERS};
use super::vertex::PackedVertex;
use crate::voxel::chunk::Chunk;

/// Two triangles of one voxel face, as packed vertex words
pub type Quad = [u32; 6];

/// Texture corner offsets for bottom-left, bottom-right, top-right, top-left
const UV_CORNERS: [[u8; 2]; 4] = [[0, 0], [1, 0], [1, 1], [0, 1]];

/// Corner sequence of the two triangles of a quad
const QUAD_ORDER: [usize; 6] = [0, 1, 2, 2, 3, 0];

/// Renderable geometry of one chunk
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkMesh {
    quads: Vec<Quad>,
}

impl ChunkMesh {
    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    pub fn quad_count(&self) -> usize {
        self.quads.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.quads.len() * 6
    }

    pub fn triangle_count(&self) -> usize {
        self.quads.len() * 2
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Flat vertex word buffer
    pub fn words(&self) -> &[u32] {
        bytemuck::cast_slice(&self.quads)
    }

    /// Raw bytes for GPU upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.quads)
    }
}

/// Build the mesh for a chunk's current voxels
pub fn build_mesh(chunk: &Chunk) -> ChunkMesh {
    let layout = chunk.layout();
    let mut quads = Vec::new();

    for voxel in chunk.voxels() {
        let Some((col, row)) = voxel.block.atlas_tile() else {
            continue;
        };
        let pos = IVec3::new(voxel.x as i32, voxel.y as i32, voxel.z as i32);

        for face in Face::ALL {
            let n = pos + face.offset();
            if chunk.is_solid(n.x, n.y, n.z) {
                continue;
            }

            let corners = face.corners();
            let mut quad = [0u32; 6];
            for (slot, &corner) in quad.iter_mut().zip(QUAD_ORDER.iter()) {
                let position = (pos + CUBE_CORNERS[corners[corner]]).as_uvec3();
                let uv = UV_CORNERS[corner];
                *slot = layout.encode(&PackedVertex {
                    position,
                    face,
                    uv: [col + uv[0], row + uv[1]],
                });
            }
            quads.push(quad);
        }
    }

    log::trace!(
        "Meshed chunk {} into {} quads",
        chunk.coord(),
        quads.len()
    );

    ChunkMesh { quads }
}
