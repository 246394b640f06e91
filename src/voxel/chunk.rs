//! Chunk system for managing column regions of voxel space
//!
//! A chunk spans the full world height and a `width x depth` footprint, so
//! chunks are addressed by a 2D coordinate on the XZ plane.

use std::fmt;
use std::sync::Arc;

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

use super::block::BlockType;
use super::voxel::Voxel;
use crate::core::{Error, Result};
use crate::mesh::{build_mesh, ChunkMesh, VertexLayout};

/// Size of a chunk in voxels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkDims {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl Default for ChunkDims {
    fn default() -> Self {
        Self { width: 15, height: 90, depth: 15 }
    }
}

impl fmt::Display for ChunkDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.depth)
    }
}

impl ChunkDims {
    pub fn new(width: u32, height: u32, depth: u32) -> Self {
        Self { width, height, depth }
    }

    /// Check the dimensions can be stored and meshed
    pub fn validate(&self) -> Result<()> {
        let max = u32::from(u16::MAX);
        if self.width > max || self.height > max || self.depth > max {
            return Err(Error::config(format!(
                "chunk dimensions {} exceed the per-axis limit of {}",
                self, max
            )));
        }
        VertexLayout::for_dims(*self).map(|_| ())
    }

    /// Number of voxels in one chunk
    pub fn volume(&self) -> usize {
        self.width as usize * self.height as usize * self.depth as usize
    }

    /// Linear storage index of a local position, x fastest then y then z
    pub fn index(&self, x: u32, y: u32, z: u32) -> usize {
        (z as usize * self.width as usize * self.height as usize)
            + (y as usize * self.width as usize)
            + x as usize
    }

    /// Check if a signed local position lies inside the chunk
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as u32) < self.width
            && (y as u32) < self.height
            && (z as u32) < self.depth
    }

    /// Horizontal footprint in world units as `(width, depth)`
    pub fn extent(&self) -> (f32, f32) {
        (self.width as f32, self.depth as f32)
    }
}

/// Integer coordinate identifying a chunk column in the world grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    /// Create a new chunk coordinate
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Convert world position to chunk coordinate
    pub fn from_world_pos(pos: Vec3, dims: ChunkDims) -> Self {
        Self {
            x: (pos.x / dims.width as f32).floor() as i32,
            z: (pos.z / dims.depth as f32).floor() as i32,
        }
    }

    /// Split an integer world voxel position into its chunk and local position
    pub fn split_voxel(pos: IVec3, dims: ChunkDims) -> (Self, IVec3) {
        let (w, d) = (dims.width as i32, dims.depth as i32);
        let coord = Self { x: pos.x.div_euclid(w), z: pos.z.div_euclid(d) };
        (coord, IVec3::new(pos.x.rem_euclid(w), pos.y, pos.z.rem_euclid(d)))
    }

    /// Get the world-space origin (minimum corner) of this chunk
    pub fn world_origin(&self, dims: ChunkDims) -> Vec3 {
        Vec3::new(
            self.x as f32 * dims.width as f32,
            0.0,
            self.z as f32 * dims.depth as f32,
        )
    }

    /// Integer world position of the chunk's minimum corner
    ///
    /// `None` when the chunk's voxels do not all have `i32` world coordinates.
    pub fn world_origin_voxel(&self, dims: ChunkDims) -> Option<IVec3> {
        let axis = |c: i32, size: u32| {
            let size = i32::try_from(size).ok()?;
            let origin = c.checked_mul(size)?;
            origin.checked_add(size - 1)?;
            Some(origin)
        };
        Some(IVec3::new(axis(self.x, dims.width)?, 0, axis(self.z, dims.depth)?))
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// A column of voxels plus the mesh built from it
pub struct Chunk {
    coord: ChunkCoord,
    dims: ChunkDims,
    origin: IVec3,
    layout: VertexLayout,
    voxels: Vec<Voxel>,
    mesh: Arc<ChunkMesh>,
}

impl Chunk {
    /// Create a new empty chunk at the given coordinate
    ///
    /// Voxel storage is reserved up front; a failed reservation is reported
    /// instead of aborting the process.
    pub fn new(coord: ChunkCoord, dims: ChunkDims) -> Result<Self> {
        dims.validate()?;
        let layout = VertexLayout::for_dims(dims)?;
        let origin = coord.world_origin_voxel(dims).ok_or_else(|| {
            Error::config(format!("chunk {} is outside the representable world", coord))
        })?;

        let volume = dims.volume();
        let mut voxels = Vec::new();
        voxels
            .try_reserve_exact(volume)
            .map_err(|source| Error::Allocation { voxels: volume, source })?;

        // Storage order must match ChunkDims::index
        for z in 0..dims.depth {
            for y in 0..dims.height {
                for x in 0..dims.width {
                    voxels.push(Voxel::empty(x as u16, y as u16, z as u16));
                }
            }
        }

        Ok(Self {
            coord,
            dims,
            origin,
            layout,
            voxels,
            mesh: Arc::new(ChunkMesh::default()),
        })
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    /// Packed vertex layout used by this chunk's mesh
    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    /// All voxels in storage order
    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    /// Get the world-space origin of this chunk
    pub fn world_origin(&self) -> Vec3 {
        self.coord.world_origin(self.dims)
    }

    /// Integer world position of the minimum corner
    pub fn world_origin_voxel(&self) -> IVec3 {
        self.origin
    }

    /// Voxel at a local position, `None` outside the chunk
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<&Voxel> {
        if !self.dims.contains(x, y, z) {
            return None;
        }
        self.voxels.get(self.dims.index(x as u32, y as u32, z as u32))
    }

    /// Material at a local position, `Empty` outside the chunk
    pub fn block(&self, x: i32, y: i32, z: i32) -> BlockType {
        self.get(x, y, z).map_or(BlockType::Empty, |v| v.block)
    }

    /// Check if a local position holds a solid voxel
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        !self.block(x, y, z).is_empty()
    }

    /// Set the material at a local position without touching the mesh
    ///
    /// Returns `false` when the position is outside the chunk.
    pub(crate) fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockType) -> bool {
        if !self.dims.contains(x, y, z) {
            return false;
        }
        let index = self.dims.index(x as u32, y as u32, z as u32);
        match self.voxels.get_mut(index) {
            Some(voxel) => {
                voxel.block = block;
                true
            }
            None => false,
        }
    }

    /// Place a block and rebuild the mesh
    pub fn add_block(&mut self, x: i32, y: i32, z: i32, block: BlockType) -> bool {
        let changed = self.set_block(x, y, z, block);
        if changed {
            self.rebuild_mesh();
        }
        changed
    }

    /// Clear a block and rebuild the mesh
    pub fn remove_block(&mut self, x: i32, y: i32, z: i32) -> bool {
        self.add_block(x, y, z, BlockType::Empty)
    }

    /// Fill every voxel with one material and rebuild the mesh
    pub fn fill(&mut self, block: BlockType) {
        for voxel in &mut self.voxels {
            voxel.block = block;
        }
        self.rebuild_mesh();
    }

    /// Number of non-empty voxels
    pub fn solid_count(&self) -> usize {
        self.voxels.iter().filter(|v| !v.is_empty()).count()
    }

    /// Highest solid voxel in a column
    pub fn surface_y(&self, x: i32, z: i32) -> Option<i32> {
        (0..self.dims.height as i32)
            .rev()
            .find(|&y| self.is_solid(x, y, z))
    }

    /// Regenerate the mesh from the current voxels
    ///
    /// The previous mesh is replaced, not mutated, so holders of the old
    /// `Arc` keep a consistent buffer.
    pub fn rebuild_mesh(&mut self) {
        self.mesh = Arc::new(build_mesh(self));
    }

    /// Current mesh
    pub fn mesh(&self) -> &Arc<ChunkMesh> {
        &self.mesh
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("coord", &self.coord)
            .field("dims", &self.dims)
            .field("quads", &self.mesh.quad_count())
            .finish()
    }
}
