//! Tree placement on generated columns

use glam::IVec3;

use crate::voxel::block::BlockType;
use crate::voxel::chunk::Chunk;

/// Trunk length in voxels
pub const TRUNK_HEIGHT: i32 = 5;

/// Leaf offsets relative to the trunk base
///
/// A plus-shaped layer two voxels out at the trunk top, a one-voxel plus just
/// below it, diagonals on the top layer and a single crown leaf above.
pub const CANOPY: [IVec3; 17] = [
    IVec3::new(-1, 4, 0),
    IVec3::new(-2, 4, 0),
    IVec3::new(1, 4, 0),
    IVec3::new(2, 4, 0),
    IVec3::new(1, 3, 0),
    IVec3::new(-1, 3, 0),
    IVec3::new(0, 4, -1),
    IVec3::new(0, 4, -2),
    IVec3::new(0, 4, 1),
    IVec3::new(0, 4, 2),
    IVec3::new(0, 3, 1),
    IVec3::new(0, 3, -1),
    IVec3::new(1, 4, 1),
    IVec3::new(-1, 4, 1),
    IVec3::new(1, 4, -1),
    IVec3::new(-1, 4, -1),
    IVec3::new(0, 5, 0),
];

/// Deterministic hash of a world column to [0, 1]
pub fn column_hash(ix: i32, iz: i32, seed: u32) -> f32 {
    let mut h = (ix as u32)
        .wrapping_mul(374761393)
        .wrapping_add((iz as u32).wrapping_mul(668265263))
        .wrapping_add(seed.wrapping_mul(1274126177));
    h = (h ^ (h >> 13)).wrapping_mul(1103515245);
    h = h ^ (h >> 16);
    (h & 0x7FFFFFFF) as f32 / 0x7FFFFFFF_u32 as f32
}

/// Per-column coin flip for tree growth
pub fn should_grow(world_x: i32, world_z: i32, seed: u32, chance: f32) -> bool {
    chance > 0.0 && column_hash(world_x, world_z, seed) < chance
}

/// Stamp a trunk and canopy with the trunk starting at `base`
///
/// Voxels that would fall outside the chunk are skipped.
pub fn stamp_tree(chunk: &mut Chunk, base: IVec3) {
    for dy in 0..TRUNK_HEIGHT {
        chunk.set_block(base.x, base.y + dy, base.z, BlockType::TreeTrunk);
    }
    for offset in CANOPY {
        let p = base + offset;
        chunk.set_block(p.x, p.y, p.z, BlockType::Leaf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::chunk::{ChunkCoord, ChunkDims};

    #[test]
    fn test_hash_range_and_determinism() {
        for i in -50..50 {
            let h = column_hash(i, i * 7, 42);
            assert!((0.0..=1.0).contains(&h));
            assert_eq!(h, column_hash(i, i * 7, 42));
        }
    }

    #[test]
    fn test_chance_rate() {
        let mut grown = 0;
        for x in 0..200 {
            for z in 0..200 {
                if should_grow(x, z, 9, 0.005) {
                    grown += 1;
                }
            }
        }
        // 40000 columns at 1/200 is about 200 trees
        assert!(grown > 100 && grown < 300, "grew {}", grown);
    }

    #[test]
    fn test_zero_chance_never_grows() {
        for x in 0..100 {
            assert!(!should_grow(x, -x, 1, 0.0));
        }
    }

    #[test]
    fn test_stamp_inside_chunk() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), ChunkDims::default()).unwrap();
        stamp_tree(&mut chunk, IVec3::new(7, 40, 7));

        for dy in 0..TRUNK_HEIGHT {
            assert_eq!(chunk.block(7, 40 + dy, 7), BlockType::TreeTrunk);
        }
        assert_eq!(chunk.block(7, 45, 7), BlockType::Leaf);
        assert_eq!(chunk.block(9, 44, 7), BlockType::Leaf);
        assert_eq!(chunk.block(6, 43, 7), BlockType::Leaf);
        assert_eq!(chunk.block(8, 44, 8), BlockType::Leaf);
        assert_eq!(chunk.solid_count(), TRUNK_HEIGHT as usize + CANOPY.len());
    }

    #[test]
    fn test_stamp_at_edge_skips_outside() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), ChunkDims::default()).unwrap();
        stamp_tree(&mut chunk, IVec3::new(0, 40, 0));

        // Leaves with negative x or z are dropped
        let inside = CANOPY
            .iter()
            .filter(|o| o.x >= 0 && o.z >= 0)
            .count();
        assert_eq!(chunk.solid_count(), TRUNK_HEIGHT as usize + inside);
    }

    #[test]
    fn test_stamp_near_top_is_clipped() {
        let dims = ChunkDims::default();
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), dims).unwrap();
        stamp_tree(&mut chunk, IVec3::new(7, dims.height as i32 - 2, 7));
        assert_eq!(chunk.solid_count(), 2);
    }
}
