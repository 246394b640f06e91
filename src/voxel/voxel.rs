//! Voxel data type

use super::block::BlockType;

/// Single grid cell: a material and its local position inside the owning chunk
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Voxel {
    /// Material of this cell
    pub block: BlockType,
    pub x: u16,
    pub y: u16,
    pub z: u16,
}

impl Voxel {
    /// Empty voxel at a local position
    pub fn empty(x: u16, y: u16, z: u16) -> Self {
        Self { block: BlockType::Empty, x, y, z }
    }

    /// Check if voxel is empty (air)
    pub fn is_empty(&self) -> bool {
        self.block.is_empty()
    }

    /// Local position as `[x, y, z]`
    pub fn local(&self) -> [u32; 3] {
        [self.x as u32, self.y as u32, self.z as u32]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let voxel = Voxel::empty(1, 2, 3);
        assert!(voxel.is_empty());
        assert_eq!(voxel.local(), [1, 2, 3]);
    }

    #[test]
    fn test_solid() {
        let voxel = Voxel { block: BlockType::Stone, ..Voxel::empty(0, 0, 0) };
        assert!(!voxel.is_empty());
    }
}
