//! Block types and their texture atlas placement

use serde::{Deserialize, Serialize};

/// Number of tile columns in the block texture atlas
pub const ATLAS_COLUMNS: u8 = 4;

/// Material stored in a voxel
///
/// Discriminants of the solid materials double as texture atlas indices.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockType {
    Grass = 0,
    Stone = 1,
    Brick = 2,
    Coal = 3,
    Dirt = 4,
    Ice = 5,
    Sand = 6,
    Snow = 7,
    TreeTrunk = 8,
    Leaf = 9,
    JungleGrass = 10,
    RedSand = 11,
    #[default]
    Empty = 255,
}

impl BlockType {
    /// Every solid material, in atlas order
    pub const SOLID: [BlockType; 12] = [
        BlockType::Grass,
        BlockType::Stone,
        BlockType::Brick,
        BlockType::Coal,
        BlockType::Dirt,
        BlockType::Ice,
        BlockType::Sand,
        BlockType::Snow,
        BlockType::TreeTrunk,
        BlockType::Leaf,
        BlockType::JungleGrass,
        BlockType::RedSand,
    ];

    /// Check if this is empty space
    pub fn is_empty(self) -> bool {
        self == BlockType::Empty
    }

    /// Index into the texture atlas, `None` for empty space
    pub fn atlas_index(self) -> Option<u8> {
        if self.is_empty() { None } else { Some(self as u8) }
    }

    /// Atlas tile `(column, row)` of this material
    pub fn atlas_tile(self) -> Option<(u8, u8)> {
        self.atlas_index()
            .map(|i| (i % ATLAS_COLUMNS, i / ATLAS_COLUMNS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_has_no_tile() {
        assert!(BlockType::Empty.is_empty());
        assert_eq!(BlockType::Empty.atlas_index(), None);
        assert_eq!(BlockType::Empty.atlas_tile(), None);
        assert_eq!(BlockType::default(), BlockType::Empty);
    }

    #[test]
    fn test_atlas_tiles() {
        assert_eq!(BlockType::Grass.atlas_tile(), Some((0, 0)));
        assert_eq!(BlockType::Coal.atlas_tile(), Some((3, 0)));
        assert_eq!(BlockType::Dirt.atlas_tile(), Some((0, 1)));
        assert_eq!(BlockType::RedSand.atlas_tile(), Some((3, 2)));
    }

    #[test]
    fn test_solid_list_matches_discriminants() {
        for (i, block) in BlockType::SOLID.iter().enumerate() {
            assert!(!block.is_empty());
            assert_eq!(block.atlas_index(), Some(i as u8));
        }
    }
}
