//! Per-biome vertical material layering
//!
//! A column is filled bottom-up by a cursor. Each recipe fills bands of
//! material up to a (jittered) boundary and leaves the cursor on the first
//! empty voxel above the surface.

use super::biome::BiomeKind;
use super::noise_field::{NoiseField, NoiseFields};
use crate::voxel::block::BlockType;
use crate::voxel::chunk::Chunk;

/// Low-frequency perturbation for band boundaries of one world column
#[derive(Clone, Copy)]
pub struct Jitter<'a> {
    fields: &'a NoiseFields,
    world_x: f32,
    world_z: f32,
}

impl<'a> Jitter<'a> {
    pub fn new(fields: &'a NoiseFields, world_x: f32, world_z: f32) -> Self {
        Self { fields, world_x, world_z }
    }

    /// Jitter in [-1, 1] at this column, sampled at `factor` times world scale
    pub fn sample(&self, factor: f32) -> f32 {
        self.fields
            .sample(NoiseField::Jitter, self.world_x * factor, self.world_z * factor)
    }

    /// Like [`Jitter::sample`] but on a scaled copy of the column position
    ///
    /// Used to decorrelate two boundaries that share a frequency.
    pub fn sample_scaled(&self, position_scale: f32, factor: f32) -> f32 {
        self.fields.sample(
            NoiseField::Jitter,
            self.world_x * position_scale * factor,
            self.world_z * position_scale * factor,
        )
    }
}

/// Fill cursor for one column of a chunk
pub struct ColumnCursor<'a> {
    chunk: &'a mut Chunk,
    x: i32,
    z: i32,
    y: i32,
    top: i32,
}

impl<'a> ColumnCursor<'a> {
    pub fn new(chunk: &'a mut Chunk, x: i32, z: i32, start_y: i32) -> Self {
        let top = chunk.dims().height as i32;
        Self { chunk, x, z, y: start_y, top }
    }

    /// Next voxel to be filled
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Fill with `block` while the cursor is below `limit`
    pub fn fill_to(&mut self, limit: f32, block: BlockType) {
        while (self.y as f32) < limit && self.y < self.top {
            self.chunk.set_block(self.x, self.y, self.z, block);
            self.y += 1;
        }
    }

    /// Fill a band of `thickness` voxels, never past `height`
    pub fn fill_band(&mut self, thickness: f32, height: f32, block: BlockType) {
        let limit = (self.y as f32 + thickness).min(height);
        self.fill_to(limit, block);
    }

    pub fn chunk_mut(&mut self) -> &mut Chunk {
        self.chunk
    }
}

/// Surface elevation below which stony mountains keep a grass cover
const STONY_GRASS_LINE: f32 = 70.0;

/// Apply a biome's material bands from the cursor up to `height`
pub fn apply_recipe(biome: BiomeKind, cursor: &mut ColumnCursor<'_>, height: f32, jitter: &Jitter<'_>) {
    match biome {
        BiomeKind::SnowyMountains => {
            let stone_top = height - 5.0 - 3.0 * jitter.sample(0.05);
            cursor.fill_to(stone_top, BlockType::Stone);
            let ice_top = stone_top + 2.0 + 4.0 * jitter.sample(-5.0);
            cursor.fill_to(ice_top.min(height), BlockType::Ice);
            cursor.fill_to(height, BlockType::Snow);
        }
        BiomeKind::StonyMountains => {
            let grass_line = STONY_GRASS_LINE + 5.0 * jitter.sample(0.1);
            if height < grass_line {
                cursor.fill_to(height, BlockType::Grass);
            } else {
                cursor.fill_to(height, BlockType::Stone);
            }
        }
        BiomeKind::Desert => {
            cursor.fill_to(height, BlockType::Sand);
        }
        BiomeKind::Plains => {
            cursor.fill_to(height - 2.0, BlockType::Dirt);
            cursor.fill_to(height, BlockType::Grass);
        }
        BiomeKind::Forest => {
            let dirt_top = height - 1.0 + 2.0 * jitter.sample(0.08);
            cursor.fill_to(dirt_top.min(height), BlockType::Dirt);
            cursor.fill_to(height, BlockType::Grass);
        }
        BiomeKind::Jungle => {
            let dirt_top = height - 2.0 + 2.0 * jitter.sample(0.08);
            cursor.fill_to(dirt_top.min(height), BlockType::Dirt);
            cursor.fill_to(height, BlockType::JungleGrass);
        }
        BiomeKind::Tundra => {
            let core_top = height - 2.0 + 4.0 * jitter.sample_scaled(-100.0, 0.05);
            let core = if jitter.sample(0.5) > -0.2 {
                BlockType::Stone
            } else {
                BlockType::Dirt
            };
            cursor.fill_to(core_top.min(height), core);
            cursor.fill_to(height, BlockType::Snow);
        }
        BiomeKind::Badlands => {
            cursor.fill_band(10.0 + 6.0 * jitter.sample(0.1), height, BlockType::RedSand);
            cursor.fill_band(2.0, height, BlockType::Sand);
            cursor.fill_band(2.0, height, BlockType::Dirt);
            cursor.fill_to(height, BlockType::RedSand);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::chunk::{ChunkCoord, ChunkDims};

    fn column(chunk: &Chunk) -> Vec<BlockType> {
        (0..chunk.dims().height as i32).map(|y| chunk.block(0, y, 0)).collect()
    }

    fn run(biome: BiomeKind, start: i32, height: f32) -> Vec<BlockType> {
        let fields = NoiseFields::new(5);
        let jitter = Jitter::new(&fields, 3.3, 7.7);
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), ChunkDims::default()).unwrap();
        let mut cursor = ColumnCursor::new(&mut chunk, 0, 0, start);
        apply_recipe(biome, &mut cursor, height, &jitter);
        column(&chunk)
    }

    fn surface(blocks: &[BlockType]) -> usize {
        blocks.iter().rposition(|b| !b.is_empty()).map_or(0, |y| y + 1)
    }

    #[test]
    fn test_cursor_fill() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), ChunkDims::new(4, 8, 4)).unwrap();
        let mut cursor = ColumnCursor::new(&mut chunk, 1, 1, 2);
        cursor.fill_to(4.5, BlockType::Dirt);
        assert_eq!(cursor.y(), 5);
        // Already past the limit, nothing happens
        cursor.fill_to(3.0, BlockType::Stone);
        assert_eq!(cursor.y(), 5);
        // Clamped to the chunk top
        cursor.fill_to(100.0, BlockType::Grass);
        assert_eq!(cursor.y(), 8);

        assert_eq!(chunk.block(1, 1, 1), BlockType::Empty);
        assert_eq!(chunk.block(1, 2, 1), BlockType::Dirt);
        assert_eq!(chunk.block(1, 4, 1), BlockType::Dirt);
        assert_eq!(chunk.block(1, 7, 1), BlockType::Grass);
    }

    #[test]
    fn test_every_recipe_reaches_surface() {
        let biomes = [
            BiomeKind::SnowyMountains,
            BiomeKind::Forest,
            BiomeKind::Plains,
            BiomeKind::StonyMountains,
            BiomeKind::Desert,
            BiomeKind::Jungle,
            BiomeKind::Tundra,
            BiomeKind::Badlands,
        ];
        for biome in biomes {
            let blocks = run(biome, 10, 60.3);
            assert_eq!(surface(&blocks), 61, "{:?}", biome);
            assert!(blocks[10..61].iter().all(|b| !b.is_empty()), "{:?}", biome);
            assert!(blocks[..10].iter().all(|b| b.is_empty()));
        }
    }

    #[test]
    fn test_plains_layers() {
        let blocks = run(BiomeKind::Plains, 1, 50.5);
        assert_eq!(blocks[48], BlockType::Dirt);
        assert_eq!(blocks[49], BlockType::Grass);
        assert_eq!(blocks[50], BlockType::Grass);
        assert_eq!(blocks[51], BlockType::Empty);
    }

    #[test]
    fn test_snowy_mountains_cap() {
        let blocks = run(BiomeKind::SnowyMountains, 1, 80.0);
        assert_eq!(blocks[1], BlockType::Stone);
        assert!(matches!(blocks[79], BlockType::Snow | BlockType::Ice));
        assert!(blocks[1..80]
            .iter()
            .all(|b| matches!(b, BlockType::Stone | BlockType::Ice | BlockType::Snow)));

        // Stone stops at least two voxels below the surface
        let cap = blocks[1..80].iter().filter(|b| **b != BlockType::Stone).count();
        assert!(cap >= 2);
    }

    #[test]
    fn test_stony_mountains_split() {
        let low = run(BiomeKind::StonyMountains, 1, 40.0);
        assert!(low[1..40].iter().all(|b| *b == BlockType::Grass));

        let high = run(BiomeKind::StonyMountains, 1, 85.0);
        assert!(high[1..85].iter().all(|b| *b == BlockType::Stone));
    }

    #[test]
    fn test_badlands_bands() {
        let blocks = run(BiomeKind::Badlands, 1, 60.0);
        assert_eq!(blocks[1], BlockType::RedSand);
        assert_eq!(blocks[59], BlockType::RedSand);

        // Red sand, then two sand, then two dirt
        let sand = blocks.iter().position(|b| *b == BlockType::Sand).unwrap();
        assert_eq!(blocks[sand + 1], BlockType::Sand);
        assert_eq!(blocks[sand + 2], BlockType::Dirt);
        assert_eq!(blocks[sand + 3], BlockType::Dirt);
        assert_eq!(blocks[sand + 4], BlockType::RedSand);
    }

    #[test]
    fn test_recipe_below_cursor_is_noop() {
        let blocks = run(BiomeKind::Desert, 30, 20.0);
        assert!(blocks.iter().all(|b| b.is_empty()));
    }
}
