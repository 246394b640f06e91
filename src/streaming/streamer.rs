//! View-driven chunk streaming
//!
//! Each chunk coordinate is in one of three states: absent, cached but
//! inactive, or active. Coordinates entering the view are generated (or
//! reactivated from the cache), coordinates leaving it stay cached until the
//! cache grows past its capacity, at which point the least recently used
//! inactive chunks are dropped. Active chunks are never evicted.

use std::collections::HashSet;
use std::sync::Arc;

use glam::IVec3;
use serde::{Deserialize, Serialize};

use super::cache::ChunkCache;
use super::render::{ChunkDraw, ChunkRenderer};
use super::view::{Observer, ViewRect, ViewSnapshot};
use crate::config::WorldConfig;
use crate::core::{Error, Result};
use crate::mesh::ChunkMesh;
use crate::terrain::TerrainGenerator;
use crate::voxel::block::BlockType;
use crate::voxel::chunk::{Chunk, ChunkCoord};

/// Streaming configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingParams {
    /// View distance in world units
    pub far: f32,
    /// Horizontal field of view in degrees
    pub horizontal_fov: f32,
    /// Observer movement (world units) that triggers a recompute
    pub position_granularity: f32,
    /// Observer rotation (degrees) that triggers a recompute
    pub yaw_granularity: f32,
    /// Chunks kept in memory, active ones included
    pub max_cached_chunks: usize,
}

impl Default for StreamingParams {
    fn default() -> Self {
        Self {
            far: 150.0,
            horizontal_fov: 90.0,
            position_granularity: 15.0,
            yaw_granularity: 10.0,
            max_cached_chunks: 512,
        }
    }
}

impl StreamingParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.far.is_finite() && self.far > 0.0) {
            return Err(Error::config(format!("far must be positive, got {}", self.far)));
        }
        if !(self.horizontal_fov > 0.0 && self.horizontal_fov < 180.0) {
            return Err(Error::config(format!(
                "horizontal_fov must be in (0, 180) degrees, got {}",
                self.horizontal_fov
            )));
        }
        if !(self.position_granularity.is_finite() && self.position_granularity > 0.0) {
            return Err(Error::config("position_granularity must be positive"));
        }
        if !(self.yaw_granularity > 0.0 && self.yaw_granularity <= 360.0) {
            return Err(Error::config("yaw_granularity must be in (0, 360] degrees"));
        }
        if self.max_cached_chunks == 0 {
            return Err(Error::config("max_cached_chunks must be at least 1"));
        }
        Ok(())
    }

    /// View rectangle for these parameters
    pub fn view_rect(&self) -> ViewRect {
        ViewRect::new(self.far, self.horizontal_fov.to_radians())
    }
}

/// Cumulative streaming counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamingStats {
    /// Chunks generated and meshed from scratch
    pub generated: u64,
    /// Cached chunks made active again without regeneration
    pub reused: u64,
    /// Active chunks that left the view
    pub deactivated: u64,
    /// Inactive chunks dropped from the cache
    pub evicted: u64,
    /// Chunks whose generation failed
    pub failed: u64,
    /// Desired-set recomputations
    pub recomputes: u64,
}

/// Keeps the chunks around an observer generated and meshed
pub struct ChunkStreamer {
    generator: TerrainGenerator,
    params: StreamingParams,
    view: ViewRect,
    cache: ChunkCache,
    active: HashSet<ChunkCoord>,
    snapshot: Option<ViewSnapshot>,
    stats: StreamingStats,
}

impl ChunkStreamer {
    /// Create a streamer from a world configuration
    pub fn new(config: &WorldConfig) -> Result<Self> {
        let generator = TerrainGenerator::new(config)?;
        Self::with_generator(generator, config.streaming.clone())
    }

    /// Create a streamer around an existing generator
    pub fn with_generator(generator: TerrainGenerator, params: StreamingParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            generator,
            view: params.view_rect(),
            cache: ChunkCache::new(params.max_cached_chunks),
            active: HashSet::new(),
            snapshot: None,
            stats: StreamingStats::default(),
            params,
        })
    }

    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    pub fn params(&self) -> &StreamingParams {
        &self.params
    }

    pub fn view(&self) -> &ViewRect {
        &self.view
    }

    pub fn stats(&self) -> StreamingStats {
        self.stats
    }

    /// Number of chunks held in memory, active or not
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Update for a new observer state
    ///
    /// The desired set is only recomputed when the quantized observer
    /// snapshot changed. Returns whether a recompute happened.
    pub fn update(&mut self, observer: &Observer) -> bool {
        let snapshot = ViewSnapshot::new(
            observer,
            self.params.position_granularity,
            self.params.yaw_granularity,
        );
        if self.snapshot == Some(snapshot) {
            return false;
        }
        self.snapshot = Some(snapshot);
        self.recompute(observer);
        true
    }

    /// Recompute the desired set regardless of the snapshot
    pub fn force_refresh(&mut self, observer: &Observer) {
        self.snapshot = Some(ViewSnapshot::new(
            observer,
            self.params.position_granularity,
            self.params.yaw_granularity,
        ));
        self.recompute(observer);
    }

    fn recompute(&mut self, observer: &Observer) {
        let desired = self.view.sample_coords(observer, self.generator.dims());
        self.stats.recomputes += 1;

        let mut leaving: Vec<ChunkCoord> = self.active.difference(&desired).copied().collect();
        leaving.sort_unstable();
        for coord in &leaving {
            self.active.remove(coord);
            // Most recently left chunks are evicted last
            self.cache.touch(*coord);
            self.stats.deactivated += 1;
        }

        let mut entering: Vec<ChunkCoord> = desired.difference(&self.active).copied().collect();
        entering.sort_unstable();
        let mut generated = 0;
        for coord in entering {
            if self.cache.touch(coord) {
                self.stats.reused += 1;
                self.active.insert(coord);
                continue;
            }
            match self.generator.generate_chunk(coord) {
                Ok(chunk) => {
                    self.cache.insert(chunk);
                    self.active.insert(coord);
                    self.stats.generated += 1;
                    generated += 1;
                }
                Err(e) => {
                    log::warn!("Failed to generate chunk {}: {}", coord, e);
                    self.stats.failed += 1;
                }
            }
        }

        let active = &self.active;
        let evicted = self.cache.trim(|c| active.contains(c));
        self.stats.evicted += evicted.len() as u64;

        if !leaving.is_empty() || generated > 0 || !evicted.is_empty() {
            log::info!(
                "Streaming: {} active, {} generated, {} left view, {} evicted, {} cached",
                self.active.len(),
                generated,
                leaving.len(),
                evicted.len(),
                self.cache.len()
            );
        }
        if self.cache.len() > self.cache.capacity() {
            log::debug!(
                "Chunk cache over capacity ({} > {}), all remaining chunks are active",
                self.cache.len(),
                self.cache.capacity()
            );
        }
    }

    pub fn is_active(&self, coord: ChunkCoord) -> bool {
        self.active.contains(&coord)
    }

    /// Active coordinates in sorted order
    pub fn active_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = self.active.iter().copied().collect();
        coords.sort_unstable();
        coords
    }

    /// Active chunks in sorted coordinate order
    pub fn active_chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.active_coords()
            .into_iter()
            .filter_map(|coord| self.cache.peek(coord))
    }

    /// Cached chunk at a coordinate, active or not
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.cache.peek(coord)
    }

    /// Shared handle to a cached chunk's mesh
    pub fn mesh(&self, coord: ChunkCoord) -> Option<Arc<ChunkMesh>> {
        self.cache.peek(coord).map(|chunk| Arc::clone(chunk.mesh()))
    }

    /// Place a block at an integer world position
    ///
    /// No-op when the owning chunk is not loaded or the position is outside
    /// the vertical range.
    pub fn add_block(&mut self, world_pos: IVec3, block: BlockType) -> bool {
        let (coord, local) = ChunkCoord::split_voxel(world_pos, self.generator.dims());
        match self.cache.get_mut(coord) {
            Some(chunk) => chunk.add_block(local.x, local.y, local.z, block),
            None => false,
        }
    }

    /// Clear the block at an integer world position
    pub fn remove_block(&mut self, world_pos: IVec3) -> bool {
        self.add_block(world_pos, BlockType::Empty)
    }

    /// Hand every active chunk with geometry to a renderer
    ///
    /// Returns the number of draws issued.
    pub fn render_active(&self, renderer: &mut impl ChunkRenderer) -> usize {
        let mut draws = 0;
        for chunk in self.active_chunks() {
            let mesh = chunk.mesh();
            if mesh.is_empty() {
                continue;
            }
            renderer.draw(ChunkDraw {
                coord: chunk.coord(),
                origin: chunk.world_origin(),
                vertices: mesh.words(),
                vertex_count: mesh.vertex_count(),
            });
            draws += 1;
        }
        draws
    }
}
