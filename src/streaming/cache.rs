//! LRU cache for chunks
//!
//! Holds every built chunk, active or not, keyed by chunk coordinate. The
//! cache never decides on its own what to drop: the streamer trims it and
//! pins the chunks that are currently in view.

use crate::voxel::chunk::{Chunk, ChunkCoord};
use std::collections::HashMap;

/// LRU cache for chunks
///
/// Access order is tracked to determine which chunks to evict when the cache
/// is over capacity.
pub struct ChunkCache {
    /// Map of chunk coordinates to chunks
    chunks: HashMap<ChunkCoord, Chunk>,
    /// Access order: oldest first, newest last
    access_order: Vec<ChunkCoord>,
    /// Number of chunks to keep after trimming
    max_chunks: usize,
}

impl ChunkCache {
    /// Create a new chunk cache with the given capacity
    pub fn new(max_chunks: usize) -> Self {
        Self {
            chunks: HashMap::with_capacity(max_chunks),
            access_order: Vec::with_capacity(max_chunks),
            max_chunks,
        }
    }

    /// Get a chunk by coordinate and mark it as recently used
    pub fn get(&mut self, coord: ChunkCoord) -> Option<&Chunk> {
        if self.chunks.contains_key(&coord) {
            self.update_access_order(coord);
            self.chunks.get(&coord)
        } else {
            None
        }
    }

    /// Get a mutable chunk by coordinate and mark it as recently used
    pub fn get_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        if self.chunks.contains_key(&coord) {
            self.update_access_order(coord);
            self.chunks.get_mut(&coord)
        } else {
            None
        }
    }

    /// Get a chunk without touching the access order
    pub fn peek(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Mark a chunk as recently used, returns false if it is not cached
    pub fn touch(&mut self, coord: ChunkCoord) -> bool {
        let present = self.chunks.contains_key(&coord);
        if present {
            self.update_access_order(coord);
        }
        present
    }

    /// Insert a chunk as the most recently used entry
    ///
    /// Returns the chunk previously stored at the same coordinate.
    pub fn insert(&mut self, chunk: Chunk) -> Option<Chunk> {
        let coord = chunk.coord();
        self.remove_from_access_order(coord);
        self.access_order.push(coord);
        self.chunks.insert(coord, chunk)
    }

    /// Remove a chunk from the cache
    pub fn remove(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        self.remove_from_access_order(coord);
        self.chunks.remove(&coord)
    }

    /// Check if the cache contains a chunk
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Get the number of chunks in the cache
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_chunks
    }

    /// Evict the least recently used chunk that is not pinned
    pub fn evict_oldest_unpinned(&mut self, pinned: impl Fn(&ChunkCoord) -> bool) -> Option<Chunk> {
        let coord = self.access_order.iter().find(|c| !pinned(*c)).copied()?;
        self.remove(coord)
    }

    /// Evict unpinned chunks, oldest first, until the cache is within capacity
    ///
    /// Pinned chunks are never evicted, so the cache may stay over capacity
    /// when too many chunks are pinned.
    pub fn trim(&mut self, pinned: impl Fn(&ChunkCoord) -> bool) -> Vec<Chunk> {
        let mut evicted = Vec::new();
        while self.chunks.len() > self.max_chunks {
            match self.evict_oldest_unpinned(&pinned) {
                Some(chunk) => evicted.push(chunk),
                None => break,
            }
        }
        evicted
    }

    /// Get an iterator over all chunk coordinates
    pub fn coords(&self) -> impl Iterator<Item = &ChunkCoord> {
        self.chunks.keys()
    }

    /// Update access order by moving a coordinate to the end (most recent)
    fn update_access_order(&mut self, coord: ChunkCoord) {
        self.remove_from_access_order(coord);
        self.access_order.push(coord);
    }

    /// Remove a coordinate from the access order
    fn remove_from_access_order(&mut self, coord: ChunkCoord) {
        if let Some(pos) = self.access_order.iter().position(|&c| c == coord) {
            self.access_order.remove(pos);
        }
    }
}
