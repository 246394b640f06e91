//! View approximation for chunk streaming
//!
//! The forward viewing volume is approximated by a rectangle on the XZ plane
//! that starts at the observer and extends `far` units ahead. Its width is
//! deliberately wider than the frustum's far edge so chunks near the sides of
//! the screen never pop in late.

use std::collections::HashSet;

use glam::{IVec2, Vec2, Vec3};

use crate::voxel::chunk::{ChunkCoord, ChunkDims};

/// Over-estimate factor applied to the frustum width
pub const WIDTH_MARGIN: f32 = 2.5;

/// Position and heading of the viewer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observer {
    pub position: Vec3,
    /// Heading in radians, 0 looks along +X and positive turns towards +Z
    pub yaw: f32,
}

impl Observer {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }

    /// Horizontal unit view direction
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, self.yaw.sin())
    }
}

/// Forward view rectangle in observer space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewRect {
    /// Extent along the view direction
    pub length: f32,
    /// Extent across the view direction, centered on it
    pub width: f32,
}

/// Evenly spaced samples from `0` to `extent`, both ends included
fn steps(extent: f32, step: f32) -> impl Iterator<Item = f32> {
    let count = if extent > 0.0 { (extent / step).ceil() as u32 } else { 0 };
    (0..=count).map(move |i| (i as f32 * step).min(extent))
}

impl ViewRect {
    /// Rectangle for a far distance and a horizontal field of view in radians
    pub fn new(far: f32, horizontal_fov: f32) -> Self {
        Self {
            length: far,
            width: WIDTH_MARGIN * far * (horizontal_fov * 0.5).sin(),
        }
    }

    /// Chunk coordinates covered by the rectangle for an observer
    ///
    /// The rectangle is sampled at chunk-size intervals. Every sample adds all
    /// floor/ceil combinations of its fractional chunk position, which absorbs
    /// rounding from the rotation.
    pub fn sample_coords(&self, observer: &Observer, dims: ChunkDims) -> HashSet<ChunkCoord> {
        let extent = Vec2::new(dims.width as f32, dims.depth as f32);
        let step = extent.min_element();

        let origin = Vec2::new(observer.position.x, observer.position.z);
        let forward = Vec2::new(observer.yaw.cos(), observer.yaw.sin());
        let across = forward.perp();
        let half_width = self.width * 0.5;

        let mut coords = HashSet::new();
        for along in steps(self.length, step) {
            // Walk out from the center line so the observer's own column is sampled
            for side in steps(half_width, step).flat_map(|s| [s, -s]) {
                let point = origin + forward * along + across * side;
                let cell = point / extent;
                let lo = cell.floor().as_ivec2();
                let hi = cell.ceil().as_ivec2();
                for c in [lo, IVec2::new(lo.x, hi.y), IVec2::new(hi.x, lo.y), hi] {
                    coords.insert(ChunkCoord::new(c.x, c.y));
                }
            }
        }
        coords
    }
}

/// Quantized observer state used to skip redundant recomputation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ViewSnapshot {
    cell: IVec2,
    heading: i32,
}

impl ViewSnapshot {
    /// Round position to the nearest `position_granularity` units and yaw to
    /// the nearest `yaw_granularity` degrees
    pub fn new(observer: &Observer, position_granularity: f32, yaw_granularity: f32) -> Self {
        let xz = Vec2::new(observer.position.x, observer.position.z);
        let cell = (xz / position_granularity).round().as_ivec2();

        let degrees = observer.yaw.to_degrees().rem_euclid(360.0);
        let turns = (360.0 / yaw_granularity).round().max(1.0) as i32;
        let heading = ((degrees / yaw_granularity).round() as i32).rem_euclid(turns);

        Self { cell, heading }
    }
}
