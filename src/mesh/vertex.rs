//! Packed vertex encoding
//!
//! Each mesh vertex is a single `u32`. Fields are packed LSB first:
//!
//! ```text
//! | x | y | z | normal (3) | u (3) | v (3) |
//! ```
//!
//! The position widths are sized from the chunk dimensions: a corner coordinate
//! can reach the dimension itself (the far side of the last voxel), so an axis
//! of `n` voxels needs enough bits for `0..=n`. For the default 15 x 90 x 15
//! chunk that is 4 + 7 + 4 bits, 24 bits in total.

use glam::UVec3;

use super::face::Face;
use crate::core::{Error, Result};
use crate::voxel::chunk::ChunkDims;

/// Bits reserved for the face normal index
pub const NORMAL_BITS: u32 = 3;
/// Bits reserved for each texture coordinate
pub const UV_BITS: u32 = 3;

/// Unpacked vertex
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackedVertex {
    /// Corner position in chunk-local voxel units
    pub position: UVec3,
    /// Face the vertex belongs to
    pub face: Face,
    /// Atlas coordinate in tile units
    pub uv: [u8; 2],
}

/// Bit layout of a packed vertex word for a given chunk size
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexLayout {
    x_bits: u32,
    y_bits: u32,
    z_bits: u32,
}

fn bits_for(max_value: u32) -> u32 {
    (u32::BITS - max_value.leading_zeros()).max(1)
}

fn mask(bits: u32) -> u32 {
    if bits >= u32::BITS { u32::MAX } else { (1 << bits) - 1 }
}

impl VertexLayout {
    /// Encoding version, bump when the field order changes
    pub const VERSION: u32 = 1;

    /// Derive the layout for a chunk size
    ///
    /// Fails when the dimensions are zero or do not fit in one `u32` word
    /// together with the normal and texture fields.
    pub fn for_dims(dims: ChunkDims) -> Result<Self> {
        if dims.width == 0 || dims.height == 0 || dims.depth == 0 {
            return Err(Error::config(format!("chunk dimensions must be non-zero, got {}", dims)));
        }
        let layout = Self {
            x_bits: bits_for(dims.width),
            y_bits: bits_for(dims.height),
            z_bits: bits_for(dims.depth),
        };
        if layout.total_bits() > u32::BITS {
            return Err(Error::config(format!(
                "chunk dimensions {} need {} bits per packed vertex, only {} available",
                dims,
                layout.total_bits(),
                u32::BITS
            )));
        }
        Ok(layout)
    }

    /// Width of the x, y and z position fields
    pub fn position_bits(&self) -> [u32; 3] {
        [self.x_bits, self.y_bits, self.z_bits]
    }

    /// Total bits used by one vertex
    pub fn total_bits(&self) -> u32 {
        self.x_bits + self.y_bits + self.z_bits + NORMAL_BITS + 2 * UV_BITS
    }

    fn y_shift(&self) -> u32 {
        self.x_bits
    }

    fn z_shift(&self) -> u32 {
        self.x_bits + self.y_bits
    }

    fn normal_shift(&self) -> u32 {
        self.x_bits + self.y_bits + self.z_bits
    }

    fn u_shift(&self) -> u32 {
        self.normal_shift() + NORMAL_BITS
    }

    fn v_shift(&self) -> u32 {
        self.u_shift() + UV_BITS
    }

    /// Pack a vertex into one word
    ///
    /// Fields are masked to their widths; the mesher only produces values that
    /// the layout was validated for.
    pub fn encode(&self, vertex: &PackedVertex) -> u32 {
        debug_assert!(vertex.position.x <= mask(self.x_bits));
        debug_assert!(vertex.position.y <= mask(self.y_bits));
        debug_assert!(vertex.position.z <= mask(self.z_bits));
        debug_assert!(u32::from(vertex.uv[0]) <= mask(UV_BITS));
        debug_assert!(u32::from(vertex.uv[1]) <= mask(UV_BITS));

        (vertex.position.x & mask(self.x_bits))
            | (vertex.position.y & mask(self.y_bits)) << self.y_shift()
            | (vertex.position.z & mask(self.z_bits)) << self.z_shift()
            | u32::from(vertex.face.index()) << self.normal_shift()
            | (u32::from(vertex.uv[0]) & mask(UV_BITS)) << self.u_shift()
            | (u32::from(vertex.uv[1]) & mask(UV_BITS)) << self.v_shift()
    }

    /// Unpack a vertex word, `None` when the normal field is not a valid face
    pub fn decode(&self, word: u32) -> Option<PackedVertex> {
        let field = |shift: u32, bits: u32| (word >> shift) & mask(bits);
        let face = Face::from_index(field(self.normal_shift(), NORMAL_BITS) as u8)?;
        Some(PackedVertex {
            position: UVec3::new(
                field(0, self.x_bits),
                field(self.y_shift(), self.y_bits),
                field(self.z_shift(), self.z_bits),
            ),
            face,
            uv: [
                field(self.u_shift(), UV_BITS) as u8,
                field(self.v_shift(), UV_BITS) as u8,
            ],
        })
    }
}
