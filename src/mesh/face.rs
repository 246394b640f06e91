//! The six faces of a voxel cube

use glam::IVec3;

/// Cube face, discriminant is the packed normal index
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    /// -X
    Left = 0,
    /// +X
    Right = 1,
    /// +Z
    Forward = 2,
    /// -Z
    Backward = 3,
    /// +Y
    Top = 4,
    /// -Y
    Bottom = 5,
}

/// Unit cube corners, indexed as used by [`Face::corners`]
///
/// 0-3 lie on the z = 0 side, 4-7 on the z = 1 side, each counter-clockwise
/// from the bottom left.
pub const CUBE_CORNERS: [IVec3; 8] = [
    IVec3::new(0, 0, 0),
    IVec3::new(1, 0, 0),
    IVec3::new(1, 1, 0),
    IVec3::new(0, 1, 0),
    IVec3::new(0, 0, 1),
    IVec3::new(1, 0, 1),
    IVec3::new(1, 1, 1),
    IVec3::new(0, 1, 1),
];

impl Face {
    /// All faces in normal-index order
    pub const ALL: [Face; 6] = [
        Face::Left,
        Face::Right,
        Face::Forward,
        Face::Backward,
        Face::Top,
        Face::Bottom,
    ];

    /// Normal index stored in packed vertices
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Face for a packed normal index
    pub fn from_index(index: u8) -> Option<Face> {
        Face::ALL.get(index as usize).copied()
    }

    /// Offset to the neighboring voxel this face looks at
    pub fn offset(self) -> IVec3 {
        match self {
            Face::Left => IVec3::NEG_X,
            Face::Right => IVec3::X,
            Face::Forward => IVec3::Z,
            Face::Backward => IVec3::NEG_Z,
            Face::Top => IVec3::Y,
            Face::Bottom => IVec3::NEG_Y,
        }
    }

    /// Cube corners of this face as bottom-left, bottom-right, top-right, top-left
    pub fn corners(self) -> [usize; 4] {
        match self {
            Face::Left => [0, 4, 7, 3],
            Face::Right => [5, 1, 2, 6],
            Face::Forward => [4, 5, 6, 7],
            Face::Backward => [0, 1, 2, 3],
            Face::Top => [7, 6, 2, 3],
            Face::Bottom => [4, 5, 1, 0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for face in Face::ALL {
            assert_eq!(Face::from_index(face.index()), Some(face));
        }
        assert_eq!(Face::from_index(6), None);
        assert_eq!(Face::from_index(7), None);
    }

    #[test]
    fn test_corners_lie_on_face() {
        // Every corner of a face sits on the plane the face normal points through.
        for face in Face::ALL {
            let offset = face.offset();
            for corner in face.corners() {
                let c = CUBE_CORNERS[corner];
                let along = c.dot(offset);
                let expected = if offset.x + offset.y + offset.z > 0 { 1 } else { 0 };
                assert_eq!(along.abs(), expected, "{:?} corner {}", face, corner);
            }
        }
    }

    #[test]
    fn test_opposite_offsets_cancel() {
        assert_eq!(Face::Left.offset() + Face::Right.offset(), IVec3::ZERO);
        assert_eq!(Face::Forward.offset() + Face::Backward.offset(), IVec3::ZERO);
        assert_eq!(Face::Top.offset() + Face::Bottom.offset(), IVec3::ZERO);
    }
}
