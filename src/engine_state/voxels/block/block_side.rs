//! # Block Side Module
//!
//! This module defines the six faces of a voxel block. Every neighbour walk in
//! the engine (light flood fill, face culling, incremental relight) iterates
//! over these sides and uses [`BlockSide::offset`] to find the adjacent cell.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The discriminant doubles as the index into per-face tables such as
/// `BLOCK_TYPE_TO_TEXTURE_INDICES`.
///
/// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative X)
    LEFT = 4,

    /// The right face (facing positive X)
    RIGHT = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
    pub const fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// Unit step from a block to the neighbour across this face.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::BACK => Vector3::new(0, 0, -1),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
        }
    }

    /// The face pointing the other way.
    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::FRONT => BlockSide::BACK,
            BlockSide::BACK => BlockSide::FRONT,
            BlockSide::BOTTOM => BlockSide::TOP,
            BlockSide::TOP => BlockSide::BOTTOM,
            BlockSide::LEFT => BlockSide::RIGHT,
            BlockSide::RIGHT => BlockSide::LEFT,
        }
    }

    /// Fixed brightness multiplier standing in for a directional light.
    ///
    /// Downward faces are darkest, upward faces brightest, and the X and Z
    /// facing sides use two different values so adjacent walls stay readable.
    pub fn shade(self) -> f32 {
        match self {
            BlockSide::TOP => 0.8,
            BlockSide::BOTTOM => 0.5,
            BlockSide::LEFT | BlockSide::RIGHT => 0.6,
            BlockSide::FRONT | BlockSide::BACK => 0.7,
        }
    }
}
