//! # Chunk Coordinates
//!
//! Three coordinate spaces meet in the engine:
//!
//! * **World block** coordinates, `Point3<i32>`, unbounded. Block `(x, y, z)`
//!   is centred on the integer point and spans `± 0.5` on every axis.
//! * **Chunk** coordinates ([`ChunkPosition`]), the world block coordinate
//!   divided (flooring) by [`CHUNK_DIMENSION`].
//! * **Local** coordinates ([`BlockPosition`]), always inside
//!   `[0, CHUNK_DIMENSION)`.
//!
//! A local coordinate can never be out of range. Any step that leaves the chunk
//! resolves into the neighbouring chunk plus the wrapped local position through
//! [`BlockAddress::neighbor`] or [`BlockPosition::step`].

use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::block::block_side::BlockSide;

use super::{CHUNK_DIMENSION, CHUNK_PLANE_SIZE};

/// Position of a chunk on the world grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkPosition {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The chunk `delta` chunks away from this one.
    pub fn offset(self, delta: Vector3<i32>) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.z + delta.z)
    }

    /// The chunk containing a world block coordinate.
    pub fn containing(world: Point3<i32>) -> Self {
        Self::new(
            world.x.div_euclid(CHUNK_DIMENSION),
            world.y.div_euclid(CHUNK_DIMENSION),
            world.z.div_euclid(CHUNK_DIMENSION),
        )
    }

    /// World block coordinate of this chunk's local origin.
    pub fn origin(self) -> Point3<i32> {
        Point3::new(
            self.x * CHUNK_DIMENSION,
            self.y * CHUNK_DIMENSION,
            self.z * CHUNK_DIMENSION,
        )
    }

    /// The vertical column of chunks this chunk belongs to.
    pub fn column(self) -> ColumnPosition {
        ColumnPosition::new(self.x, self.z)
    }
}

impl From<Point3<i32>> for ChunkPosition {
    fn from(point: Point3<i32>) -> Self {
        Self::new(point.x, point.y, point.z)
    }
}

/// Horizontal position of a vertical stack of chunks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnPosition {
    pub x: i32,
    pub z: i32,
}

impl ColumnPosition {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The chunk of this column at layer `y`.
    pub fn chunk_at(self, y: i32) -> ChunkPosition {
        ChunkPosition::new(self.x, y, self.z)
    }

    /// Squared horizontal distance in columns, used to stream nearest first.
    pub fn distance_squared(self, other: ColumnPosition) -> i32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        dx * dx + dz * dz
    }
}

/// Position of a block inside its chunk.
///
/// Every coordinate is in `[0, CHUNK_DIMENSION)`; the constructor rejects
/// anything else, so a `BlockPosition` is always a valid array index.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPosition {
    x: u8,
    y: u8,
    z: u8,
}

/// Largest valid local coordinate.
const LOCAL_MAX: i32 = CHUNK_DIMENSION - 1;

impl BlockPosition {
    /// Builds a local position, or `None` when a coordinate is outside the chunk.
    pub fn new(x: i32, y: i32, z: i32) -> Option<Self> {
        let range = 0..CHUNK_DIMENSION;
        if range.contains(&x) && range.contains(&y) && range.contains(&z) {
            Some(Self {
                x: x as u8,
                y: y as u8,
                z: z as u8,
            })
        } else {
            None
        }
    }

    /// Wraps arbitrary coordinates into the chunk. Used where the caller has
    /// already split off the chunk offset.
    fn wrapped(x: i32, y: i32, z: i32) -> Self {
        Self {
            x: x.rem_euclid(CHUNK_DIMENSION) as u8,
            y: y.rem_euclid(CHUNK_DIMENSION) as u8,
            z: z.rem_euclid(CHUNK_DIMENSION) as u8,
        }
    }

    pub fn x(self) -> i32 {
        self.x as i32
    }

    pub fn y(self) -> i32 {
        self.y as i32
    }

    pub fn z(self) -> i32 {
        self.z as i32
    }

    /// Index into a chunk's block array: x fastest, then y, then z.
    pub fn index(self) -> usize {
        self.x as usize
            + self.y as usize * CHUNK_DIMENSION as usize
            + self.z as usize * CHUNK_PLANE_SIZE as usize
    }

    /// Inverse of [`BlockPosition::index`].
    pub fn from_index(index: usize) -> Self {
        let dimension = CHUNK_DIMENSION as usize;
        Self::wrapped(
            (index % dimension) as i32,
            (index / dimension % dimension) as i32,
            (index / (dimension * dimension) % dimension) as i32,
        )
    }

    /// Moves by `delta` blocks.
    ///
    /// Returns the chunk offset the move crosses into (each component -1, 0 or
    /// +1 for unit steps) and the wrapped local position inside that chunk.
    pub fn step(self, delta: Vector3<i32>) -> (Vector3<i32>, BlockPosition) {
        let x = self.x() + delta.x;
        let y = self.y() + delta.y;
        let z = self.z() + delta.z;
        let chunk_offset = Vector3::new(
            x.div_euclid(CHUNK_DIMENSION),
            y.div_euclid(CHUNK_DIMENSION),
            z.div_euclid(CHUNK_DIMENSION),
        );
        (chunk_offset, Self::wrapped(x, y, z))
    }

    /// True when at least one neighbour of this block lives in another chunk.
    pub fn is_on_border(self) -> bool {
        [self.x(), self.y(), self.z()]
            .iter()
            .any(|&c| c == 0 || c == LOCAL_MAX)
    }

    /// Iterates every local position in storage order.
    pub fn all() -> impl Iterator<Item = BlockPosition> {
        (0..super::CHUNK_SIZE as usize).map(BlockPosition::from_index)
    }
}

/// A block somewhere in the world: its chunk plus its local position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockAddress {
    pub chunk: ChunkPosition,
    pub block: BlockPosition,
}

impl BlockAddress {
    pub fn new(chunk: ChunkPosition, block: BlockPosition) -> Self {
        Self { chunk, block }
    }

    /// Splits a world block coordinate into chunk and local parts.
    pub fn from_world(world: Point3<i32>) -> Self {
        Self {
            chunk: ChunkPosition::containing(world),
            block: BlockPosition::wrapped(world.x, world.y, world.z),
        }
    }

    /// World block coordinate of this address.
    pub fn to_world(self) -> Point3<i32> {
        let origin = self.chunk.origin();
        Point3::new(
            origin.x + self.block.x(),
            origin.y + self.block.y(),
            origin.z + self.block.z(),
        )
    }

    /// The block across `side`, resolved into the neighbouring chunk when the
    /// step leaves this one.
    pub fn neighbor(self, side: BlockSide) -> BlockAddress {
        self.offset(side.offset())
    }

    /// The block `delta` away, resolved the same way as [`BlockAddress::neighbor`].
    pub fn offset(self, delta: Vector3<i32>) -> BlockAddress {
        let (chunk_offset, block) = self.block.step(delta);
        BlockAddress {
            chunk: self.chunk.offset(chunk_offset),
            block,
        }
    }
}

/// The world block whose cell contains a world-space point.
///
/// Blocks are centred on integer coordinates, so the containing block of `p`
/// is `floor(p + 0.5)` on every axis.
pub fn block_containing(point: Point3<f32>) -> Point3<i32> {
    Point3::new(
        (point.x + 0.5).floor() as i32,
        (point.y + 0.5).floor() as i32,
        (point.z + 0.5).floor() as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_positions_reject_out_of_range_coordinates() {
        assert!(BlockPosition::new(0, 0, 0).is_some());
        assert!(BlockPosition::new(LOCAL_MAX, LOCAL_MAX, LOCAL_MAX).is_some());
        assert!(BlockPosition::new(-1, 0, 0).is_none());
        assert!(BlockPosition::new(0, CHUNK_DIMENSION, 0).is_none());
    }

    #[test]
    fn border_positions_touch_a_chunk_face() {
        let inner = BlockPosition::new(1, 7, LOCAL_MAX - 1).unwrap();
        assert!(!inner.is_on_border());
        assert!(BlockPosition::new(0, 7, 7).unwrap().is_on_border());
        assert!(BlockPosition::new(7, LOCAL_MAX, 7).unwrap().is_on_border());

        for side in [(1, 0, 0), (0, -1, 0), (0, 0, 1)] {
            let (offset, _) = inner.step(Vector3::new(side.0, side.1, side.2));
            assert_eq!(offset, Vector3::new(0, 0, 0));
        }
    }

    #[test]
    fn index_round_trips_through_every_position() {
        for (expected, position) in BlockPosition::all().enumerate() {
            assert_eq!(position.index(), expected);
        }
    }

    #[test]
    fn stepping_off_the_low_edge_wraps_into_the_previous_chunk() {
        let edge = BlockPosition::new(0, 5, 7).unwrap();
        let (offset, wrapped) = edge.step(Vector3::new(-1, 0, 0));
        assert_eq!(offset, Vector3::new(-1, 0, 0));
        assert_eq!(wrapped, BlockPosition::new(LOCAL_MAX, 5, 7).unwrap());
    }

    #[test]
    fn stepping_off_the_high_edge_wraps_into_the_next_chunk() {
        let edge = BlockPosition::new(3, LOCAL_MAX, 7).unwrap();
        let (offset, wrapped) = edge.step(Vector3::new(0, 1, 0));
        assert_eq!(offset, Vector3::new(0, 1, 0));
        assert_eq!(wrapped, BlockPosition::new(3, 0, 7).unwrap());
    }

    #[test]
    fn interior_steps_stay_in_the_chunk() {
        let address = BlockAddress::new(
            ChunkPosition::new(2, -1, 4),
            BlockPosition::new(4, 4, 4).unwrap(),
        );
        for side in BlockSide::all() {
            assert_eq!(address.neighbor(side).chunk, address.chunk);
        }
    }

    #[test]
    fn negative_world_coordinates_split_with_flooring() {
        let address = BlockAddress::from_world(Point3::new(-1, -16, -17));
        assert_eq!(address.chunk, ChunkPosition::new(-1, -1, -2));
        assert_eq!(address.block, BlockPosition::new(LOCAL_MAX, 0, LOCAL_MAX).unwrap());
        assert_eq!(address.to_world(), Point3::new(-1, -16, -17));
    }

    #[test]
    fn points_resolve_to_centred_blocks() {
        assert_eq!(block_containing(Point3::new(0.49, -0.5, -0.51)), Point3::new(0, 0, -1));
    }
}
