//! # World Module
//!
//! This module provides the `World` struct, the chunk store. It exclusively
//! owns every loaded chunk and is the only place chunks are created, replaced
//! or dropped.
//!
//! ## Architecture
//!
//! The world is a sparse 3D grid of chunks keyed by [`ChunkPosition`]. Each
//! chunk sits behind its own lock ([`MtResource`]); the world itself is shared
//! as `MtResource<World>`, which yields a two-level lock hierarchy:
//!
//! - the **grid lock** (the world's `MtResource`) guards the key set. Readers
//!   (`&World`) may look chunks up; only a writer (`&mut World`) may insert,
//!   replace or evict.
//! - the **chunk locks** guard block data. Any number of readers, or one
//!   writer, per chunk.
//!
//! A light pass or mesh build holds the grid read guard for its whole duration,
//! so no chunk it visits can be evicted or replaced underneath it. Those passes
//! hold at most one chunk guard at a time, so two passes can never wait on each
//! other in a cycle.
//!
//! Absence is a normal answer: every lookup returns `Option`, and callers treat
//! `None` as "not generated yet".
//!
//! ## Vertical Bounds
//!
//! The world tracks the lowest and highest block Y of any chunk ever registered
//! ([`WorldHeight`]). Sunlight seeding scans columns from the top of that range.

use std::collections::{BTreeSet, HashMap};
use std::sync::{RwLockReadGuard, RwLockWriteGuard};

use cgmath::Point3;

use crate::core::MtResource;
use crate::engine_state::voxels::block::{block_type::BlockType, Block};
use crate::engine_state::voxels::chunk::{
    BlockAddress, Chunk, ChunkPosition, ColumnPosition, CHUNK_DIMENSION,
};
use crate::engine_state::voxels::terrain::TerrainGenerator;

/// Vertical extent of the loaded world in world block coordinates.
///
/// Invariant: `min_y <= max_y`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WorldHeight {
    pub min_y: i32,
    pub max_y: i32,
}

impl WorldHeight {
    fn of_chunk(position: ChunkPosition) -> Self {
        let min_y = position.y * CHUNK_DIMENSION;
        WorldHeight {
            min_y,
            max_y: min_y + CHUNK_DIMENSION - 1,
        }
    }

    fn include(&mut self, other: WorldHeight) {
        self.min_y = self.min_y.min(other.min_y);
        self.max_y = self.max_y.max(other.max_y);
    }
}

/// Represents a voxel world composed of multiple chunks.
///
/// # Examples
///
/// ```
/// use voxel_world::engine_state::voxels::{chunk::{Chunk, ChunkPosition}, world::World};
///
/// let mut world = World::new();
/// world.insert(Chunk::empty(ChunkPosition::new(0, 0, 0)));
///
/// assert!(world.get(ChunkPosition::new(0, 0, 0)).is_some());
/// assert!(world.get(ChunkPosition::new(1, 0, 0)).is_none());
/// ```
#[derive(Default)]
pub struct World {
    /// A mapping from chunk coordinates to chunk data.
    chunks: HashMap<ChunkPosition, MtResource<Chunk>>,
    /// Loaded chunk layers of every column, for top-down column scans.
    columns: HashMap<ColumnPosition, BTreeSet<i32>>,
    /// Lazily initialised on the first registered chunk.
    height: Option<WorldHeight>,
}

impl World {
    /// Creates a new, empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `chunk`, replacing any chunk already at its position.
    ///
    /// # Returns
    /// The handle of the replaced chunk, if there was one.
    pub fn insert(&mut self, chunk: Chunk) -> Option<MtResource<Chunk>> {
        let position = chunk.position;

        let chunk_height = WorldHeight::of_chunk(position);
        match self.height.as_mut() {
            Some(height) => height.include(chunk_height),
            None => self.height = Some(chunk_height),
        }

        self.columns
            .entry(position.column())
            .or_default()
            .insert(position.y);

        self.chunks.insert(position, MtResource::new(chunk))
    }

    /// Generates and registers the chunk at `position` if it is not loaded yet.
    ///
    /// # Returns
    /// `true` when a chunk was generated.
    pub fn add_chunk_at(&mut self, position: ChunkPosition, generator: &dyn TerrainGenerator) -> bool {
        if self.chunks.contains_key(&position) {
            return false;
        }
        self.insert(generator.generate(position));
        true
    }

    /// Drops the chunk at `position`. The vertical bounds never shrink.
    pub fn remove(&mut self, position: ChunkPosition) -> Option<MtResource<Chunk>> {
        let removed = self.chunks.remove(&position)?;
        if let Some(layers) = self.columns.get_mut(&position.column()) {
            layers.remove(&position.y);
            if layers.is_empty() {
                self.columns.remove(&position.column());
            }
        }
        Some(removed)
    }

    /// Read access to one chunk. Blocks while another thread writes to it.
    pub fn get(&self, position: ChunkPosition) -> Option<RwLockReadGuard<'_, Chunk>> {
        self.chunks.get(&position).map(MtResource::get)
    }

    /// Exclusive access to one chunk.
    ///
    /// Only the chunk is locked; other chunks stay available to other threads.
    pub fn get_mut(&self, position: ChunkPosition) -> Option<RwLockWriteGuard<'_, Chunk>> {
        self.chunks.get(&position).map(MtResource::get_mut)
    }

    /// Retrieves a shared handle to the chunk at the specified position.
    ///
    /// The handle outlives the grid guard it was taken under, so holders must
    /// not assume the chunk is still registered later.
    pub fn get_chunk_at(&self, position: ChunkPosition) -> Option<MtResource<Chunk>> {
        self.chunks.get(&position).cloned()
    }

    pub fn contains(&self, position: ChunkPosition) -> bool {
        self.chunks.contains_key(&position)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Positions of every loaded chunk, in no particular order.
    pub fn positions(&self) -> impl Iterator<Item = ChunkPosition> + '_ {
        self.chunks.keys().copied()
    }

    /// Every column with at least one loaded chunk.
    pub fn columns(&self) -> impl Iterator<Item = ColumnPosition> + '_ {
        self.columns.keys().copied()
    }

    /// Loaded chunk layers of a column, highest first.
    pub fn column_layers(&self, column: ColumnPosition) -> impl Iterator<Item = i32> + '_ {
        self.columns
            .get(&column)
            .into_iter()
            .flat_map(|layers| layers.iter().rev().copied())
    }

    pub fn height(&self) -> Option<WorldHeight> {
        self.height
    }

    /// Runs `f` on each loaded chunk of `region`, locking one chunk at a time.
    /// Positions that are not loaded are skipped.
    ///
    /// # Returns
    /// The number of chunks visited.
    pub fn for_each_mut<I, F>(&self, region: I, mut f: F) -> usize
    where
        I: IntoIterator<Item = ChunkPosition>,
        F: FnMut(&mut Chunk),
    {
        let mut visited = 0;
        for position in region {
            if let Some(mut chunk) = self.get_mut(position) {
                f(&mut chunk);
                visited += 1;
            }
        }
        visited
    }

    /// The block at a world block coordinate, if its chunk is loaded.
    pub fn block_at(&self, world: Point3<i32>) -> Option<Block> {
        let address = BlockAddress::from_world(world);
        self.get(address.chunk).map(|chunk| chunk.block_at(address.block))
    }

    /// The block at a chunk-local address, if its chunk is loaded.
    pub fn block_at_address(&self, address: BlockAddress) -> Option<Block> {
        self.get(address.chunk).map(|chunk| chunk.block_at(address.block))
    }

    /// Solidity at a world block coordinate. Unloaded space is not solid.
    pub fn is_solid_at(&self, world: Point3<i32>) -> bool {
        let address = BlockAddress::from_world(world);
        self.get(address.chunk)
            .is_some_and(|chunk| chunk.is_block_solid(address.block))
    }

    /// Sets the block type at a world block coordinate.
    ///
    /// # Returns
    /// The previous block, or `None` when the chunk is not loaded (nothing changes).
    pub fn set_block_type_at(&self, world: Point3<i32>, block_type: BlockType) -> Option<Block> {
        let address = BlockAddress::from_world(world);
        self.get_mut(address.chunk)
            .map(|mut chunk| chunk.set_block_type(address.block, block_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_is_initialised_by_the_first_chunk_and_only_grows() {
        let mut world = World::new();
        assert!(world.height().is_none());

        world.insert(Chunk::empty(ChunkPosition::new(0, 1, 0)));
        assert_eq!(world.height(), Some(WorldHeight { min_y: 16, max_y: 31 }));

        world.insert(Chunk::empty(ChunkPosition::new(5, -2, 3)));
        assert_eq!(world.height(), Some(WorldHeight { min_y: -32, max_y: 31 }));

        world.remove(ChunkPosition::new(5, -2, 3));
        assert_eq!(world.height(), Some(WorldHeight { min_y: -32, max_y: 31 }));
    }

    #[test]
    fn insert_replaces_existing_chunks() {
        let mut world = World::new();
        let position = ChunkPosition::new(0, 0, 0);
        assert!(world.insert(Chunk::empty(position)).is_none());

        let mut replacement = Chunk::empty(position);
        replacement.set_block_type(
            crate::engine_state::voxels::chunk::BlockPosition::new(0, 0, 0).unwrap(),
            BlockType::STONE,
        );
        assert!(world.insert(replacement).is_some());
        assert_eq!(world.len(), 1);
        assert!(world.is_solid_at(Point3::new(0, 0, 0)));
    }

    #[test]
    fn missing_chunks_are_absent_not_errors() {
        let world = World::new();
        assert!(world.get(ChunkPosition::new(0, 0, 0)).is_none());
        assert!(world.get_mut(ChunkPosition::new(0, 0, 0)).is_none());
        assert!(world.block_at(Point3::new(3, 3, 3)).is_none());
        assert!(!world.is_solid_at(Point3::new(3, 3, 3)));
        assert!(world.set_block_type_at(Point3::new(3, 3, 3), BlockType::DIRT).is_none());
    }

    #[test]
    fn column_layers_are_listed_top_down() {
        let mut world = World::new();
        for y in [-1, 2, 0] {
            world.insert(Chunk::empty(ChunkPosition::new(4, y, 4)));
        }
        world.insert(Chunk::empty(ChunkPosition::new(5, 7, 4)));
        let layers: Vec<_> = world.column_layers(ColumnPosition::new(4, 4)).collect();
        assert_eq!(layers, vec![2, 0, -1]);
        assert_eq!(world.columns().count(), 2);
    }

    #[test]
    fn for_each_mut_skips_unloaded_positions() {
        let mut world = World::new();
        world.insert(Chunk::empty(ChunkPosition::new(0, 0, 0)));
        world.insert(Chunk::empty(ChunkPosition::new(1, 0, 0)));
        let visited = world.for_each_mut(
            [
                ChunkPosition::new(0, 0, 0),
                ChunkPosition::new(1, 0, 0),
                ChunkPosition::new(9, 9, 9),
            ],
            |chunk| chunk.triangle_count = 7,
        );
        assert_eq!(visited, 2);
        assert_eq!(world.get(ChunkPosition::new(1, 0, 0)).unwrap().triangle_count, 7);
    }

    #[test]
    fn world_edits_land_in_the_right_chunk() {
        let mut world = World::new();
        world.insert(Chunk::empty(ChunkPosition::new(-1, 0, 0)));
        world.set_block_type_at(Point3::new(-1, 2, 3), BlockType::WOOD);
        let chunk = world.get(ChunkPosition::new(-1, 0, 0)).unwrap();
        assert_eq!(chunk.solid_block_count(), 1);
        let (position, block) = chunk.solid_blocks().next().unwrap();
        assert_eq!((position.x(), position.y(), position.z()), (15, 2, 3));
        assert_eq!(block.block_type, BlockType::WOOD as u8);
    }
}
