//! # Chunk Creation Module
//!
//! Terrain generators fill chunks one block at a time in storage order. The
//! `ChunkBuilder` collects those blocks and hands back a finished [`Chunk`]
//! with its solid bits and light sources derived in one pass.

use crate::engine_state::voxels::block::{block_type::BlockType, Block};

use super::{BlockPosition, Chunk, ChunkPosition, CHUNK_SIZE};

/// A builder that fills a chunk in storage order (x fastest, then y, then z).
///
/// Blocks that are never pushed stay air, so a generator may stop early.
pub struct ChunkBuilder {
    /// The position of the chunk being created
    position: ChunkPosition,
    /// Blocks pushed so far
    blocks: Vec<Block>,
}

impl ChunkBuilder {
    /// Creates a new builder for the chunk at `position`.
    pub fn new(position: ChunkPosition) -> Self {
        ChunkBuilder {
            position,
            blocks: Vec::with_capacity(CHUNK_SIZE as usize),
        }
    }

    /// Local position the next pushed block will land on, or `None` once the
    /// chunk is full.
    pub fn next_position(&self) -> Option<BlockPosition> {
        (self.blocks.len() < CHUNK_SIZE as usize).then(|| BlockPosition::from_index(self.blocks.len()))
    }

    /// Adds an unlit block of `block_type` at the current position and advances.
    ///
    /// Pushes past the end of the chunk are ignored.
    pub fn push_block_type(&mut self, block_type: BlockType) {
        if self.blocks.len() < CHUNK_SIZE as usize {
            self.blocks.push(Block::new(block_type));
        }
    }

    /// Finalizes the chunk, padding any remaining cells with air.
    pub fn return_chunk(mut self) -> Chunk {
        self.blocks.resize(CHUNK_SIZE as usize, Block::air());
        Chunk::from_blocks(self.position, self.blocks.into_boxed_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_land_in_storage_order() {
        let mut builder = ChunkBuilder::new(ChunkPosition::new(0, 0, 0));
        assert_eq!(builder.next_position(), BlockPosition::new(0, 0, 0));
        builder.push_block_type(BlockType::DIRT);
        assert_eq!(builder.next_position(), BlockPosition::new(1, 0, 0));
        builder.push_block_type(BlockType::AIR);
        builder.push_block_type(BlockType::STONE);

        let chunk = builder.return_chunk();
        assert!(chunk.is_block_solid(BlockPosition::new(0, 0, 0).unwrap()));
        assert!(!chunk.is_block_solid(BlockPosition::new(1, 0, 0).unwrap()));
        assert!(chunk.is_block_solid(BlockPosition::new(2, 0, 0).unwrap()));
        assert_eq!(chunk.solid_block_count(), 2);
    }

    #[test]
    fn overfilled_builder_ignores_extra_blocks() {
        let mut builder = ChunkBuilder::new(ChunkPosition::new(0, 0, 0));
        for _ in 0..CHUNK_SIZE + 10 {
            builder.push_block_type(BlockType::DIRT);
        }
        assert!(builder.next_position().is_none());
        assert_eq!(builder.return_chunk().solid_block_count(), CHUNK_SIZE as usize);
    }
}
