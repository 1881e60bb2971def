//! # Chunk Iteration Module
//!
//! Iterator over the solid blocks of a chunk. It walks the set bits of the
//! chunk's `solid_array`, so air costs nothing beyond the bit scan.

use bitvec::slice::IterOnes;

use crate::engine_state::voxels::block::Block;

use super::{BlockPosition, Chunk};

/// An iterator over all solid blocks in a chunk, in storage order.
pub struct ChunkBlockIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a Chunk,
    /// Remaining set bits of the solid array
    solid_offsets: IterOnes<'a, usize, bitvec::order::Lsb0>,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates a new `ChunkBlockIterator` for the given chunk.
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        ChunkBlockIterator {
            chunk_ref,
            solid_offsets: chunk_ref.solid_array.iter_ones(),
        }
    }
}

impl<'a> Iterator for ChunkBlockIterator<'a> {
    type Item = (BlockPosition, Block);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.solid_offsets.next()?;
        Some((BlockPosition::from_index(index), self.chunk_ref.blocks[index]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;
    use crate::engine_state::voxels::chunk::ChunkPosition;

    #[test]
    fn yields_only_solid_blocks_in_order() {
        let mut chunk = Chunk::empty(ChunkPosition::new(0, 0, 0));
        let first = BlockPosition::new(3, 0, 0).unwrap();
        let second = BlockPosition::new(0, 1, 0).unwrap();
        chunk.set_block_type(second, BlockType::STONE);
        chunk.set_block_type(first, BlockType::DIRT);

        let solids: Vec<_> = chunk.solid_blocks().collect();
        assert_eq!(solids.len(), 2);
        assert_eq!(solids[0].0, first);
        assert_eq!(solids[0].1.block_type, BlockType::DIRT as u8);
        assert_eq!(solids[1].0, second);
    }
}
