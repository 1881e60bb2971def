//! # Terrain Generation
//!
//! A terrain generator turns a chunk position into that chunk's initial blocks.
//! Generators are pure: the same position and seed always give the same blocks,
//! and a generator never looks at the world or at other chunks. That lets the
//! streaming workers run any number of them in parallel without ordering.
//!
//! Every generated chunk is unlit; lighting is the light engine's job once the
//! chunk is registered with the world.
//!
//! Available strategies (selected by [`GenerationMethod`]):
//! - Fractal noise heightmap with caves, see [`noise_terrain`]
//! - A flat plain
//! - Empty chunks (all blocks air)
//! - Solid chunks (all blocks filled)
//! - Checkerboard pattern for testing
//! - Seeded sparse random blocks

use std::sync::Arc;

use crate::config::{GenerationMethod, WorldConfig};
use crate::engine_state::voxels::block::block_type::BlockType;
use crate::engine_state::voxels::chunk::{Chunk, ChunkBuilder, ChunkPosition, CHUNK_DIMENSION, CHUNK_PLANE_SIZE, CHUNK_SIZE};

pub mod noise_terrain;

pub use noise_terrain::NoiseTerrainGenerator;

/// Deterministic chunk-position → block-grid function.
pub trait TerrainGenerator: Send + Sync {
    /// Produces the unlit chunk at `position`.
    fn generate(&self, position: ChunkPosition) -> Chunk;
}

/// Builds the generator selected in the world configuration.
pub fn create_generator(config: &WorldConfig) -> Arc<dyn TerrainGenerator> {
    match config.generation {
        GenerationMethod::Noise => Arc::new(NoiseTerrainGenerator::new(config)),
        GenerationMethod::Flat => Arc::new(FlatTerrainGenerator::new(config.flat_height)),
        GenerationMethod::Empty => Arc::new(EmptyTerrainGenerator),
        GenerationMethod::Solid => Arc::new(SolidTerrainGenerator),
        GenerationMethod::Checkerboard => Arc::new(CheckerboardTerrainGenerator),
        GenerationMethod::Random => Arc::new(RandomTerrainGenerator::new(config.seed)),
    }
}

/// A flat plain: grass at `height`, dirt everywhere below it.
#[derive(Debug, Clone, Copy)]
pub struct FlatTerrainGenerator {
    height: i32,
}

impl FlatTerrainGenerator {
    pub fn new(height: i32) -> Self {
        Self { height }
    }
}

impl TerrainGenerator for FlatTerrainGenerator {
    fn generate(&self, position: ChunkPosition) -> Chunk {
        let mut cci = ChunkBuilder::new(position);
        let origin_y = position.origin().y;

        for _ in 0..CHUNK_DIMENSION {
            for j in 0..CHUNK_DIMENSION {
                let world_y = origin_y + j;
                let block_type = if world_y > self.height {
                    BlockType::AIR
                } else if world_y == self.height {
                    BlockType::GRASS
                } else {
                    BlockType::DIRT
                };
                for _ in 0..CHUNK_DIMENSION {
                    cci.push_block_type(block_type);
                }
            }
        }

        cci.return_chunk()
    }
}

/// Completely empty chunks (all blocks are air).
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyTerrainGenerator;

impl TerrainGenerator for EmptyTerrainGenerator {
    fn generate(&self, position: ChunkPosition) -> Chunk {
        Chunk::empty(position)
    }
}

/// Chunks filled with dirt.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolidTerrainGenerator;

impl TerrainGenerator for SolidTerrainGenerator {
    fn generate(&self, position: ChunkPosition) -> Chunk {
        let mut cci = ChunkBuilder::new(position);
        for _ in 0..CHUNK_SIZE {
            cci.push_block_type(BlockType::DIRT);
        }
        cci.return_chunk()
    }
}

/// A 3D checkerboard of dirt and air.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckerboardTerrainGenerator;

impl TerrainGenerator for CheckerboardTerrainGenerator {
    fn generate(&self, position: ChunkPosition) -> Chunk {
        let mut push_air = false;

        let mut cci = ChunkBuilder::new(position);
        for i in 0..CHUNK_SIZE {
            if push_air {
                cci.push_block_type(BlockType::AIR);
            } else {
                cci.push_block_type(BlockType::DIRT);
            }

            push_air = !push_air;

            if (i + 1) % CHUNK_DIMENSION == 0 {
                push_air = !push_air
            }

            if (i + 1) % CHUNK_PLANE_SIZE == 0 {
                push_air = !push_air
            }
        }

        cci.return_chunk()
    }
}

/// Sparse random dirt. The random stream is seeded from the world seed and
/// the chunk position, so regenerating a chunk gives the same blocks.
#[derive(Debug, Clone, Copy)]
pub struct RandomTerrainGenerator {
    seed: u32,
}

/// Fraction of cells left as air.
const RANDOM_SPARSENESS: f64 = 0.9;

impl RandomTerrainGenerator {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    fn chunk_seed(&self, position: ChunkPosition) -> u64 {
        (position.x as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ (position.y as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
            ^ (position.z as u64).wrapping_mul(0x1656_67B1_9E37_79F9)
            ^ self.seed as u64
    }
}

impl TerrainGenerator for RandomTerrainGenerator {
    fn generate(&self, position: ChunkPosition) -> Chunk {
        let mut rng = fastrand::Rng::with_seed(self.chunk_seed(position));
        let mut cci = ChunkBuilder::new(position);

        for _ in 0..CHUNK_SIZE {
            if rng.f64() < RANDOM_SPARSENESS {
                cci.push_block_type(BlockType::AIR);
            } else {
                cci.push_block_type(BlockType::DIRT);
            }
        }

        cci.return_chunk()
    }
}
