//! Fractal noise terrain.
//!
//! The surface height of each world column comes from two octaves of Perlin
//! fBm (lacunarity 1.5, persistence 0.5) scaled by the configured amplitude and
//! clamped to ±128 blocks. The top block of a column is grass, the next few are
//! dirt and everything deeper is stone. Below world y 0 a 3D noise field carves
//! caves wherever its sample exceeds the cave threshold.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::config::WorldConfig;
use crate::engine_state::voxels::block::block_type::BlockType;
use crate::engine_state::voxels::chunk::{Chunk, ChunkBuilder, ChunkPosition, CHUNK_DIMENSION};

use super::TerrainGenerator;

/// Surface heights are clamped to this many blocks above or below y 0.
pub const MAX_SURFACE_HEIGHT: i32 = 128;
/// Depth of the dirt layer under the grass.
const DIRT_DEPTH: i32 = 4;
/// Amplitude of the cave noise before clamping to [-1, 1].
const CAVE_AMPLITUDE: f64 = 2.0;

/// Heightmap terrain with caves.
pub struct NoiseTerrainGenerator {
    height_noise: Fbm<Perlin>,
    cave_noise: Perlin,
    amplitude: f64,
    scale: f64,
    cave_threshold: f64,
    cave_scale: f64,
}

impl NoiseTerrainGenerator {
    pub fn new(config: &WorldConfig) -> Self {
        let height_noise = Fbm::<Perlin>::new(config.seed)
            .set_octaves(2)
            .set_lacunarity(1.5)
            .set_persistence(0.5);

        NoiseTerrainGenerator {
            height_noise,
            cave_noise: Perlin::new(config.seed.wrapping_add(1)),
            amplitude: config.noise_amplitude,
            scale: config.noise_scale.max(f64::EPSILON),
            cave_threshold: config.cave_threshold,
            cave_scale: config.cave_scale.max(f64::EPSILON),
        }
    }

    /// Surface height of the world column `(x, z)`.
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        let sample = self
            .height_noise
            .get([x as f64 / self.scale, z as f64 / self.scale]);
        ((sample * self.amplitude).round() as i32).clamp(-MAX_SURFACE_HEIGHT, MAX_SURFACE_HEIGHT)
    }

    fn is_cave(&self, x: i32, y: i32, z: i32) -> bool {
        let sample = self.cave_noise.get([
            x as f64 / self.cave_scale,
            y as f64 / self.cave_scale,
            z as f64 / self.cave_scale,
        ]);
        (sample * CAVE_AMPLITUDE).clamp(-1.0, 1.0) > self.cave_threshold
    }

    fn block_type_at(&self, x: i32, y: i32, z: i32, surface: i32) -> BlockType {
        if y > surface {
            return BlockType::AIR;
        }
        if y < 0 && self.is_cave(x, y, z) {
            return BlockType::AIR;
        }
        if y == surface {
            BlockType::GRASS
        } else if y > surface - DIRT_DEPTH {
            BlockType::DIRT
        } else {
            BlockType::STONE
        }
    }
}

impl TerrainGenerator for NoiseTerrainGenerator {
    fn generate(&self, position: ChunkPosition) -> Chunk {
        let origin = position.origin();
        let dimension = CHUNK_DIMENSION as usize;

        let mut surface = [[0i32; CHUNK_DIMENSION as usize]; CHUNK_DIMENSION as usize];
        for (k, row) in surface.iter_mut().enumerate() {
            for (i, height) in row.iter_mut().enumerate() {
                *height = self.surface_height(origin.x + i as i32, origin.z + k as i32);
            }
        }

        let mut cci = ChunkBuilder::new(position);
        for k in 0..dimension {
            for j in 0..dimension {
                for i in 0..dimension {
                    let x = origin.x + i as i32;
                    let y = origin.y + j as i32;
                    let z = origin.z + k as i32;
                    cci.push_block_type(self.block_type_at(x, y, z, surface[k][i]));
                }
            }
        }

        cci.return_chunk()
    }
}
