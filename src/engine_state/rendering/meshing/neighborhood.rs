//! Padded snapshot of a chunk and the one-block shell around it.
//!
//! Face culling, ambient occlusion and smooth lighting all look one block past
//! the chunk border. Instead of resolving every such lookup through the world,
//! the mesh builder copies the solid flags and light levels of the chunk and
//! the adjacent layers of its 26 neighbours into one `(CHUNK_DIMENSION + 2)³`
//! array, locking each source chunk once, one at a time.

use std::ops::Range;

use cgmath::Vector3;

use crate::engine_state::voxels::chunk::{BlockPosition, ChunkPosition, CHUNK_DIMENSION};
use crate::engine_state::voxels::world::World;

/// Edge length of the padded snapshot.
pub const PADDED_DIMENSION: i32 = CHUNK_DIMENSION + 2;

/// What the mesh builder needs to know about one cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Sample {
    /// False when the cell's chunk is not loaded.
    pub loaded: bool,
    pub solid: bool,
    /// `max(block light, sunlight)`; 0 for unloaded cells.
    pub light: u8,
}

/// Samples for local coordinates `-1..=CHUNK_DIMENSION` on every axis.
pub struct Neighborhood {
    samples: Vec<Sample>,
}

/// Chunk-relative coordinates covered by the neighbour `d` chunks away on one axis.
fn axis_range(d: i32) -> Range<i32> {
    match d {
        -1 => -1..0,
        0 => 0..CHUNK_DIMENSION,
        _ => CHUNK_DIMENSION..CHUNK_DIMENSION + 1,
    }
}

fn padded_index(x: i32, y: i32, z: i32) -> usize {
    ((x + 1) + (y + 1) * PADDED_DIMENSION + (z + 1) * PADDED_DIMENSION * PADDED_DIMENSION) as usize
}

impl Neighborhood {
    /// Copies the shell around `center` out of the world.
    ///
    /// Missing neighbours leave their cells as unloaded samples.
    pub fn capture(world: &World, center: ChunkPosition) -> Self {
        let mut samples = vec![Sample::default(); (PADDED_DIMENSION * PADDED_DIMENSION * PADDED_DIMENSION) as usize];

        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let Some(chunk) = world.get(center.offset(Vector3::new(dx, dy, dz))) else {
                        continue;
                    };

                    for z in axis_range(dz) {
                        for y in axis_range(dy) {
                            for x in axis_range(dx) {
                                let local = BlockPosition::new(
                                    x - dx * CHUNK_DIMENSION,
                                    y - dy * CHUNK_DIMENSION,
                                    z - dz * CHUNK_DIMENSION,
                                );
                                let Some(local) = local else {
                                    continue;
                                };
                                let block = chunk.block_at(local);
                                samples[padded_index(x, y, z)] = Sample {
                                    loaded: true,
                                    solid: block.is_solid(),
                                    light: block.light_level(),
                                };
                            }
                        }
                    }
                }
            }
        }

        Neighborhood { samples }
    }

    /// The sample at a chunk-relative coordinate. Coordinates outside the
    /// padded range read as unloaded.
    pub fn sample(&self, local: Vector3<i32>) -> Sample {
        let range = -1..=CHUNK_DIMENSION;
        if range.contains(&local.x) && range.contains(&local.y) && range.contains(&local.z) {
            self.samples[padded_index(local.x, local.y, local.z)]
        } else {
            Sample::default()
        }
    }

    /// Whether a face looking into `local` is hidden. Unloaded cells hide
    /// faces, so chunk borders next to ungenerated space stay closed.
    pub fn occludes_face(&self, local: Vector3<i32>) -> bool {
        let sample = self.sample(local);
        !sample.loaded || sample.solid
    }

    /// Solidity for ambient occlusion. Unloaded cells are open.
    pub fn is_solid(&self, local: Vector3<i32>) -> bool {
        let sample = self.sample(local);
        sample.loaded && sample.solid
    }
}
