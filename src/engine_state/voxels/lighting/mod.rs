//! # Light Propagation
//!
//! Every transparent block carries two light values: sunlight, flooded from
//! sky-exposed seeds, and block light, flooded from emitters such as lamps.
//! Both use the same breadth-first fill ([`propagation::propagate`]); the
//! channel only decides where the seeds come from and whether the downward
//! full-strength rule applies.
//!
//! ## Passes
//!
//! * [`relight_world`]: clears all light and rebuilds it from scratch. The
//!   result depends only on the block grid, so running it twice gives the
//!   same values.
//! * [`relight_edit`]: after a single block changed, darkens whatever the old
//!   block let through, re-seeds the block column through the edit and refills
//!   from the edit's neighbours.
//! * [`light_new_chunks`]: lights freshly registered chunks, continues the
//!   light of their already-lit neighbours into them and darkens sun shafts
//!   they now cover.
//!
//! Every pass reports the chunks whose light changed, which is the set that
//! needs remeshing.
//!
//! ## Locking
//!
//! Passes take `&World`, so the caller holds a grid guard throughout and no
//! chunk can be replaced mid-pass. Inside a pass at most one chunk guard is
//! held at any moment.
//!
//! Two passes over the same chunks must not run at once: a darkening pass can
//! clear cells another pass has already read as seeds, leaving light with no
//! source. Edit relights run under the grid read guard on the main thread,
//! and [`light_new_chunks`] runs under the grid write guard that registered
//! the chunks, so the two are serialized.

use std::collections::HashSet;

use cgmath::Point3;
use log::{debug, trace};

use crate::engine_state::voxels::block::block_side::BlockSide;
use crate::engine_state::voxels::block::{Block, LightChannel, MAX_LIGHT};
use crate::engine_state::voxels::chunk::{BlockAddress, ChunkPosition, ColumnPosition};
use crate::engine_state::voxels::world::World;

pub mod propagation;
pub mod seeding;

pub use propagation::{propagate, remove_light};

/// Outcome of a light pass.
#[derive(Debug, Default, Clone)]
pub struct LightUpdate {
    /// Chunks whose light values changed.
    pub touched: HashSet<ChunkPosition>,
    /// Seeds the fill started from.
    pub seeded: usize,
    /// Light writes made by the fill.
    pub propagated: usize,
}

/// Rebuilds both light channels of every loaded chunk.
pub fn relight_world(world: &World) -> LightUpdate {
    let positions: Vec<ChunkPosition> = world.positions().collect();
    world.for_each_mut(positions.iter().copied(), |chunk| {
        chunk.clear_light(LightChannel::Sun);
        chunk.clear_light(LightChannel::Block);
    });

    let mut update = LightUpdate {
        touched: positions.iter().copied().collect(),
        ..LightUpdate::default()
    };

    let columns: Vec<ColumnPosition> = world.columns().collect();
    let mut sun_seeds = Vec::new();
    for column in columns {
        sun_seeds.extend(seeding::seed_sky(world, column, &mut update.touched));
    }
    update.seeded += sun_seeds.len();
    update.propagated += propagate(world, LightChannel::Sun, sun_seeds, &mut update.touched);

    let block_seeds: Vec<BlockAddress> = positions
        .iter()
        .flat_map(|position| seeding::seed_emitters(world, *position))
        .collect();
    update.seeded += block_seeds.len();
    update.propagated += propagate(world, LightChannel::Block, block_seeds, &mut update.touched);

    debug!(
        "Relit {} chunks from {} seeds ({} fill writes)",
        positions.len(),
        update.seeded,
        update.propagated
    );
    update
}

/// Relights around a block whose type just changed.
///
/// # Arguments
/// * `position` - world coordinate of the edited block
/// * `previous` - the block that was there before the edit
///
/// # Returns
/// The chunks to remesh: the edited chunk, every loaded chunk across a face
/// of the edited block, and every chunk whose light changed.
pub fn relight_edit(world: &World, position: Point3<i32>, previous: Block) -> HashSet<ChunkPosition> {
    let origin = BlockAddress::from_world(position);
    let mut touched = HashSet::from([origin.chunk]);

    if origin.block.is_on_border() {
        for side in BlockSide::all() {
            let neighbor = origin.neighbor(side).chunk;
            if neighbor != origin.chunk && world.contains(neighbor) {
                touched.insert(neighbor);
            }
        }
    }

    for channel in [LightChannel::Sun, LightChannel::Block] {
        let mut seeds = Vec::new();

        let previous_level = previous.light(channel);
        if previous_level > 0 {
            seeds.extend(remove_light(world, channel, origin, previous_level, &mut touched));
        }

        match channel {
            LightChannel::Sun => seeds.extend(seeding::seed_sky_column(world, origin, &mut touched)),
            LightChannel::Block => {
                let emits = world
                    .block_at_address(origin)
                    .is_some_and(|block| block.properties().light_emission > 0);
                if emits {
                    seeds.push(origin);
                }
            }
        }
        seeds.extend(seeding::seed_neighbors(world, origin, channel));

        let writes = propagate(world, channel, seeds, &mut touched);
        trace!("Edit at {:?}: {:?} fill wrote {} blocks", position, channel, writes);
    }

    touched
}

/// Lights chunks that were just registered with the world.
///
/// Sky seeds are collected over the columns of `positions`, emitters inside
/// them are reset, and lit blocks of loaded neighbours facing into them are
/// used as extra seeds so existing light continues across the new borders.
/// A new chunk can roof over an already lit layer of its column. The sun
/// shafts entering that layer from above are darkened first and refilled by
/// the same pass. Call it under the grid write guard that inserted the chunks.
pub fn light_new_chunks(world: &World, positions: &[ChunkPosition]) -> LightUpdate {
    let batch: HashSet<ChunkPosition> = positions.iter().copied().collect();
    let mut update = LightUpdate::default();

    let mut sun_seeds = darken_roofed_layers(world, positions, &batch, &mut update.touched);

    let columns: HashSet<ColumnPosition> = positions.iter().map(|position| position.column()).collect();
    for column in columns {
        sun_seeds.extend(seeding::seed_sky(world, column, &mut update.touched));
    }
    let mut block_seeds = Vec::new();
    for position in positions {
        block_seeds.extend(seeding::seed_emitters(world, *position));
        sun_seeds.extend(seeding::seed_chunk_boundary(world, *position, LightChannel::Sun, &batch));
        block_seeds.extend(seeding::seed_chunk_boundary(world, *position, LightChannel::Block, &batch));
    }

    update.seeded = sun_seeds.len() + block_seeds.len();
    update.propagated += propagate(world, LightChannel::Sun, sun_seeds, &mut update.touched);
    update.propagated += propagate(world, LightChannel::Block, block_seeds, &mut update.touched);
    update.touched.extend(positions.iter().copied());

    update
}

/// Clears the full-strength sunlight on the top face of the next loaded layer
/// below each new chunk, together with everything it fed.
///
/// # Returns
/// The lit blocks bordering the darkened region, for the refill.
fn darken_roofed_layers(
    world: &World,
    positions: &[ChunkPosition],
    batch: &HashSet<ChunkPosition>,
    touched: &mut HashSet<ChunkPosition>,
) -> Vec<BlockAddress> {
    let mut reseeds = Vec::new();

    for position in positions {
        let column = position.column();
        let Some(below) = world
            .column_layers(column)
            .find(|&layer| layer < position.y)
            .map(|layer| column.chunk_at(layer))
        else {
            continue;
        };
        if batch.contains(&below) {
            continue;
        }

        for block_position in seeding::face_positions(BlockSide::TOP) {
            let cleared = match world.get_mut(below) {
                Some(mut chunk) if chunk.light(block_position, LightChannel::Sun) == MAX_LIGHT => {
                    chunk.set_light(block_position, LightChannel::Sun, 0);
                    true
                }
                _ => false,
            };
            if cleared {
                touched.insert(below);
                let origin = BlockAddress::new(below, block_position);
                reseeds.extend(remove_light(world, LightChannel::Sun, origin, MAX_LIGHT, touched));
            }
        }
    }

    reseeds
}
