//! Breadth-first light flood fill and its inverse.
//!
//! Both walks run over `BlockAddress` nodes and cross chunk borders through
//! [`BlockAddress::neighbor`]. A neighbour in a chunk that is not loaded is
//! never visited; the border behaves like an opaque wall.
//!
//! Only one chunk guard is held at a time. The caller holds the world's grid
//! guard (`&World`) for the duration of the walk.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::engine_state::voxels::block::block_side::BlockSide;
use crate::engine_state::voxels::block::{LightChannel, MAX_LIGHT};
use crate::engine_state::voxels::chunk::{BlockAddress, ChunkPosition};
use crate::engine_state::voxels::world::World;

/// Level a neighbour receives from a node at `level` across `side`.
///
/// Light loses one level per hop, except direct sunlight falling straight
/// down, which keeps full strength.
pub fn attenuate(channel: LightChannel, side: BlockSide, level: u8) -> u8 {
    if channel == LightChannel::Sun && side == BlockSide::BOTTOM && level == MAX_LIGHT {
        MAX_LIGHT
    } else {
        level.saturating_sub(1)
    }
}

fn light_at(world: &World, address: BlockAddress, channel: LightChannel) -> Option<u8> {
    world
        .get(address.chunk)
        .map(|chunk| chunk.light(address.block, channel))
}

/// Floods light outwards from `seeds` on one channel.
///
/// Seeds must already hold their light. A neighbour is raised to the
/// attenuated level when it is transparent and currently darker; nothing else
/// is written. Each block is expanded once per pass at the level it holds when
/// dequeued, and again only if a later hop raises it further.
///
/// # Arguments
/// * `touched` - receives every chunk whose light changed
///
/// # Returns
/// The number of light writes performed.
pub fn propagate<I>(world: &World, channel: LightChannel, seeds: I, touched: &mut HashSet<ChunkPosition>) -> usize
where
    I: IntoIterator<Item = BlockAddress>,
{
    let mut queue: VecDeque<BlockAddress> = seeds.into_iter().collect();
    let mut visited: HashMap<BlockAddress, u8> = HashMap::with_capacity(queue.len());
    let mut writes = 0;

    while let Some(node) = queue.pop_front() {
        let Some(level) = light_at(world, node, channel) else {
            continue;
        };
        if visited.get(&node).is_some_and(|&seen| seen >= level) {
            continue;
        }
        visited.insert(node, level);

        if level <= 1 {
            continue;
        }

        for side in BlockSide::all() {
            let neighbor = node.neighbor(side);
            let candidate = attenuate(channel, side, level);

            let raised = match world.get_mut(neighbor.chunk) {
                Some(mut chunk) => {
                    let block = chunk.block_at(neighbor.block);
                    if block.is_transparent() && block.light(channel) < candidate {
                        chunk.set_light(neighbor.block, channel, candidate);
                        true
                    } else {
                        false
                    }
                }
                None => false,
            };

            if raised {
                writes += 1;
                touched.insert(neighbor.chunk);
                queue.push_back(neighbor);
            }
        }
    }

    writes
}

/// Darkens the light that flowed out of `origin` before it held `level`.
///
/// `origin` itself must already be cleared. Neighbours that were lit by it
/// (dimmer than `level`, or part of the same full-strength sun shaft) are set
/// to 0 and walked in turn. Neighbours at or above the level they would have
/// received from the removed light are lit independently; they are returned
/// so the caller can refill the darkened region from them.
///
/// # Returns
/// The refill seeds found at the edge of the darkened region.
pub fn remove_light(
    world: &World,
    channel: LightChannel,
    origin: BlockAddress,
    level: u8,
    touched: &mut HashSet<ChunkPosition>,
) -> Vec<BlockAddress> {
    let mut queue = VecDeque::from([(origin, level)]);
    let mut reseeds = Vec::new();

    while let Some((node, level)) = queue.pop_front() {
        for side in BlockSide::all() {
            let neighbor = node.neighbor(side);

            let Some(mut chunk) = world.get_mut(neighbor.chunk) else {
                continue;
            };
            let neighbor_level = chunk.light(neighbor.block, channel);
            if neighbor_level == 0 {
                continue;
            }

            let emission = chunk.block_at(neighbor.block).properties().light_emission;
            let fed_by_node = neighbor_level < level
                || (attenuate(channel, side, level) == MAX_LIGHT && neighbor_level == MAX_LIGHT);

            if fed_by_node && !(channel == LightChannel::Block && emission > 0) {
                chunk.set_light(neighbor.block, channel, 0);
                touched.insert(neighbor.chunk);
                queue.push_back((neighbor, neighbor_level));
            } else {
                reseeds.push(neighbor);
            }
        }
    }

    reseeds
}
