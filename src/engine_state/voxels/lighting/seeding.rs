//! Seed collection for light passes.
//!
//! A seed is a block whose light value is already correct when the flood fill
//! starts. Seeding functions write those values (sky exposure, emitters) and
//! return the addresses for the fill to expand from.

use std::collections::HashSet;

use crate::engine_state::voxels::block::block_side::BlockSide;
use crate::engine_state::voxels::block::{LightChannel, MAX_LIGHT};
use crate::engine_state::voxels::chunk::{
    BlockAddress, BlockPosition, ChunkPosition, ColumnPosition, CHUNK_DIMENSION, CHUNK_PLANE_SIZE,
};
use crate::engine_state::voxels::world::World;

/// Seeds sunlight for every block column of a chunk column.
///
/// Each of the `CHUNK_DIMENSION²` block columns is scanned from the highest
/// loaded layer downwards. Transparent blocks get sunlight 15 until the first
/// solid block; the scan of that block column ends there. Layers that are not
/// loaded are skipped, so sky passes through them.
pub fn seed_sky(world: &World, column: ColumnPosition, touched: &mut HashSet<ChunkPosition>) -> Vec<BlockAddress> {
    let mut seeds = Vec::new();
    let mut blocked = vec![false; CHUNK_PLANE_SIZE as usize];

    for layer in world.column_layers(column) {
        let position = column.chunk_at(layer);
        let Some(mut chunk) = world.get_mut(position) else {
            continue;
        };

        for z in 0..CHUNK_DIMENSION {
            for x in 0..CHUNK_DIMENSION {
                let flag = &mut blocked[(x + z * CHUNK_DIMENSION) as usize];
                if *flag {
                    continue;
                }
                for y in (0..CHUNK_DIMENSION).rev() {
                    let Some(block_position) = BlockPosition::new(x, y, z) else {
                        continue;
                    };
                    if !chunk.block_at(block_position).is_transparent() {
                        *flag = true;
                        break;
                    }
                    if chunk.light(block_position, LightChannel::Sun) < MAX_LIGHT {
                        chunk.set_light(block_position, LightChannel::Sun, MAX_LIGHT);
                        touched.insert(position);
                    }
                    seeds.push(BlockAddress::new(position, block_position));
                }
            }
        }
    }

    seeds
}

/// Seeds sunlight for the single block column through `address`.
///
/// Same rule as [`seed_sky`], restricted to one `(x, z)`.
pub fn seed_sky_column(world: &World, address: BlockAddress, touched: &mut HashSet<ChunkPosition>) -> Vec<BlockAddress> {
    let mut seeds = Vec::new();
    let column = address.chunk.column();
    let (x, z) = (address.block.x(), address.block.z());

    'layers: for layer in world.column_layers(column) {
        let position = column.chunk_at(layer);
        let Some(mut chunk) = world.get_mut(position) else {
            continue;
        };

        for y in (0..CHUNK_DIMENSION).rev() {
            let Some(block_position) = BlockPosition::new(x, y, z) else {
                continue;
            };
            if !chunk.block_at(block_position).is_transparent() {
                break 'layers;
            }
            if chunk.light(block_position, LightChannel::Sun) < MAX_LIGHT {
                chunk.set_light(block_position, LightChannel::Sun, MAX_LIGHT);
                touched.insert(position);
            }
            seeds.push(BlockAddress::new(position, block_position));
        }
    }

    seeds
}

/// Resets every emitter of a chunk to its emission and returns them as
/// block-light seeds.
pub fn seed_emitters(world: &World, position: ChunkPosition) -> Vec<BlockAddress> {
    let Some(mut chunk) = world.get_mut(position) else {
        return Vec::new();
    };

    let sources = chunk.light_sources().to_vec();
    sources
        .into_iter()
        .map(|block_position| {
            let emission = chunk.block_at(block_position).properties().light_emission;
            chunk.set_light(block_position, LightChannel::Block, emission);
            BlockAddress::new(position, block_position)
        })
        .collect()
}

/// The lit face neighbours of `address` on one channel.
pub fn seed_neighbors(world: &World, address: BlockAddress, channel: LightChannel) -> Vec<BlockAddress> {
    BlockSide::all()
        .into_iter()
        .map(|side| address.neighbor(side))
        .filter(|neighbor| {
            world
                .block_at_address(*neighbor)
                .is_some_and(|block| block.light(channel) > 0)
        })
        .collect()
}

/// Lit blocks of already-loaded chunks that face into `position`.
///
/// Used when `position` has just been registered: light that reached the
/// boundary of its neighbours has to continue into it. Neighbours listed in
/// `exclude` (other chunks registered in the same batch) are skipped.
pub fn seed_chunk_boundary(
    world: &World,
    position: ChunkPosition,
    channel: LightChannel,
    exclude: &HashSet<ChunkPosition>,
) -> Vec<BlockAddress> {
    let mut seeds = Vec::new();

    for side in BlockSide::all() {
        let neighbor = position.offset(side.offset());
        if exclude.contains(&neighbor) {
            continue;
        }
        let Some(chunk) = world.get(neighbor) else {
            continue;
        };
        seeds.extend(
            face_positions(side.opposite())
                .filter(|block_position| chunk.light(*block_position, channel) > 1)
                .map(|block_position| BlockAddress::new(neighbor, block_position)),
        );
    }

    seeds
}

/// Local positions on one face of a chunk.
pub fn face_positions(side: BlockSide) -> impl Iterator<Item = BlockPosition> {
    let offset = side.offset();
    let fixed = |d: i32| if d > 0 { CHUNK_DIMENSION - 1 } else { 0 };

    (0..CHUNK_DIMENSION).flat_map(move |a| {
        (0..CHUNK_DIMENSION).filter_map(move |b| {
            let (x, y, z) = if offset.x != 0 {
                (fixed(offset.x), a, b)
            } else if offset.y != 0 {
                (a, fixed(offset.y), b)
            } else {
                (a, b, fixed(offset.z))
            };
            BlockPosition::new(x, y, z)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;
    use crate::engine_state::voxels::chunk::{Chunk, CHUNK_SIZE};
    use cgmath::Point3;

    #[test]
    fn sky_seeds_stop_at_the_first_solid_block() {
        let mut world = World::new();
        world.insert(Chunk::empty(ChunkPosition::new(0, 0, 0)));
        world.set_block_type_at(Point3::new(2, 10, 2), BlockType::STONE);

        let mut touched = HashSet::new();
        let seeds = seed_sky(&world, ColumnPosition::new(0, 0), &mut touched);
        assert_eq!(seeds.len(), CHUNK_SIZE as usize - 11);
        assert!(touched.contains(&ChunkPosition::new(0, 0, 0)));

        let light = |y| {
            world
                .block_at(Point3::new(2, y, 2))
                .unwrap()
                .light(LightChannel::Sun)
        };
        assert_eq!(light(11), 15);
        assert_eq!(light(10), 0);
        assert_eq!(light(9), 0);
    }

    #[test]
    fn sky_passes_through_missing_layers() {
        let mut world = World::new();
        world.insert(Chunk::empty(ChunkPosition::new(0, 2, 0)));
        world.insert(Chunk::empty(ChunkPosition::new(0, 0, 0)));

        let mut touched = HashSet::new();
        seed_sky(&world, ColumnPosition::new(0, 0), &mut touched);
        assert_eq!(touched.len(), 2);
        assert_eq!(
            world.block_at(Point3::new(0, 0, 0)).unwrap().light(LightChannel::Sun),
            15
        );
    }

    #[test]
    fn single_column_seed_is_limited_to_its_column() {
        let mut world = World::new();
        world.insert(Chunk::empty(ChunkPosition::new(0, 0, 0)));

        let mut touched = HashSet::new();
        let address = BlockAddress::from_world(Point3::new(4, 3, 5));
        let seeds = seed_sky_column(&world, address, &mut touched);
        assert_eq!(seeds.len(), CHUNK_DIMENSION as usize);
        assert!(seeds.iter().all(|seed| seed.block.x() == 4 && seed.block.z() == 5));
    }

    #[test]
    fn emitters_are_reset_to_their_emission() {
        let mut world = World::new();
        world.insert(Chunk::empty(ChunkPosition::new(0, 0, 0)));
        world.set_block_type_at(Point3::new(1, 1, 1), BlockType::LAMP);
        world
            .get_mut(ChunkPosition::new(0, 0, 0))
            .unwrap()
            .clear_light(LightChannel::Block);

        let seeds = seed_emitters(&world, ChunkPosition::new(0, 0, 0));
        assert_eq!(seeds, vec![BlockAddress::from_world(Point3::new(1, 1, 1))]);
        assert_eq!(world.block_at(Point3::new(1, 1, 1)).unwrap().block_light, 15);
    }

    #[test]
    fn face_positions_cover_one_layer() {
        let positions: Vec<_> = face_positions(BlockSide::RIGHT).collect();
        assert_eq!(positions.len(), CHUNK_PLANE_SIZE as usize);
        assert!(positions.iter().all(|p| p.x() == CHUNK_DIMENSION - 1));
        assert!(face_positions(BlockSide::BOTTOM).all(|p| p.y() == 0));
    }

    #[test]
    fn boundary_seeds_come_from_the_facing_layer() {
        let mut world = World::new();
        let lit = ChunkPosition::new(1, 0, 0);
        world.insert(Chunk::empty(lit));
        world.insert(Chunk::empty(ChunkPosition::new(0, 0, 0)));
        {
            let mut chunk = world.get_mut(lit).unwrap();
            chunk.set_light(BlockPosition::new(0, 3, 3).unwrap(), LightChannel::Sun, 15);
            chunk.set_light(BlockPosition::new(5, 3, 3).unwrap(), LightChannel::Sun, 15);
        }

        let seeds = seed_chunk_boundary(&world, ChunkPosition::new(0, 0, 0), LightChannel::Sun, &HashSet::new());
        assert_eq!(seeds, vec![BlockAddress::new(lit, BlockPosition::new(0, 3, 3).unwrap())]);
    }
}
