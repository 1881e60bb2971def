//! Block edits.
//!
//! An edit writes one block, then relights around it. The returned set is
//! every chunk whose geometry or light may have changed; it is what the caller
//! hands to the mesh builder.

use std::collections::HashSet;

use cgmath::Point3;
use log::info;

use crate::engine_state::voxels::block::block_type::BlockType;
use crate::engine_state::voxels::chunk::ChunkPosition;
use crate::engine_state::voxels::lighting;
use crate::engine_state::voxels::world::World;

/// Clears a solid block to air.
///
/// # Returns
/// The chunks to remesh, or `None` when the block is air or its chunk is not
/// loaded (nothing changes).
pub fn break_block(world: &World, position: Point3<i32>) -> Option<HashSet<ChunkPosition>> {
    if !world.is_solid_at(position) {
        return None;
    }
    let previous = world.set_block_type_at(position, BlockType::AIR)?;
    let touched = lighting::relight_edit(world, position, previous);

    info!(
        "Broke block {} at {:?}, remeshing {} chunks",
        previous.block_type,
        position,
        touched.len()
    );
    Some(touched)
}

/// Writes `block_type` into a non-solid cell.
///
/// # Returns
/// The chunks to remesh, or `None` when the cell is already solid or its
/// chunk is not loaded.
pub fn place_block(world: &World, position: Point3<i32>, block_type: BlockType) -> Option<HashSet<ChunkPosition>> {
    let current = world.block_at(position)?;
    if current.is_solid() {
        return None;
    }
    let previous = world.set_block_type_at(position, block_type)?;
    let touched = lighting::relight_edit(world, position, previous);

    info!(
        "Placed {:?} at {:?}, remeshing {} chunks",
        block_type,
        position,
        touched.len()
    );
    Some(touched)
}
