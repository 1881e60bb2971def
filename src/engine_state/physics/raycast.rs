//! Block picking along the view ray.
//!
//! The ray is walked cell by cell with the classic fast voxel traversal: per
//! axis, `t_max` is the ray parameter at which the next cell boundary is
//! crossed and `t_delta` the parameter step between boundaries. The segment
//! is parameterised over `0..=1`, so the walk ends once every `t_max` is past 1.

use std::collections::HashSet;

use cgmath::{InnerSpace, Point3, Vector3};

use crate::engine_state::voxels::block::block_type::BlockType;
use crate::engine_state::voxels::chunk::ChunkPosition;
use crate::engine_state::voxels::edit;
use crate::engine_state::voxels::world::World;

use super::aabb::Aabb;

/// Cap for `t_delta` on axes the ray barely moves along.
const MAX_T_DELTA: f32 = 1e7;

/// How far behind the eye the ray starts.
const START_PULLBACK: f32 = 0.1;

/// Block written by a place action.
pub const PLACED_BLOCK: BlockType = BlockType::DIRT;

/// Cells crossed by a ray segment, in traversal order, excluding the start cell.
#[derive(Debug, Clone)]
pub struct VoxelTraversal {
    cell: Point3<i32>,
    step: Vector3<i32>,
    t_max: Vector3<f32>,
    t_delta: Vector3<f32>,
}

fn frac_below(x: f32) -> f32 {
    x - x.floor()
}

fn frac_above(x: f32) -> f32 {
    1.0 - x + x.floor()
}

impl VoxelTraversal {
    /// Walks the segment `start..end`, where cell `c` covers `c..c + 1`.
    pub fn new(start: Point3<f32>, end: Point3<f32>) -> Self {
        let delta = end - start;
        let mut step = Vector3::new(0, 0, 0);
        let mut t_max = Vector3::new(MAX_T_DELTA, MAX_T_DELTA, MAX_T_DELTA);
        let mut t_delta = Vector3::new(MAX_T_DELTA, MAX_T_DELTA, MAX_T_DELTA);

        for axis in 0..3 {
            let d = delta[axis];
            if d == 0.0 {
                continue;
            }
            let sign = d.signum();
            step[axis] = sign as i32;
            t_delta[axis] = (sign / d).min(MAX_T_DELTA);
            t_max[axis] = if sign > 0.0 {
                t_delta[axis] * frac_above(start[axis])
            } else {
                t_delta[axis] * frac_below(start[axis])
            };
        }

        VoxelTraversal {
            cell: Point3::new(
                start.x.floor() as i32,
                start.y.floor() as i32,
                start.z.floor() as i32,
            ),
            step,
            t_max,
            t_delta,
        }
    }

    /// The cell the segment starts in.
    pub fn start_cell(&self) -> Point3<i32> {
        self.cell
    }
}

impl Iterator for VoxelTraversal {
    type Item = Point3<i32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.t_max.x > 1.0 && self.t_max.y > 1.0 && self.t_max.z > 1.0 {
            return None;
        }

        let axis = if self.t_max.x < self.t_max.y {
            if self.t_max.x < self.t_max.z {
                0
            } else {
                2
            }
        } else if self.t_max.y < self.t_max.z {
            1
        } else {
            2
        };

        self.cell[axis] += self.step[axis];
        self.t_max[axis] += self.t_delta[axis];
        Some(self.cell)
    }
}

/// The traversal for a player looking along `front` from `eye`.
///
/// Block `b` covers `b - 0.5..b + 0.5`, so shifting the ray by half a block
/// makes traversal cells coincide with block positions.
pub fn view_ray(eye: Point3<f32>, front: Vector3<f32>, reach: f32) -> VoxelTraversal {
    let front = front.normalize();
    let start = eye + Vector3::new(0.5, 0.5, 0.5) - front * START_PULLBACK;
    VoxelTraversal::new(start, start + front * reach)
}

/// First solid block along the view ray.
pub fn find_break_target(world: &World, eye: Point3<f32>, front: Vector3<f32>, reach: f32) -> Option<Point3<i32>> {
    view_ray(eye, front, reach).find(|&cell| world.is_solid_at(cell))
}

/// The open cell in front of the first solid block along the view ray.
///
/// # Returns
/// `None` when nothing solid is in reach, or when a block in that cell would
/// overlap the player's body.
pub fn find_place_target(world: &World, eye: Point3<f32>, front: Vector3<f32>, reach: f32) -> Option<Point3<i32>> {
    let ray = view_ray(eye, front, reach);
    let mut previous = ray.start_cell();
    let body = Aabb::player(eye);

    for cell in ray {
        if world.is_solid_at(cell) {
            let blocked = world.is_solid_at(previous) || Aabb::block(previous).intersects(&body);
            return (!blocked).then_some(previous);
        }
        previous = cell;
    }
    None
}

/// Breaks the block the player is looking at.
///
/// # Returns
/// The chunks to remesh, or `None` when nothing was broken.
pub fn break_targeted_block(
    world: &World,
    eye: Point3<f32>,
    front: Vector3<f32>,
    reach: f32,
) -> Option<HashSet<ChunkPosition>> {
    let target = find_break_target(world, eye, front, reach)?;
    edit::break_block(world, target)
}

/// Places [`PLACED_BLOCK`] against the block the player is looking at.
///
/// # Returns
/// The chunks to remesh, or `None` when nothing was placed.
pub fn place_targeted_block(
    world: &World,
    eye: Point3<f32>,
    front: Vector3<f32>,
    reach: f32,
) -> Option<HashSet<ChunkPosition>> {
    let target = find_place_target(world, eye, front, reach)?;
    edit::place_block(world, target, PLACED_BLOCK)
}
