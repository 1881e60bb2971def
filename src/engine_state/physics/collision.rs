//! Swept AABB collision against the voxel grid.
//!
//! A sweep treats the moving box as travelling along `velocity` for one tick
//! and finds the fraction of that tick at which it first touches a static
//! box. Resolution repeats the sweep a few times: stopping on one axis can
//! uncover a hit on another, as when sliding into a wall corner.

use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::world::World;

use super::aabb::Aabb;
use super::{COLLISION_EPSILON, COLLISION_ITERATIONS, COLLISION_RADIUS};

/// First contact of a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// Fraction of the velocity travelled before contact, at most 1.
    pub time: f32,
    /// Unit axis pointing away from the hit surface, zero on the other axes.
    pub normal: Vector3<f32>,
}

/// Time to cover `distance` at `speed` on one axis. A resting axis is either
/// always overlapping (`-inf`) or never (`+inf`).
fn axis_time(distance: f32, speed: f32) -> f32 {
    if speed == 0.0 {
        if distance > 0.0 {
            f32::NEG_INFINITY
        } else {
            f32::INFINITY
        }
    } else {
        distance / speed
    }
}

/// Entry and exit times on one axis.
fn axis_window(moving_min: f32, moving_max: f32, target_min: f32, target_max: f32, speed: f32) -> (f32, f32) {
    if speed > 0.0 {
        (
            axis_time(target_min - moving_max, speed),
            axis_time(target_max - moving_min, speed),
        )
    } else {
        (
            axis_time(target_max - moving_min, speed),
            axis_time(target_min - moving_max, speed),
        )
    }
}

/// Sweeps `moving` along `velocity` against the static `target`.
///
/// # Returns
/// The contact, or `None` when the boxes do not meet within this tick.
pub fn sweep(moving: &Aabb, velocity: Vector3<f32>, target: &Aabb) -> Option<Collision> {
    let (x_entry, x_exit) = axis_window(moving.min.x, moving.max.x, target.min.x, target.max.x, velocity.x);
    let (y_entry, y_exit) = axis_window(moving.min.y, moving.max.y, target.min.y, target.max.y, velocity.y);
    let (z_entry, z_exit) = axis_window(moving.min.z, moving.max.z, target.min.z, target.max.z, velocity.z);

    if x_entry < 0.0 && y_entry < 0.0 && z_entry < 0.0 {
        return None;
    }
    if x_entry > 1.0 || y_entry > 1.0 || z_entry > 1.0 {
        return None;
    }

    let entry = x_entry.max(y_entry).max(z_entry);
    let exit = x_exit.min(y_exit).min(z_exit);
    if entry > exit {
        return None;
    }

    let away = |speed: f32| if speed > 0.0 { -1.0 } else { 1.0 };
    let mut normal = Vector3::new(0.0, 0.0, 0.0);
    if entry == x_entry {
        normal.x = away(velocity.x);
    }
    if entry == y_entry {
        normal.y = away(velocity.y);
    }
    if entry == z_entry {
        normal.z = away(velocity.z);
    }

    Some(Collision { time: entry, normal })
}

/// Solid block boxes within [`COLLISION_RADIUS`] of the block nearest `eye`.
fn nearby_solid_blocks(world: &World, eye: Point3<f32>) -> Vec<Aabb> {
    let center = Point3::new(eye.x.round() as i32, eye.y.round() as i32, eye.z.round() as i32);
    let mut blocks = Vec::new();
    for x in -COLLISION_RADIUS..=COLLISION_RADIUS {
        for y in -COLLISION_RADIUS..=COLLISION_RADIUS {
            for z in -COLLISION_RADIUS..=COLLISION_RADIUS {
                let position = Point3::new(center.x + x, center.y + y, center.z + z);
                if world.is_solid_at(position) {
                    blocks.push(Aabb::block(position));
                }
            }
        }
    }
    blocks
}

/// Moves the player eye up to its first contacts this tick.
///
/// Each pass sweeps the player box against nearby solid blocks, takes the
/// earliest hit, advances the position along the hit axes to just short of
/// contact and zeroes the velocity on those axes. The remaining velocity is
/// left for the caller to integrate.
///
/// # Arguments
/// * `world` - The chunk store
/// * `eye` - Player eye position, updated on collision axes
/// * `velocity` - Player velocity, zeroed on collision axes
///
/// # Returns
/// Whether any contact had an upward-facing normal, i.e. the player stands on something.
pub fn resolve_movement(world: &World, eye: &mut Point3<f32>, velocity: &mut Vector3<f32>) -> bool {
    let mut grounded = false;

    for _ in 0..COLLISION_ITERATIONS {
        let body = Aabb::player(*eye);
        let earliest = nearby_solid_blocks(world, *eye)
            .iter()
            .filter_map(|block| sweep(&body, *velocity, block))
            .min_by(|a, b| a.time.total_cmp(&b.time));

        let Some(collision) = earliest else {
            break;
        };

        let advance = collision.time - COLLISION_EPSILON;
        for axis in 0..3 {
            if collision.normal[axis] != 0.0 {
                eye[axis] += velocity[axis] * advance;
                velocity[axis] = 0.0;
            }
        }

        if collision.normal.y != 0.0 && collision.normal.y >= 0.0 {
            grounded = true;
        }
    }

    grounded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;
    use crate::engine_state::voxels::chunk::{Chunk, ChunkPosition};

    fn floor_world() -> World {
        let mut world = World::new();
        world.insert(Chunk::empty(ChunkPosition::new(0, 0, 0)));
        for x in 0..16 {
            for z in 0..16 {
                world.set_block_type_at(Point3::new(x, 0, z), BlockType::STONE);
            }
        }
        world
    }

    #[test]
    fn falling_box_hits_the_top_face() {
        let block = Aabb::block(Point3::new(0, 0, 0));
        let body = Aabb::new(Point3::new(-0.4, 1.0, -0.4), Point3::new(0.4, 2.0, 0.4));
        let collision = sweep(&body, Vector3::new(0.0, -1.0, 0.0), &block).unwrap();
        assert_eq!(collision.time, 0.5);
        assert_eq!(collision.normal, Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn misses_are_rejected() {
        let block = Aabb::block(Point3::new(0, 0, 0));
        let beside = Aabb::new(Point3::new(2.0, 1.0, 2.0), Point3::new(2.5, 2.0, 2.5));
        assert!(sweep(&beside, Vector3::new(0.0, -1.0, 0.0), &block).is_none());

        let too_far = Aabb::new(Point3::new(-0.4, 3.0, -0.4), Point3::new(0.4, 4.0, 0.4));
        assert!(sweep(&too_far, Vector3::new(0.0, -1.0, 0.0), &block).is_none());

        let moving_away = Aabb::new(Point3::new(-0.4, 1.0, -0.4), Point3::new(0.4, 2.0, 0.4));
        assert!(sweep(&moving_away, Vector3::new(0.0, 1.0, 0.0), &block).is_none());
    }

    #[test]
    fn side_hit_reports_a_horizontal_normal() {
        let block = Aabb::block(Point3::new(2, 0, 0));
        let body = Aabb::new(Point3::new(0.0, -0.4, -0.4), Point3::new(1.0, 0.4, 0.4));
        let collision = sweep(&body, Vector3::new(1.0, 0.0, 0.0), &block).unwrap();
        assert_eq!(collision.time, 0.5);
        assert_eq!(collision.normal, Vector3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn resting_player_is_stopped_and_grounded() {
        let world = floor_world();
        let mut eye = Point3::new(8.0, 2.0, 8.0);
        let mut velocity = Vector3::new(0.0, -0.1, 0.0);

        let grounded = resolve_movement(&world, &mut eye, &mut velocity);

        assert!(grounded);
        assert_eq!(velocity.y, 0.0);
        assert!(eye.y >= 2.0);
        assert!(eye.y < 2.01);
    }

    #[test]
    fn falling_player_lands_on_the_floor() {
        let world = floor_world();
        let mut eye = Point3::new(8.0, 2.3, 8.0);
        let mut velocity = Vector3::new(0.0, -0.5, 0.0);

        assert!(resolve_movement(&world, &mut eye, &mut velocity));
        assert_eq!(velocity.y, 0.0);
        assert!((eye.y - 2.0).abs() < 0.01);
    }

    #[test]
    fn walls_stop_only_the_blocked_axis() {
        let world = floor_world();
        for y in 1..4 {
            world.set_block_type_at(Point3::new(10, y, 8), BlockType::STONE);
        }
        let mut eye = Point3::new(8.9, 2.5, 8.0);
        let mut velocity = Vector3::new(0.5, 0.0, 0.2);

        let grounded = resolve_movement(&world, &mut eye, &mut velocity);

        assert!(!grounded);
        assert_eq!(velocity.x, 0.0);
        assert_eq!(velocity.z, 0.2);
        assert!(eye.x + 0.45 <= 9.5);
    }

    #[test]
    fn free_space_leaves_velocity_alone() {
        let world = floor_world();
        let mut eye = Point3::new(8.0, 8.0, 8.0);
        let mut velocity = Vector3::new(0.1, -0.2, 0.1);
        assert!(!resolve_movement(&world, &mut eye, &mut velocity));
        assert_eq!(velocity, Vector3::new(0.1, -0.2, 0.1));
        assert_eq!(eye, Point3::new(8.0, 8.0, 8.0));
    }
}
