//! # Player Physics
//!
//! Fixed-timestep movement of the player through the voxel grid and the
//! view ray used to pick blocks for editing.
//!
//! ## Architecture
//!
//! * **Aabb**: axis-aligned boxes for the player and for blocks
//! * **Collision**: swept AABB tests and iterative movement resolution
//! * **Raycast**: voxel traversal along the view direction
//! * **Player**: velocity, flying and ground state, and the per-tick update
//!
//! ## Units
//!
//! Positions are world-space blocks with block centres on integer
//! coordinates. Velocities are blocks per tick; one tick lasts
//! `1 / tick_rate` seconds.
//!
//! ## Performance Considerations
//!
//! Collision candidates are the solid blocks within [`COLLISION_RADIUS`] of
//! the player, looked up one at a time through the chunk store. That is a few
//! hundred lookups per iteration, which is cheap next to meshing.

pub mod aabb;
pub mod collision;
pub mod player;
pub mod raycast;

pub use aabb::Aabb;
pub use player::{MovementIntent, Player};

/// Half extent of the player box on the horizontal axes.
pub const PLAYER_HALF_WIDTH: f32 = 0.45;

/// Distance from the eye down to the feet.
pub const PLAYER_EYE_HEIGHT: f32 = 1.5;

/// Distance from the eye up to the top of the head.
pub const PLAYER_HEAD_ROOM: f32 = 0.25;

/// Blocks scanned around the player on every axis when looking for colliders.
pub const COLLISION_RADIUS: i32 = 3;

/// Collision resolution passes per tick.
pub const COLLISION_ITERATIONS: usize = 3;

/// Gap kept between the player and whatever it collides with.
pub const COLLISION_EPSILON: f32 = 0.001;

/// Fraction of the ground damping still applied in the air.
pub const AIR_DAMPING_MULTIPLIER: f32 = 0.93;

/// Amount the jump cooldown drops every tick.
pub const JUMP_COOLDOWN_DECAY: f32 = 0.01;
