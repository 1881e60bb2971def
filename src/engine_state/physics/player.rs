use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3, VectorSpace};

use crate::config::PhysicsConfig;
use crate::engine_state::camera_state::camera::Camera;
use crate::engine_state::voxels::world::World;

use super::collision;
use super::{AIR_DAMPING_MULTIPLIER, JUMP_COOLDOWN_DECAY};

/// What the player wants to do this tick, independent of input devices.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementIntent {
    /// -1 backward ..= 1 forward
    pub forward: f32,
    /// -1 left ..= 1 right
    pub right: f32,
    /// -1 down ..= 1 up, only used while flying
    pub up: f32,
    pub jump: bool,
    pub sprint: bool,
}

/// Physical state of the player. The eye position itself lives in the camera.
#[derive(Debug, Clone)]
pub struct Player {
    /// Blocks per tick
    pub velocity: Vector3<f32>,
    pub flying: bool,
    /// Set by the last tick's collision pass
    pub grounded: bool,
    jump_cooldown: f32,
    previous_eye: Point3<f32>,
}

impl Player {
    pub fn new(eye: Point3<f32>) -> Self {
        Player {
            velocity: Vector3::new(0.0, 0.0, 0.0),
            flying: false,
            grounded: false,
            jump_cooldown: 0.0,
            previous_eye: eye,
        }
    }

    pub fn toggle_flying(&mut self) {
        self.flying = !self.flying;
        self.grounded = false;
        self.velocity.y = 0.0;
    }

    pub fn jump_cooldown(&self) -> f32 {
        self.jump_cooldown
    }

    /// Horizontal velocity multiplier for one tick.
    fn horizontal_retention(&self, intent: &MovementIntent, damping: f32) -> f32 {
        if self.flying || self.grounded {
            1.0 - damping
        } else if intent.sprint {
            let air_loss = (1.0 - AIR_DAMPING_MULTIPLIER) * 2.0;
            1.0 - damping * (1.0 - air_loss)
        } else {
            1.0 - damping * AIR_DAMPING_MULTIPLIER
        }
    }

    /// Advances the player by one fixed tick.
    ///
    /// The order is: movement intent, damping, gravity, collision, jump
    /// cooldown decay, then integration of whatever velocity is left.
    /// Gravity and collision are skipped while flying.
    ///
    /// # Arguments
    /// * `camera` - The player's eye, moved by this tick
    /// * `world` - The chunk store to collide against
    /// * `intent` - Requested movement
    /// * `physics` - Movement constants
    pub fn tick(&mut self, camera: &mut Camera, world: &World, intent: &MovementIntent, physics: &PhysicsConfig) {
        self.previous_eye = camera.position;
        let dt = physics.tick_duration();

        let speed = if self.flying {
            physics.flying_speed
        } else if intent.sprint {
            physics.running_speed
        } else {
            physics.walking_speed
        };

        let mut direction = camera.horizontal_front() * intent.forward + camera.right() * intent.right;
        if direction.magnitude2() > 0.0 {
            direction = direction.normalize();
        }
        self.velocity += direction * speed * dt;

        if self.flying {
            self.velocity.y += intent.up * speed * dt;
        } else if intent.jump && self.grounded && self.jump_cooldown <= 0.0 {
            self.velocity.y += physics.jump_velocity;
            self.jump_cooldown = physics.jump_cooldown;
        }

        let retention = self.horizontal_retention(intent, physics.damping);
        self.velocity.x *= retention;
        self.velocity.z *= retention;

        if self.flying {
            self.velocity.y *= 1.0 - physics.damping;
            self.grounded = false;
        } else {
            self.velocity.y -= physics.gravity;
            self.grounded = collision::resolve_movement(world, &mut camera.position, &mut self.velocity);
        }

        self.jump_cooldown = (self.jump_cooldown - JUMP_COOLDOWN_DECAY).max(0.0);

        camera.position += self.velocity;
    }

    /// Eye position between the last two ticks, `alpha` in `0..=1`.
    pub fn interpolated_eye(&self, current: Point3<f32>, alpha: f32) -> Point3<f32> {
        Point3::from_vec(self.previous_eye.to_vec().lerp(current.to_vec(), alpha))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;
    use crate::engine_state::voxels::chunk::{Chunk, ChunkPosition};
    use cgmath::Rad;

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

    fn setup(eye: Point3<f32>) -> (World, Camera, Player, PhysicsConfig) {
        (
            floor_world(),
            Camera::new(eye, Rad(0.0), Rad(0.0)),
            Player::new(eye),
            PhysicsConfig::default(),
        )
    }

    #[test]
    fn standing_player_stays_on_the_floor() {
        let (world, mut camera, mut player, physics) = setup(Point3::new(8.0, 2.0, 8.0));
        for _ in 0..60 {
            player.tick(&mut camera, &world, &MovementIntent::default(), &physics);
            assert!(player.grounded);
        }
        assert!((camera.position.y - 2.0).abs() < 0.01);
        assert_eq!(player.velocity.y, 0.0);
    }

    #[test]
    fn falling_player_lands() {
        let (world, mut camera, mut player, physics) = setup(Point3::new(8.0, 6.0, 8.0));
        player.tick(&mut camera, &world, &MovementIntent::default(), &physics);
        assert!(!player.grounded);
        assert!(camera.position.y < 6.0);

        for _ in 0..100 {
            player.tick(&mut camera, &world, &MovementIntent::default(), &physics);
        }
        assert!(player.grounded);
        assert!((camera.position.y - 2.0).abs() < 0.01);
    }

    #[test]
    fn jump_needs_ground_and_sets_the_cooldown() {
        let (world, mut camera, mut player, physics) = setup(Point3::new(8.0, 2.0, 8.0));
        let jump = MovementIntent {
            jump: true,
            ..Default::default()
        };

        player.tick(&mut camera, &world, &MovementIntent::default(), &physics);
        player.tick(&mut camera, &world, &jump, &physics);

        assert!(!player.grounded);
        assert!(camera.position.y > 2.2);
        assert!((player.jump_cooldown() - (physics.jump_cooldown - JUMP_COOLDOWN_DECAY)).abs() < 1e-6);

        let height = camera.position.y;
        let velocity = player.velocity.y;
        player.tick(&mut camera, &world, &jump, &physics);
        assert!(player.velocity.y < velocity);
        assert!(camera.position.y > height);
    }

    #[test]
    fn walking_moves_along_the_view() {
        let (world, mut camera, mut player, physics) = setup(Point3::new(4.0, 2.0, 8.0));
        let forward = MovementIntent {
            forward: 1.0,
            ..Default::default()
        };
        for _ in 0..10 {
            player.tick(&mut camera, &world, &forward, &physics);
        }
        assert!(camera.position.x > 5.0);
        assert!((camera.position.z - 8.0).abs() < 1e-4);
        assert!(player.grounded);
    }

    #[test]
    fn flying_ignores_gravity() {
        let (world, mut camera, mut player, physics) = setup(Point3::new(8.0, 10.0, 8.0));
        player.toggle_flying();
        for _ in 0..10 {
            player.tick(&mut camera, &world, &MovementIntent::default(), &physics);
        }
        assert_eq!(camera.position.y, 10.0);

        let up = MovementIntent {
            up: 1.0,
            ..Default::default()
        };
        player.tick(&mut camera, &world, &up, &physics);
        assert!(camera.position.y > 10.0);
    }

    #[test]
    fn interpolation_blends_the_last_two_ticks() {
        let (world, mut camera, mut player, physics) = setup(Point3::new(8.0, 6.0, 8.0));
        player.tick(&mut camera, &world, &MovementIntent::default(), &physics);
        let halfway = player.interpolated_eye(camera.position, 0.5);
        assert!((halfway.y - (6.0 + camera.position.y) / 2.0).abs() < 1e-6);
        assert_eq!(player.interpolated_eye(camera.position, 1.0), camera.position);
    }
}
