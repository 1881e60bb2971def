//! # Camera Implementation
//!
//! This module contains the camera the player looks through:
//! - Eye position and yaw/pitch orientation
//! - View, horizontal-forward and right vectors derived from the orientation
//! - A controller turning mouse deltas into rotation
//!
//! ## Key Components
//! - `Camera`: the eye position and orientation in world space
//! - `CameraController`: accumulates view rotation from player input

use cgmath::*;
use std::f32::consts::FRAC_PI_2;

use crate::engine_state::PlayerAction;

/// Pitch limit just short of straight up or down, where yaw degenerates.
const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// Mouse deltas at or below this many pixels are treated as jitter.
const ROTATION_DEAD_ZONE: f64 = 0.5;

/// The player's eye.
///
/// Yaw 0 looks along +X and grows towards +Z; positive pitch looks up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
}

impl Camera {
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        let mut camera = Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        };
        camera.clamp_pitch();
        camera
    }

    /// Unit vector the camera looks along.
    pub fn front(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        Vector3::new(pitch_cos * yaw_cos, pitch_sin, pitch_cos * yaw_sin).normalize()
    }

    /// Forward direction flattened onto the ground plane.
    pub fn horizontal_front(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        Vector3::new(yaw_cos, 0.0, yaw_sin).normalize()
    }

    /// Unit vector pointing to the camera's right on the ground plane.
    pub fn right(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        Vector3::new(-yaw_sin, 0.0, yaw_cos).normalize()
    }

    /// Turns the camera, keeping the pitch short of the poles.
    pub fn rotate(&mut self, yaw: Rad<f32>, pitch: Rad<f32>) {
        self.yaw += yaw;
        self.pitch += pitch;
        self.clamp_pitch();
    }

    fn clamp_pitch(&mut self) {
        if self.pitch < -Rad(SAFE_FRAC_PI_2) {
            self.pitch = -Rad(SAFE_FRAC_PI_2);
        } else if self.pitch > Rad(SAFE_FRAC_PI_2) {
            self.pitch = Rad(SAFE_FRAC_PI_2);
        }
    }
}

/// Collects view rotation between two updates.
#[derive(Debug)]
pub struct CameraController {
    // Rotation amounts (in radians per second of input)
    rotate_horizontal: f32,
    rotate_vertical: f32,

    sensitivity: f32,
}

impl CameraController {
    pub fn new(sensitivity: f32) -> Self {
        Self {
            rotate_horizontal: 0.0,
            rotate_vertical: 0.0,
            sensitivity,
        }
    }

    pub fn intake_actions(&mut self, actions: &PlayerAction) {
        if let Some((delta_x, delta_y)) = actions.rotate_view {
            if delta_x.abs() > ROTATION_DEAD_ZONE {
                self.rotate_horizontal += (delta_x as f32) * self.sensitivity;
            }
            if delta_y.abs() > ROTATION_DEAD_ZONE {
                self.rotate_vertical += (delta_y as f32) * self.sensitivity;
            }
        }
    }

    pub fn has_updates(&self) -> bool {
        self.rotate_horizontal != 0.0 || self.rotate_vertical != 0.0
    }

    /// Applies the collected rotation to `camera` and resets the controller.
    ///
    /// Moving the mouse up looks up, so the vertical delta is inverted.
    pub fn apply_and_reset(&mut self, camera: &mut Camera, dt: f32) {
        camera.rotate(
            Rad(self.rotate_horizontal * dt),
            Rad(-self.rotate_vertical * dt),
        );
        self.rotate_horizontal = 0.0;
        self.rotate_vertical = 0.0;
    }
}
