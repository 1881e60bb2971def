//! # Camera State Management
//!
//! This module handles all camera-related functionality including:
//! - Camera position and orientation tracking
//! - Player input processing for camera control
//! - Chunk-based position tracking that drives world streaming
//!
//! ## Core Components
//! - `Camera`: Represents the camera's position and orientation in 3D space
//! - `CameraController`: Collects view rotation from player input
//!
//! The camera position is the player's eye. Player physics moves it; this
//! module only turns it.

use cgmath::{Deg, Point3};

use super::{
    voxels::chunk::{coordinates::block_containing, ChunkPosition},
    PlayerAction,
};

pub mod camera;

/// Mouse sensitivity of the default controller.
const DEFAULT_SENSITIVITY: f32 = 0.4;

/// The camera plus the controller turning it.
///
/// # Fields
/// - `camera`: The current camera state (position, orientation)
/// - `camera_controller`: Handles player input and camera rotation
pub struct CameraState {
    /// The current camera position and orientation
    pub camera: camera::Camera,
    /// Handles player input and camera rotation
    pub camera_controller: camera::CameraController,
    /// Chunk holding the eye at the last update
    chunk_position: ChunkPosition,
}

impl CameraState {
    /// Creates a camera at `position` looking along +X.
    ///
    /// # Arguments
    /// * `position` - Initial eye position
    pub fn new(position: Point3<f32>) -> Self {
        let camera = camera::Camera::new(position, Deg(0.0), Deg(0.0));
        CameraState {
            camera,
            camera_controller: camera::CameraController::new(DEFAULT_SENSITIVITY),
            chunk_position: ChunkPosition::containing(block_containing(position)),
        }
    }

    /// Processes player input actions and updates the camera controller state.
    ///
    /// # Arguments
    /// * `actions` - The player's input actions to process
    pub fn intake_actions(&mut self, actions: &PlayerAction) {
        self.camera_controller.intake_actions(actions);
    }

    /// The chunk containing the eye.
    pub fn chunk_position(&self) -> ChunkPosition {
        ChunkPosition::containing(block_containing(self.camera.position))
    }

    /// Applies pending rotation and checks whether the eye entered a new chunk.
    ///
    /// # Arguments
    /// * `dt` - Seconds elapsed since the last update
    ///
    /// # Returns
    /// - `Some(CameraUpdates)` if the eye moved into another chunk
    /// - `None` otherwise
    pub fn update(&mut self, dt: f32) -> Option<CameraUpdates> {
        if self.camera_controller.has_updates() {
            self.camera_controller.apply_and_reset(&mut self.camera, dt);
        }

        let new_chunk_position = self.chunk_position();
        if new_chunk_position != self.chunk_position {
            self.chunk_position = new_chunk_position;
            return Some(CameraUpdates { new_chunk_position });
        }

        None
    }
}

/// Represents updates to the camera's state that affect game world interaction.
///
/// This is returned by `CameraState::update()` when the eye crossed a chunk border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraUpdates {
    /// The chunk now holding the eye
    pub new_chunk_position: ChunkPosition,
}
