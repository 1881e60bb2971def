//! # Engine Configuration
//!
//! All tunables of the engine live in [`EngineConfig`]. The configuration is a
//! JSON document whose every field is optional; anything left out falls back to
//! the defaults below, so `{}` is a complete configuration.
//!
//! ```json
//! {
//!     "world": { "seed": 7, "generation": "flat", "flat_height": 4 },
//!     "physics": { "tick_rate": 60.0 }
//! }
//! ```
//!
//! The file is looked up through the `VOXEL_WORLD_CONFIG` environment variable
//! by [`EngineConfig::from_env`].

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WorldError};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "VOXEL_WORLD_CONFIG";

/// Root configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub world: WorldConfig,
    pub physics: PhysicsConfig,
    pub streaming: StreamingConfig,
    pub meshing: MeshingConfig,
    pub simulation: SimulationConfig,
}

/// Which terrain generator fills newly requested chunks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMethod {
    /// Fractal noise heightmap with caves
    #[default]
    Noise,
    /// A flat grass plain at `flat_height`
    Flat,
    /// Nothing but air
    Empty,
    /// Nothing but dirt
    Solid,
    /// Alternating dirt and air cells
    Checkerboard,
    /// Sparse dirt scattered from a seeded generator
    Random,
}

/// World generation and extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub seed: u32,
    pub generation: GenerationMethod,
    /// Surface height used by the flat generator, in world blocks
    pub flat_height: i32,
    /// Radius, in chunk columns, streamed around the player
    pub render_distance: i32,
    /// Lowest chunk layer of every streamed column
    pub min_chunk_y: i32,
    /// Highest chunk layer of every streamed column
    pub max_chunk_y: i32,
    pub noise_amplitude: f64,
    pub noise_scale: f64,
    pub cave_threshold: f64,
    pub cave_scale: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 12,
            generation: GenerationMethod::Noise,
            flat_height: 0,
            render_distance: 3,
            min_chunk_y: -4,
            max_chunk_y: 3,
            noise_amplitude: 30.0,
            noise_scale: 100.0,
            cave_threshold: 0.1,
            cave_scale: 15.0,
        }
    }
}

/// Player movement constants. Velocities are expressed in blocks per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Fixed simulation ticks per second
    pub tick_rate: f32,
    pub gravity: f32,
    pub damping: f32,
    pub walking_speed: f32,
    pub running_speed: f32,
    pub flying_speed: f32,
    pub jump_velocity: f32,
    pub jump_cooldown: f32,
    /// Length of the block edit ray, in blocks
    pub reach: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            tick_rate: 30.0,
            gravity: 0.016,
            damping: 0.25,
            walking_speed: 2.0,
            running_speed: 3.0,
            flying_speed: 4.0,
            jump_velocity: 0.25,
            jump_cooldown: 0.05,
            reach: 5.0,
        }
    }
}

impl PhysicsConfig {
    /// Duration of one simulation tick in seconds.
    pub fn tick_duration(&self) -> f32 {
        1.0 / self.tick_rate.max(1.0)
    }
}

/// Background chunk streaming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Milliseconds between two streaming passes
    pub interval_ms: u64,
    /// Worker threads generating and lighting chunk columns
    pub workers: usize,
    /// Number of requested column positions remembered
    pub request_cache: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 200,
            workers: 4,
            request_cache: 1024,
        }
    }
}

/// Mesh builder switches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshingConfig {
    pub ambient_occlusion: bool,
    /// Average face light over the four samples around each vertex
    pub smooth_lighting: bool,
}

impl Default for MeshingConfig {
    fn default() -> Self {
        Self {
            ambient_occlusion: true,
            smooth_lighting: false,
        }
    }
}

/// Headless demo run by the binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of fixed ticks simulated before exiting
    pub ticks: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { ticks: 150 }
    }
}

impl EngineConfig {
    /// Parses a configuration document.
    pub fn from_json(text: &str, origin: &Path) -> Result<Self> {
        serde_json::from_str(text).map_err(|source| WorldError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Loads a configuration file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| WorldError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, path)
    }

    /// Loads the file named by [`CONFIG_ENV_VAR`], or the defaults when unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                let path = Path::new(&path);
                info!("Loading config from {}", path.display());
                Self::load(path)
            }
            None => {
                info!("{} not set, using default config", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }
}
