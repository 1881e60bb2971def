#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! The simulation core of a block-based voxel world: chunked storage, terrain
//! generation, sunlight and block-light flood fill, culled and shaded chunk
//! meshes, and a player that walks, jumps, flies and edits blocks.
//!
//! ## Key Modules
//!
//! * `config` - Engine configuration loaded from JSON
//! * `core` - Core utilities and data structures used throughout the engine
//! * `engine_state` - The main engine components including physics, meshing, voxels, and task management
//! * `error` - The crate error type
//!
//! ## Architecture
//!
//! The engine never talks to a GPU or a window. It produces vertex buffers
//! and hands them to whatever implements
//! [`Renderer`](engine_state::rendering::Renderer), and it reads
//! [`PlayerAction`](engine_state::PlayerAction)s instead of raw input.
//! Chunk columns are generated and lit on a worker pool and folded back in on
//! the main thread.
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     if let Err(err) = voxel_world::run() {
//!         eprintln!("{err}");
//!     }
//! }
//! ```
//!
//! ## Performance Considerations
//!
//! The engine is designed with performance as a primary concern:
//! * Chunk-based voxel storage with one lock per chunk
//! * Light updates after an edit only touch the neighbourhood of the edit
//! * Multi-threaded task execution for chunk generation and lighting
//! * Meshes are rebuilt only for chunks whose blocks or light changed

use log::info;
use web_time::{Duration, Instant};

use config::EngineConfig;
use engine_state::rendering::HeadlessRenderer;
use engine_state::{EngineState, PlayerAction};
use error::Result;

pub mod config;
pub mod core;
pub mod engine_state;
pub mod error;

/// Longest time `run` waits for background streaming to settle at the end.
const STREAMING_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Input of the headless demo for one frame: walk forward while turning
/// slowly, hop now and then, and dig out then refill the block underfoot.
fn scripted_actions(frame: u32) -> PlayerAction {
    PlayerAction {
        move_forward: true,
        move_up: frame % 45 == 44,
        rotate_view: Some((4.0, 0.0)),
        break_block: frame == 60,
        place_block: frame == 90,
        ..Default::default()
    }
}

/// Runs the engine headless for the configured number of ticks.
///
/// Logging goes to stdout and is filtered by `RUST_LOG`. The configuration
/// comes from the file named by `VOXEL_WORLD_CONFIG`, or the defaults.
pub fn run() -> Result<()> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");
    let config = EngineConfig::from_env()?;
    let frames = config.simulation.ticks;
    let frame_time = Duration::from_secs_f32(config.physics.tick_duration());

    let started = Instant::now();
    let mut engine = EngineState::new(config);
    let mut renderer = HeadlessRenderer::new();
    engine.render(&mut renderer);
    info!("Initialization took {:?}", started.elapsed());

    for frame in 0..frames {
        engine.set_player_actions(scripted_actions(frame));
        engine.update(frame_time)?;
        engine.render(&mut renderer);
    }

    engine.wait_for_streaming(STREAMING_DRAIN_TIMEOUT)?;
    engine.render(&mut renderer);

    info!(
        "Simulated {} ticks: {} chunks loaded, {} meshes live, {} vertices, {} uploads, eye at {:?}",
        engine.ticks(),
        engine.world.get().len(),
        renderer.live_meshes(),
        renderer.total_vertices(),
        renderer.uploads(),
        engine.camera_state.camera.position
    );

    Ok(())
}
