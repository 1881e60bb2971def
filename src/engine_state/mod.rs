//! # Engine State Module
//!
//! The core engine module that manages the state and functionality of the voxel engine.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `camera_state` - Handles camera orientation and chunk tracking
//! * `physics` - Player movement, collision and block picking
//! * `rendering` - Mesh building and the renderer contract
//! * `task_management` - Manages asynchronous tasks and worker threads
//! * `voxels` - Handles voxel data, chunks, lighting and world generation
//!
//! ## Architecture
//!
//! The engine state module follows a component-based architecture where each subsystem
//! is responsible for a specific aspect of the engine's functionality. The `EngineState`
//! struct serves as the central coordinator, maintaining references to all subsystems
//! and facilitating communication between them.
//!
//! A frame runs in this order:
//! 1. Player input is turned into camera rotation and a movement intent
//! 2. Fixed physics ticks consume the accumulated frame time
//! 3. Break/place actions edit the world and queue remeshes
//! 4. The streaming timer requests new chunk columns around the player
//! 5. Finished worker results are folded back in
//! 6. [`EngineState::render`] drains the pending meshes into a [`Renderer`]
//!
//! ## Performance Considerations
//!
//! * Column generation and lighting run on the worker pool
//! * Requested columns are remembered in a bounded LRU so they are not requested twice
//! * Meshes are only rebuilt for chunks an edit or a streamed column touched

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread;

use cgmath::Point3;
use log::{debug, info, warn};
use lru::LruCache;
use web_time::{Duration, Instant};

use camera_state::{CameraState, CameraUpdates};
use physics::{raycast, MovementIntent, Player};
use rendering::{meshing, PendingMeshes, Renderer};
use task_management::{task::TaskContext, TaskManager};
use voxels::{
    chunk::{Chunk, ChunkPosition, ColumnPosition},
    lighting,
    tasks::ChunkColumnGenerationTask,
    terrain::{create_generator, TerrainGenerator},
    world::World,
};

use crate::config::EngineConfig;
use crate::core::MtResource;
use crate::error::Result;

pub mod camera_state;
pub mod physics;
pub mod rendering;
pub mod task_management;
pub mod voxels;

/// How often `wait_for_streaming` polls the worker pool.
const STREAMING_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// A block edit requested by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockAction {
    /// Clear the first solid block along the view ray
    Break,
    /// Put a block against the first solid block along the view ray
    Place,
}

/// The main state container for the voxel engine
///
/// This struct maintains references to all major subsystems and coordinates
/// their interactions. It handles input processing, fixed-step physics,
/// chunk streaming, task management and mesh hand-off.
///
/// # Examples
///
/// ```no_run
/// use voxel_world::config::EngineConfig;
/// use voxel_world::engine_state::{EngineState, PlayerAction};
/// use voxel_world::engine_state::rendering::HeadlessRenderer;
/// use web_time::Duration;
///
/// let mut engine_state = EngineState::new(EngineConfig::default());
/// let mut renderer = HeadlessRenderer::new();
///
/// // Main game loop
/// loop {
///     engine_state.set_player_actions(PlayerAction::default());
///     engine_state.update(Duration::from_millis(16)).unwrap();
///     engine_state.render(&mut renderer);
/// }
/// ```
pub struct EngineState {
    /// Configuration the engine was started with
    pub config: EngineConfig,
    /// Camera state managing position and orientation
    pub camera_state: CameraState,
    /// Velocity and ground state of the player
    pub player: Player,
    /// Current player actions derived from input
    pub player_actions: PlayerAction,
    /// Task manager for asynchronous operations
    pub task_manager: TaskManager,
    /// The voxel world containing all chunk data
    pub world: MtResource<World>,
    /// Chunks waiting for a mesh rebuild
    pub pending_meshes: PendingMeshes,
    generator: Arc<dyn TerrainGenerator>,
    /// Columns already handed to the worker pool
    requested_columns: LruCache<ColumnPosition, ()>,
    /// Frame time not yet consumed by physics ticks, in seconds
    accumulator: f32,
    last_stream: Option<Instant>,
    ticks: u64,
}

impl EngineState {
    /// Creates a new engine state with all subsystems initialized
    ///
    /// The columns inside the render distance are generated and lit before
    /// this returns, so the first frame already has ground under the
    /// player. Everything further out is streamed in by the worker pool.
    ///
    /// # Arguments
    ///
    /// * `config` - Engine configuration
    ///
    /// # Returns
    ///
    /// A fully initialized `EngineState` instance
    pub fn new(config: EngineConfig) -> Self {
        let generator = create_generator(&config.world);
        let task_manager = TaskManager::new(config.streaming.workers);
        let capacity = NonZeroUsize::new(config.streaming.request_cache).unwrap_or(NonZeroUsize::MIN);

        let mut engine = Self {
            camera_state: CameraState::new(Point3::new(0.0, 0.0, 0.0)),
            player: Player::new(Point3::new(0.0, 0.0, 0.0)),
            player_actions: PlayerAction::default(),
            task_manager,
            world: MtResource::new(World::new()),
            pending_meshes: PendingMeshes::default(),
            generator,
            requested_columns: LruCache::new(capacity),
            accumulator: 0.0,
            last_stream: None,
            ticks: 0,
            config,
        };

        engine.build_initial_world();

        let eye = engine.spawn_point();
        engine.camera_state = CameraState::new(eye);
        engine.player = Player::new(eye);
        info!("Player spawned at {:?}", eye);

        engine
    }

    /// Columns within the render distance of `center`, nearest first.
    fn columns_around(&self, center: ColumnPosition) -> Vec<ColumnPosition> {
        let radius = self.config.world.render_distance.max(0);
        let mut columns = Vec::new();
        for x in -radius..=radius {
            for z in -radius..=radius {
                let column = ColumnPosition::new(center.x + x, center.z + z);
                if column.distance_squared(center) <= radius * radius {
                    columns.push(column);
                }
            }
        }
        columns.sort_by_key(|column| column.distance_squared(center));
        columns
    }

    fn layers(&self) -> (i32, i32) {
        (self.config.world.min_chunk_y, self.config.world.max_chunk_y)
    }

    /// Generates the starting area on scoped threads, then lights it in one pass.
    fn build_initial_world(&mut self) {
        let started = Instant::now();
        let columns = self.columns_around(ColumnPosition::new(0, 0));
        let chunks = generate_columns(
            self.generator.as_ref(),
            &columns,
            self.layers(),
            self.config.streaming.workers,
        );

        {
            let mut world = self.world.get_mut();
            for chunk in chunks {
                world.insert(chunk);
            }
        }
        for column in &columns {
            self.requested_columns.put(*column, ());
        }

        let world = self.world.get();
        let update = lighting::relight_world(&world);
        self.pending_meshes.extend(world.positions());

        info!(
            "Built world: {} chunks in {} columns, {} light seeds, {} light writes, {:?}",
            world.len(),
            columns.len(),
            update.seeded,
            update.propagated,
            started.elapsed()
        );
    }

    /// Eye position standing on the highest solid block of the origin column.
    fn spawn_point(&self) -> Point3<f32> {
        let world = self.world.get();
        let Some(height) = world.height() else {
            return Point3::new(0.0, 0.0, 0.0);
        };

        let ground = (height.min_y..=height.max_y)
            .rev()
            .find(|&y| world.is_solid_at(Point3::new(0, y, 0)))
            .unwrap_or(height.max_y);

        Point3::new(
            0.0,
            ground as f32 + 0.5 + physics::PLAYER_EYE_HEIGHT,
            0.0,
        )
    }

    /// Sets the input commands for the next update.
    ///
    /// # Arguments
    /// * `actions` - What the player is doing this frame
    pub fn set_player_actions(&mut self, actions: PlayerAction) {
        self.player_actions = actions;
    }

    /// Advances the engine by one frame.
    ///
    /// # Arguments
    ///
    /// * `dt` - The time elapsed since the last frame
    ///
    /// # Returns
    ///
    /// The number of physics ticks run, or an error when the worker pool died.
    pub fn update(&mut self, dt: Duration) -> Result<u32> {
        let actions = std::mem::take(&mut self.player_actions);
        self.camera_state.intake_actions(&actions);

        if actions.toggle_flying {
            self.player.toggle_flying();
            info!("Flying: {}", self.player.flying);
        }

        let ticks = self.run_physics(dt.as_secs_f32(), &actions.movement_intent());

        if let Some(CameraUpdates { new_chunk_position }) = self.camera_state.update(dt.as_secs_f32()) {
            debug!("Player entered chunk {:?}", new_chunk_position);
            self.last_stream = None;
        }

        if actions.break_block {
            self.apply_block_action(BlockAction::Break);
        }
        if actions.place_block {
            self.apply_block_action(BlockAction::Place);
        }

        // Held movement carries over to the next frame, one-shot actions do not.
        self.player_actions = PlayerAction {
            toggle_flying: false,
            break_block: false,
            place_block: false,
            rotate_view: None,
            ..actions
        };

        if self.streaming_due() {
            self.stream_chunks();
        }
        self.process_tasks()?;

        Ok(ticks)
    }

    /// Consumes accumulated frame time in fixed ticks.
    fn run_physics(&mut self, frame_seconds: f32, intent: &MovementIntent) -> u32 {
        let tick = self.config.physics.tick_duration();
        self.accumulator += frame_seconds;

        let world = self.world.get();
        let mut ticks = 0;
        while self.accumulator >= tick {
            self.player
                .tick(&mut self.camera_state.camera, &world, intent, &self.config.physics);
            self.accumulator -= tick;
            ticks += 1;
        }
        self.ticks += u64::from(ticks);
        ticks
    }

    /// How far the current frame is between the last tick and the next, in `0..1`.
    pub fn interpolation_factor(&self) -> f32 {
        self.accumulator / self.config.physics.tick_duration()
    }

    /// Eye position to render this frame.
    pub fn interpolated_eye(&self) -> Point3<f32> {
        self.player
            .interpolated_eye(self.camera_state.camera.position, self.interpolation_factor())
    }

    /// Physics ticks run since start-up.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn streaming_due(&self) -> bool {
        let interval = Duration::from_millis(self.config.streaming.interval_ms);
        self.last_stream
            .map_or(true, |last| last.elapsed() >= interval)
    }

    /// Requests every column around the player that has not been requested yet.
    ///
    /// # Returns
    ///
    /// The number of column tasks published.
    pub fn stream_chunks(&mut self) -> usize {
        self.last_stream = Some(Instant::now());
        let center = self.camera_state.chunk_position().column();
        let layers = self.layers();

        let mut published = 0;
        for column in self.columns_around(center) {
            if self.requested_columns.get(&column).is_some() {
                continue;
            }
            self.requested_columns.put(column, ());
            self.task_manager.publish_task(Box::new(ChunkColumnGenerationTask::new(
                self.world.clone(),
                self.generator.clone(),
                column,
                layers,
            )));
            published += 1;
        }

        if published > 0 {
            debug!("Requested {} chunk columns around {:?}", published, center);
        }
        published
    }

    /// Processes completed and queued tasks
    ///
    /// This method should be called each frame to ensure that asynchronous
    /// tasks like chunk generation are processed.
    pub fn process_tasks(&mut self) -> Result<usize> {
        let mut context = TaskContext {
            world: &self.world,
            pending_meshes: &mut self.pending_meshes,
        };
        let handled = self.task_manager.process_completed_tasks(&mut context)?;
        self.task_manager.process_queued_tasks();
        Ok(handled)
    }

    /// Processes tasks until the worker pool is idle or `timeout` passes.
    ///
    /// # Returns
    ///
    /// Whether the pool went idle in time.
    pub fn wait_for_streaming(&mut self, timeout: Duration) -> Result<bool> {
        let started = Instant::now();
        loop {
            self.process_tasks()?;
            if self.task_manager.is_idle() {
                return Ok(true);
            }
            if started.elapsed() >= timeout {
                warn!(
                    "Streaming still busy after {:?}: {} tasks in flight",
                    timeout,
                    self.task_manager.tasks_in_flight()
                );
                return Ok(false);
            }
            thread::sleep(STREAMING_POLL_INTERVAL);
        }
    }

    /// Breaks or places a block where the player is looking.
    ///
    /// # Returns
    ///
    /// The chunks queued for remeshing, or `None` when the ray found nothing to edit.
    pub fn apply_block_action(&mut self, action: BlockAction) -> Option<HashSet<ChunkPosition>> {
        let camera = &self.camera_state.camera;
        let reach = self.config.physics.reach;
        let touched = {
            let world = self.world.get();
            match action {
                BlockAction::Break => raycast::break_targeted_block(&world, camera.position, camera.front(), reach),
                BlockAction::Place => raycast::place_targeted_block(&world, camera.position, camera.front(), reach),
            }
        }?;

        self.pending_meshes.extend(touched.iter().copied());
        Some(touched)
    }

    /// Rebuilds every pending mesh and hands it to `renderer`.
    ///
    /// Must run on the thread that owns the renderer.
    ///
    /// # Returns
    ///
    /// The number of chunks remeshed.
    pub fn render(&mut self, renderer: &mut dyn Renderer) -> usize {
        if self.pending_meshes.is_empty() {
            return 0;
        }
        let positions = self.pending_meshes.drain();
        let world = self.world.get();
        meshing::remesh_chunks(&world, positions, renderer, self.config.meshing)
    }
}

/// Generates every layer of `columns`, spreading the columns over `workers`
/// scoped threads.
fn generate_columns(
    generator: &dyn TerrainGenerator,
    columns: &[ColumnPosition],
    (min_y, max_y): (i32, i32),
    workers: usize,
) -> Vec<Chunk> {
    if columns.is_empty() {
        return Vec::new();
    }
    let batch_size = columns.len().div_ceil(workers.max(1));

    thread::scope(|scope| {
        let handles: Vec<_> = columns
            .chunks(batch_size)
            .map(|batch| {
                scope.spawn(move || {
                    batch
                        .iter()
                        .flat_map(|column| (min_y..=max_y).map(move |y| column.chunk_at(y)))
                        .map(|position| generator.generate(position))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| match handle.join() {
                Ok(chunks) => chunks,
                Err(_) => {
                    warn!("A terrain generation thread panicked, its columns stay empty");
                    Vec::new()
                }
            })
            .collect()
    })
}

/// Represents player actions derived from input
///
/// This struct contains flags for various player actions that can be
/// triggered by input, such as movement, camera control, and block edits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerAction {
    /// Movement actions - true if key is pressed or held
    pub move_forward: bool,
    pub move_backward: bool,
    pub move_left: bool,
    pub move_right: bool,
    /// Jump, or rise while flying
    pub move_up: bool,
    /// Sink while flying
    pub move_down: bool,
    pub sprint: bool,

    /// View rotation - Some if the mouse moved
    pub rotate_view: Option<(f64, f64)>,

    /// Actions that should only trigger on key press, not hold
    pub toggle_flying: bool,
    pub break_block: bool,
    pub place_block: bool,
}

impl PlayerAction {
    /// The movement part of the actions.
    pub fn movement_intent(&self) -> MovementIntent {
        let axis = |positive: bool, negative: bool| positive as i32 as f32 - negative as i32 as f32;
        MovementIntent {
            forward: axis(self.move_forward, self.move_backward),
            right: axis(self.move_right, self.move_left),
            up: axis(self.move_up, self.move_down),
            jump: self.move_up,
            sprint: self.sprint,
        }
    }
}
