//! # Task System Core Traits
//!
//! This module defines the two halves of a unit of background work.
//!
//! ## Core Components
//! - `Task`: the work itself, run on a worker thread
//! - `TaskResult`: what the work produced, consumed on the main thread
//! - `TaskContext`: the main-thread state a result may touch
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` is called on the main thread
//! 5. The result can queue remeshes and spawn follow-up tasks
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred between threads
//! - `TaskResult` must be `Send` to be transferred back to the main thread
//! - Shared world state is reached through `MtResource` locks only

use crate::core::MtResource;
use crate::engine_state::rendering::PendingMeshes;
use crate::engine_state::voxels::world::World;

/// A unit of work executed on a worker thread.
///
/// Tasks own everything they need (cloned `MtResource` handles, positions,
/// generator handles) so they can be moved across threads freely.
pub trait Task: Send {
    /// Processes the task and returns a result.
    ///
    /// Runs on a background thread. Implementations may block on world locks
    /// but must never take the grid write guard while holding a chunk guard.
    ///
    /// # Returns
    /// A boxed `TaskResult` that will be processed on the main thread.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// Main-thread state handed to task results.
pub struct TaskContext<'a> {
    pub world: &'a MtResource<World>,
    /// Chunks waiting to be remeshed before the next draw.
    pub pending_meshes: &'a mut PendingMeshes,
}

/// The result of processing a `Task`.
///
/// Results are handled on the main thread, so they are where background work
/// meets state that only the main thread may touch (the pending mesh set).
pub trait TaskResult: Send {
    /// Handles the result of a completed task on the main thread.
    ///
    /// # Returns
    /// Follow-up tasks to schedule (usually empty).
    fn handle_result(self: Box<Self>, context: &mut TaskContext<'_>) -> Vec<Box<dyn Task + Send>>;
}
