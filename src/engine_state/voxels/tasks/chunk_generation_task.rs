//! # Chunk Column Generation Task
//!
//! This module defines the `ChunkColumnGenerationTask`, which streams one
//! vertical column of chunks into the world. It is scheduled by the engine's
//! streaming timer for every column inside the render distance that has not
//! been requested yet.

use std::collections::HashSet;
use std::sync::Arc;

use log::debug;

use crate::core::MtResource;
use crate::engine_state::task_management::task::{Task, TaskContext, TaskResult};
use crate::engine_state::voxels::block::block_side::BlockSide;
use crate::engine_state::voxels::chunk::{Chunk, ChunkPosition, ColumnPosition};
use crate::engine_state::voxels::lighting;
use crate::engine_state::voxels::terrain::TerrainGenerator;
use crate::engine_state::voxels::world::World;

/// A task that generates and lights one chunk column.
///
/// This task is responsible for:
/// 1. Generating every missing layer of the column (no locks held)
/// 2. Registering the new chunks and lighting them under one grid write lock
pub struct ChunkColumnGenerationTask {
    /// A thread-safe reference to the world where the chunks will be added
    world: MtResource<World>,
    generator: Arc<dyn TerrainGenerator>,
    column: ColumnPosition,
    /// Lowest and highest chunk layer to generate, inclusive.
    layers: (i32, i32),
}

impl ChunkColumnGenerationTask {
    /// Creates a new column generation task.
    ///
    /// # Arguments
    /// * `world` - A thread-safe reference to the world
    /// * `generator` - The terrain generator used for every layer
    /// * `column` - The column to stream in
    /// * `layers` - The inclusive range of chunk Y layers to generate
    pub fn new(
        world: MtResource<World>,
        generator: Arc<dyn TerrainGenerator>,
        column: ColumnPosition,
        layers: (i32, i32),
    ) -> Self {
        ChunkColumnGenerationTask {
            world,
            generator,
            column,
            layers,
        }
    }
}

impl Task for ChunkColumnGenerationTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let (min_y, max_y) = self.layers;
        let missing: Vec<ChunkPosition> = {
            let world = self.world.get();
            (min_y..=max_y)
                .map(|y| self.column.chunk_at(y))
                .filter(|position| !world.contains(*position))
                .collect()
        };

        let chunks: Vec<Chunk> = missing
            .iter()
            .map(|position| self.generator.generate(*position))
            .collect();

        // Registration and lighting share one write guard. Edits relight under
        // the read guard, so the two passes never interleave on shared borders.
        let mut world = self.world.get_mut();
        let mut inserted = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            // Another task may have raced us to this position.
            if !world.contains(chunk.position) {
                inserted.push(chunk.position);
                world.insert(chunk);
            }
        }

        let touched = if inserted.is_empty() {
            HashSet::new()
        } else {
            lighting::light_new_chunks(&world, &inserted).touched
        };
        drop(world);

        Box::new(ChunkColumnGenerationTaskResult {
            column: self.column,
            inserted,
            touched,
        })
    }
}

/// The chunks a column task registered and the chunks whose light it changed.
pub struct ChunkColumnGenerationTaskResult {
    column: ColumnPosition,
    inserted: Vec<ChunkPosition>,
    touched: HashSet<ChunkPosition>,
}

impl TaskResult for ChunkColumnGenerationTaskResult {
    /// Queues the new chunks, the chunks whose light changed and the loaded
    /// neighbours whose border faces the new chunks now decide, for remeshing.
    fn handle_result(self: Box<Self>, context: &mut TaskContext<'_>) -> Vec<Box<dyn Task + Send>> {
        let world = context.world.get();

        let neighbors: Vec<ChunkPosition> = self
            .inserted
            .iter()
            .flat_map(|position| BlockSide::all().map(|side| position.offset(side.offset())))
            .filter(|position| world.contains(*position))
            .collect();

        context.pending_meshes.extend(self.inserted.iter().copied());
        context.pending_meshes.extend(self.touched);
        context.pending_meshes.extend(neighbors);

        debug!(
            "Streamed column ({}, {}): {} new chunks",
            self.column.x,
            self.column.z,
            self.inserted.len()
        );

        Vec::new()
    }
}
