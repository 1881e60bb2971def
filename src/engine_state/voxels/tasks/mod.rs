//! # Voxel Task System
//!
//! Background tasks that bring chunks into the world. Generation and lighting
//! run on the worker pool; their results hand the affected chunks to the main
//! thread for remeshing.

pub mod chunk_generation_task;

pub use chunk_generation_task::ChunkColumnGenerationTask;
