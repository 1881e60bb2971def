//! # Error Module
//!
//! The crate-wide error type. Only the outer surfaces of the engine return it:
//! configuration loading, decoding block ids coming from outside the crate, and
//! talking to the worker pool. Missing chunks, coordinates that cross a chunk
//! border and empty meshes are ordinary values in the core and never show up here.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the voxel world.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("Failed to read config file {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown block type id: {0}")]
    UnknownBlockType(u8),

    #[error("Worker pool disconnected")]
    WorkersDisconnected,
}

/// Convenience alias used by fallible functions in this crate.
pub type Result<T> = std::result::Result<T, WorldError>;
