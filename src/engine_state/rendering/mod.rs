//! Rendering system for the voxel engine.
//!
//! The engine core never draws. It turns chunks into vertex buffers (see
//! [`meshing`]) and hands them to a [`Renderer`], which owns whatever GPU
//! resources back them and gives out opaque [`RenderHandle`]s in return.
//!
//! Mesh builds are requested from anywhere (edits, streaming results) by
//! adding chunk positions to [`PendingMeshes`]; the set is drained on the main
//! thread right before drawing, because GPU resources must be created on the
//! thread that owns the device.

use std::collections::{HashMap, HashSet};

use log::trace;

use super::voxels::chunk::ChunkPosition;

pub mod atlas;
pub mod meshing;
mod vertex;

// Re-export commonly used types
pub use vertex::{VertexRecord, NO_OVERLAY, NO_TINT};

/// Identifies an uploaded mesh. Only the renderer that issued it knows what it
/// refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RenderHandle(pub u32);

/// Receives finished chunk meshes.
pub trait Renderer {
    /// Uploads a non-empty vertex buffer and returns its handle.
    fn upload_mesh(&mut self, vertices: &[VertexRecord]) -> RenderHandle;

    /// Frees a mesh that was replaced or whose chunk no longer has geometry.
    fn release(&mut self, handle: RenderHandle);
}

/// A renderer without a GPU. It keeps track of uploads so headless runs and
/// tests can inspect what would have been drawn.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    next_handle: u32,
    /// Vertex count of every live mesh.
    meshes: HashMap<RenderHandle, usize>,
    uploads: usize,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of meshes currently held.
    pub fn live_meshes(&self) -> usize {
        self.meshes.len()
    }

    /// Total uploads since creation, including replaced meshes.
    pub fn uploads(&self) -> usize {
        self.uploads
    }

    pub fn vertex_count(&self, handle: RenderHandle) -> Option<usize> {
        self.meshes.get(&handle).copied()
    }

    /// Vertices across all live meshes.
    pub fn total_vertices(&self) -> usize {
        self.meshes.values().sum()
    }
}

impl Renderer for HeadlessRenderer {
    fn upload_mesh(&mut self, vertices: &[VertexRecord]) -> RenderHandle {
        let handle = RenderHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.meshes.insert(handle, vertices.len());
        self.uploads += 1;
        trace!("Uploaded {:?} with {} vertices", handle, vertices.len());
        handle
    }

    fn release(&mut self, handle: RenderHandle) {
        self.meshes.remove(&handle);
    }
}

/// Chunks waiting for a mesh rebuild, keyed by position.
#[derive(Debug, Default)]
pub struct PendingMeshes {
    positions: HashSet<ChunkPosition>,
}

impl PendingMeshes {
    pub fn request(&mut self, position: ChunkPosition) {
        self.positions.insert(position);
    }

    pub fn contains(&self, position: ChunkPosition) -> bool {
        self.positions.contains(&position)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Takes every pending position, in a stable order.
    pub fn drain(&mut self) -> Vec<ChunkPosition> {
        let mut positions: Vec<ChunkPosition> = self.positions.drain().collect();
        positions.sort();
        positions
    }
}

impl Extend<ChunkPosition> for PendingMeshes {
    fn extend<T: IntoIterator<Item = ChunkPosition>>(&mut self, iter: T) {
        self.positions.extend(iter);
    }
}
