//! Vertex data structures for voxel rendering.
//!
//! This module defines the vertex format the mesh builder produces. The
//! renderer uploads the records as raw bytes, so the layout is fixed.

/// A vertex of a chunk mesh.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Light: f32 (4 bytes)
/// - Tint: 3x f32 (12 bytes)
/// - Overlay Texture Coordinates: [f32; 2] (8 bytes)
///
/// Total size: 44 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VertexRecord {
    /// Position in world space
    pub position: [f32; 3],
    /// Atlas texture coordinates (normalized 0.0-1.0)
    pub uv: [f32; 2],
    /// Brightness multiplier: light level, face shading and ambient occlusion
    pub light: f32,
    /// Colour multiplier applied to the texture
    pub tint: [f32; 3],
    /// Atlas coordinates of an overlay drawn untinted on top, or [`NO_OVERLAY`]
    pub overlay_uv: [f32; 2],
}

/// Overlay coordinates meaning "no overlay".
pub const NO_OVERLAY: [f32; 2] = [-1.0, -1.0];

/// Tint that leaves the texture unchanged.
pub const NO_TINT: [f32; 3] = [1.0, 1.0, 1.0];

impl VertexRecord {
    /// Size of one record in bytes.
    pub const SIZE: usize = std::mem::size_of::<VertexRecord>();

    /// Views a vertex buffer as the bytes a renderer uploads.
    pub fn as_bytes(vertices: &[VertexRecord]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }
}
