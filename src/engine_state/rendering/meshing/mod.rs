//! Mesh generation for voxel rendering.
//!
//! This module turns the solid blocks of a chunk into a flat list of
//! [`VertexRecord`]s, two triangles per visible face.
//!
//! # Architecture
//! - `neighborhood`: padded snapshot of the chunk plus a one-block shell
//! - `face`: per-side orientation (normal and texture axes)
//! - `ambient_occlusion`: corner darkening lookups
//!
//! # Pipeline
//! For each solid block and each of its six faces:
//! 1. The cell across the face is looked up in the snapshot. Solid cells and
//!    cells of unloaded chunks hide the face.
//! 2. The face takes the light level of that open cell (or, with smooth
//!    lighting, the average over the open cells touching each corner), scaled
//!    by the side's fixed shade.
//! 3. Ambient occlusion darkens each corner by how many of its three
//!    surrounding cells are solid.
//! 4. Six vertices are written. The quad diagonal is chosen so it runs
//!    between the two less occluded corners, which keeps AO gradients smooth.
//!
//! # Performance Considerations
//! - Only set bits of the chunk's solid array are visited
//! - All neighbour lookups hit the snapshot, never the world
//! - Chunks with no solid blocks return before the snapshot is built

use cgmath::{Point3, Vector3};
use log::debug;

use crate::config::MeshingConfig;
use crate::engine_state::voxels::block::{
    block_side::BlockSide, block_type::BlockType, Block, GRASS_SIDE_OVERLAY_TEXTURE_INDEX, MAX_LIGHT,
};
use crate::engine_state::voxels::chunk::{BlockPosition, ChunkPosition};
use crate::engine_state::voxels::world::World;

use super::atlas::tile_rect;
use super::{Renderer, VertexRecord, NO_OVERLAY, NO_TINT};

pub mod ambient_occlusion;
pub mod face;
pub mod neighborhood;

use ambient_occlusion::{corner_cells, corner_occlusion, AO_TABLE};
use face::{FaceGeometry, CORNERS};
use neighborhood::Neighborhood;

/// Foliage colour multiplied into grass textures.
pub const GRASS_TINT: [f32; 3] = [0.486, 0.741, 0.419];

/// Vertices emitted per visible face.
pub const VERTICES_PER_FACE: usize = 6;

/// The geometry of one chunk.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ChunkMesh {
    pub vertices: Vec<VertexRecord>,
    pub triangle_count: u32,
}

impl ChunkMesh {
    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Builds the mesh of the chunk at `position`.
///
/// # Returns
/// `None` when the chunk is not loaded. A loaded chunk without visible faces
/// yields an empty mesh.
pub fn build_chunk_mesh(world: &World, position: ChunkPosition, options: MeshingConfig) -> Option<ChunkMesh> {
    let blocks: Vec<(BlockPosition, Block)> = world.get(position)?.solid_blocks().collect();
    if blocks.is_empty() {
        return Some(ChunkMesh::default());
    }

    let neighborhood = Neighborhood::capture(world, position);
    let origin = position.origin();
    let mut vertices = Vec::new();

    for (block_position, block) in blocks {
        let local = Vector3::new(block_position.x(), block_position.y(), block_position.z());
        let center = Point3::new(
            (origin.x + local.x) as f32,
            (origin.y + local.y) as f32,
            (origin.z + local.z) as f32,
        );

        for side in BlockSide::all() {
            let face_cell = local + side.offset();
            if neighborhood.occludes_face(face_cell) {
                continue;
            }
            emit_face(&mut vertices, &neighborhood, block, side, center, face_cell, options);
        }
    }

    let triangle_count = (vertices.len() / 3) as u32;
    Some(ChunkMesh {
        vertices,
        triangle_count,
    })
}

/// Light level feeding corner `(su, sv)` of a face, 0..=15 as a float.
fn corner_light(
    neighborhood: &Neighborhood,
    face_cell: Vector3<i32>,
    geometry: &FaceGeometry,
    su: i32,
    sv: i32,
    smooth: bool,
) -> f32 {
    let direct = neighborhood.sample(face_cell).light as f32;
    if !smooth {
        return direct;
    }

    let mut total = direct;
    let mut count = 1.0;
    for cell in corner_cells(face_cell, geometry, su, sv) {
        let sample = neighborhood.sample(cell);
        if sample.loaded && !sample.solid {
            total += sample.light as f32;
            count += 1.0;
        }
    }
    total / count
}

fn emit_face(
    vertices: &mut Vec<VertexRecord>,
    neighborhood: &Neighborhood,
    block: Block,
    side: BlockSide,
    center: Point3<f32>,
    face_cell: Vector3<i32>,
    options: MeshingConfig,
) {
    let geometry = FaceGeometry::of(side);
    let texture = tile_rect(Block::get_texture_indices_from_int(block.block_type)[side as usize]);

    let is_grass = block.block_type == BlockType::GRASS as u8;
    let tint = if is_grass && side != BlockSide::BOTTOM {
        GRASS_TINT
    } else {
        NO_TINT
    };
    let overlay = (is_grass && side != BlockSide::TOP && side != BlockSide::BOTTOM)
        .then(|| tile_rect(GRASS_SIDE_OVERLAY_TEXTURE_INDEX));

    let mut occlusion = [0usize; 4];
    let mut corners = [VertexRecord {
        position: [0.0; 3],
        uv: [0.0; 2],
        light: 0.0,
        tint,
        overlay_uv: NO_OVERLAY,
    }; 4];

    for (i, (su, sv)) in CORNERS.into_iter().enumerate() {
        if options.ambient_occlusion {
            occlusion[i] = corner_occlusion(neighborhood, face_cell, &geometry, su, sv);
        }
        let level = corner_light(neighborhood, face_cell, &geometry, su, sv, options.smooth_lighting);
        let position = center + geometry.corner_offset(su, sv);

        corners[i] = VertexRecord {
            position: [position.x, position.y, position.z],
            uv: texture.corner(su, sv),
            light: level / MAX_LIGHT as f32 * side.shade() * AO_TABLE[occlusion[i]],
            tint,
            overlay_uv: overlay.map_or(NO_OVERLAY, |rect| rect.corner(su, sv)),
        };
    }

    let order = if occlusion[0] + occlusion[2] > occlusion[1] + occlusion[3] {
        [1, 2, 3, 1, 3, 0]
    } else {
        [0, 1, 2, 0, 2, 3]
    };
    vertices.extend(order.iter().map(|&i| corners[i]));
}

/// Rebuilds and uploads the meshes of `positions`.
///
/// Each chunk's previous mesh is released once its replacement is stored.
/// Chunks without visible faces end up with no handle. Positions that are not
/// loaded are skipped.
///
/// # Returns
/// The number of chunks remeshed.
pub fn remesh_chunks<I>(world: &World, positions: I, renderer: &mut dyn Renderer, options: MeshingConfig) -> usize
where
    I: IntoIterator<Item = ChunkPosition>,
{
    let mut remeshed = 0;

    for position in positions {
        let Some(mesh) = build_chunk_mesh(world, position, options) else {
            continue;
        };
        let handle = (!mesh.is_empty()).then(|| renderer.upload_mesh(&mesh.vertices));

        let previous = match world.get_mut(position) {
            Some(mut chunk) => {
                chunk.triangle_count = mesh.triangle_count;
                std::mem::replace(&mut chunk.render_handle, handle)
            }
            None => handle,
        };
        if let Some(previous) = previous {
            renderer.release(previous);
        }
        remeshed += 1;
    }

    if remeshed > 0 {
        debug!("Remeshed {} chunks", remeshed);
    }
    remeshed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::HeadlessRenderer;
    use crate::engine_state::voxels::chunk::Chunk;
    use crate::engine_state::voxels::lighting;

    fn options() -> MeshingConfig {
        MeshingConfig {
            ambient_occlusion: true,
            smooth_lighting: false,
        }
    }

    fn world_with(blocks: &[(i32, i32, i32, BlockType)]) -> World {
        let mut world = World::new();
        world.insert(Chunk::empty(ChunkPosition::new(0, 0, 0)));
        for &(x, y, z, block_type) in blocks {
            world.set_block_type_at(Point3::new(x, y, z), block_type);
        }
        lighting::relight_world(&world);
        world
    }

    #[test]
    fn empty_chunks_produce_empty_meshes() {
        let world = world_with(&[]);
        let mesh = build_chunk_mesh(&world, ChunkPosition::new(0, 0, 0), options()).unwrap();
        assert!(mesh.is_empty());
        assert_eq!(mesh.triangle_count, 0);
        assert!(build_chunk_mesh(&world, ChunkPosition::new(3, 0, 0), options()).is_none());
    }

    #[test]
    fn a_floating_block_has_six_faces() {
        let world = world_with(&[(8, 8, 8, BlockType::STONE)]);
        let mesh = build_chunk_mesh(&world, ChunkPosition::new(0, 0, 0), options()).unwrap();
        assert_eq!(mesh.vertices.len(), 6 * VERTICES_PER_FACE);
        assert_eq!(mesh.triangle_count, 12);
    }

    fn faces(mesh: &ChunkMesh) -> impl Iterator<Item = &[VertexRecord]> {
        mesh.vertices.chunks(VERTICES_PER_FACE)
    }

    fn all_at_height(face: &[VertexRecord], y: f32) -> bool {
        face.iter().all(|v| v.position[1] == y)
    }

    #[test]
    fn enclosed_blocks_emit_nothing() {
        let mut shell = Vec::new();
        for side in BlockSide::all() {
            let offset = side.offset();
            shell.push((8 + offset.x, 8 + offset.y, 8 + offset.z, BlockType::DIRT));
        }
        let hollow = world_with(&shell);
        let hollow_mesh = build_chunk_mesh(&hollow, ChunkPosition::new(0, 0, 0), options()).unwrap();
        assert_eq!(hollow_mesh.vertices.len(), 6 * 6 * VERTICES_PER_FACE);

        shell.push((8, 8, 8, BlockType::STONE));
        let filled = world_with(&shell);
        let mesh = build_chunk_mesh(&filled, ChunkPosition::new(0, 0, 0), options()).unwrap();
        // The centre block adds nothing and hides one face of each shell block.
        assert_eq!(mesh.vertices.len(), 6 * 5 * VERTICES_PER_FACE);
    }

    #[test]
    fn top_faces_of_open_ground_use_the_top_shade() {
        let world = world_with(&[(4, 0, 4, BlockType::STONE)]);
        let mesh = build_chunk_mesh(&world, ChunkPosition::new(0, 0, 0), options()).unwrap();
        let top: Vec<_> = faces(&mesh).filter(|face| all_at_height(face, 0.5)).collect();
        assert_eq!(top.len(), 1);
        assert!(top[0].iter().all(|v| (v.light - 0.8).abs() < 1e-6));
        // The face towards the unloaded chunk below stays closed.
        assert_eq!(faces(&mesh).filter(|face| all_at_height(face, -0.5)).count(), 0);
    }

    #[test]
    fn corners_against_walls_are_darkened() {
        let world = world_with(&[(4, 4, 4, BlockType::STONE), (5, 5, 4, BlockType::STONE)]);
        let mesh = build_chunk_mesh(&world, ChunkPosition::new(0, 0, 0), options()).unwrap();
        let top: Vec<_> = faces(&mesh)
            .filter(|face| all_at_height(face, 4.5) && face.iter().all(|v| v.position[0] <= 4.5))
            .collect();
        assert_eq!(top.len(), 1);
        assert!(top[0].iter().any(|v| v.position[0] == 4.5 && v.light < 0.8 * 0.9));
        assert!(top[0].iter().any(|v| v.position[0] == 3.5 && (v.light - 0.8).abs() < 1e-6));
    }

    #[test]
    fn grass_sides_carry_tint_and_overlay() {
        let world = world_with(&[(4, 4, 4, BlockType::GRASS)]);
        let mesh = build_chunk_mesh(&world, ChunkPosition::new(0, 0, 0), options()).unwrap();
        assert_eq!(faces(&mesh).count(), 6);

        for face in faces(&mesh) {
            for vertex in face {
                if all_at_height(face, 4.5) {
                    assert_eq!(vertex.tint, GRASS_TINT);
                    assert_eq!(vertex.overlay_uv, NO_OVERLAY);
                } else if all_at_height(face, 3.5) {
                    assert_eq!(vertex.tint, NO_TINT);
                    assert_eq!(vertex.overlay_uv, NO_OVERLAY);
                } else {
                    assert_eq!(vertex.tint, GRASS_TINT);
                    assert_ne!(vertex.overlay_uv, NO_OVERLAY);
                }
            }
        }
    }

    #[test]
    fn remeshing_replaces_handles() {
        let world = world_with(&[(1, 1, 1, BlockType::DIRT)]);
        let position = ChunkPosition::new(0, 0, 0);
        let mut renderer = HeadlessRenderer::new();

        assert_eq!(remesh_chunks(&world, [position], &mut renderer, options()), 1);
        let first = world.get(position).unwrap().render_handle.unwrap();
        remesh_chunks(&world, [position], &mut renderer, options());
        let second = world.get(position).unwrap().render_handle.unwrap();
        assert_ne!(first, second);
        assert_eq!(renderer.live_meshes(), 1);
        assert_eq!(world.get(position).unwrap().triangle_count, 12);

        world.set_block_type_at(Point3::new(1, 1, 1), BlockType::AIR);
        remesh_chunks(&world, [position, ChunkPosition::new(9, 9, 9)], &mut renderer, options());
        assert!(world.get(position).unwrap().render_handle.is_none());
        assert_eq!(renderer.live_meshes(), 0);
    }
}
