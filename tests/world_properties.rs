//! End-to-end properties of lighting, meshing, collision and editing,
//! exercised through the public API only.

use std::collections::{BTreeMap, HashSet};

use cgmath::{Point3, Rad, Vector3};

use voxel_world::config::{EngineConfig, GenerationMethod, MeshingConfig, WorldConfig};
use voxel_world::engine_state::physics::{collision, raycast};
use voxel_world::engine_state::rendering::meshing::{build_chunk_mesh, VERTICES_PER_FACE};
use voxel_world::engine_state::rendering::HeadlessRenderer;
use voxel_world::engine_state::voxels::block::block_side::BlockSide;
use voxel_world::engine_state::voxels::block::block_type::BlockType;
use voxel_world::engine_state::voxels::block::Block;
use voxel_world::engine_state::voxels::chunk::{BlockPosition, Chunk, ChunkPosition, CHUNK_DIMENSION};
use voxel_world::engine_state::voxels::terrain::{FlatTerrainGenerator, NoiseTerrainGenerator, TerrainGenerator};
use voxel_world::engine_state::voxels::world::World;
use voxel_world::engine_state::voxels::{edit, lighting};
use voxel_world::engine_state::{EngineState, PlayerAction};
use web_time::Duration;

fn single_chunk(blocks: &[(i32, i32, i32, BlockType)]) -> World {
    let mut world = World::new();
    world.insert(Chunk::empty(ChunkPosition::new(0, 0, 0)));
    for &(x, y, z, block_type) in blocks {
        world.set_block_type_at(Point3::new(x, y, z), block_type);
    }
    world
}

fn floor_at_zero() -> Vec<(i32, i32, i32, BlockType)> {
    let mut blocks = Vec::new();
    for x in 0..CHUNK_DIMENSION {
        for z in 0..CHUNK_DIMENSION {
            blocks.push((x, 0, z, BlockType::STONE));
        }
    }
    blocks
}

fn generated(generator: &dyn TerrainGenerator, positions: impl IntoIterator<Item = ChunkPosition>) -> World {
    let mut world = World::new();
    for position in positions {
        world.add_chunk_at(position, generator);
    }
    world
}

fn snapshot(world: &World) -> BTreeMap<ChunkPosition, Vec<Block>> {
    world
        .positions()
        .filter_map(|position| world.get(position).map(|chunk| (position, chunk.blocks().to_vec())))
        .collect()
}

fn sun(world: &World, x: i32, y: i32, z: i32) -> u8 {
    world.block_at(Point3::new(x, y, z)).map_or(0, |block| block.sun_light)
}

#[test]
fn open_sky_lights_full_shafts_down_to_the_floor() {
    let world = single_chunk(&floor_at_zero());
    lighting::relight_world(&world);

    for x in 0..CHUNK_DIMENSION {
        for z in 0..CHUNK_DIMENSION {
            for y in 1..CHUNK_DIMENSION {
                assert_eq!(sun(&world, x, y, z), 15, "({}, {}, {})", x, y, z);
            }
            assert!(world.is_solid_at(Point3::new(x, 0, z)));
            assert_eq!(sun(&world, x, 0, z), 0);
        }
    }
}

#[test]
fn sunlight_only_falls_off_with_distance_from_the_sky() {
    let mut blocks = floor_at_zero();
    for x in 4..=11 {
        for z in 4..=11 {
            blocks.push((x, 10, z, BlockType::STONE));
        }
    }
    let world = single_chunk(&blocks);
    lighting::relight_world(&world);

    assert!(sun(&world, 8, 5, 8) > 0);
    assert!(sun(&world, 8, 5, 8) < 15);

    let chunk = world.get(ChunkPosition::new(0, 0, 0)).unwrap();
    for position in BlockPosition::all() {
        let block = chunk.block_at(position);
        if !block.is_transparent() {
            continue;
        }
        let level = block.sun_light;
        let mut best = 0;

        for side in BlockSide::all() {
            let (step, local) = position.step(side.offset());
            if step != Vector3::new(0, 0, 0) {
                continue;
            }
            let neighbor = chunk.block_at(local);
            if !neighbor.is_transparent() || neighbor.sun_light <= 1 {
                continue;
            }
            let contribution = if side == BlockSide::TOP && neighbor.sun_light == 15 {
                15
            } else {
                neighbor.sun_light - 1
            };
            assert!(
                contribution <= level,
                "{:?} at {} sees {} from {:?}",
                position,
                level,
                contribution,
                side
            );
            best = best.max(contribution);
        }

        if level > 0 && position.y() < CHUNK_DIMENSION - 1 {
            assert_eq!(best, level, "{:?} has no brighter neighbour", position);
        }
    }
}

#[test]
fn relighting_twice_changes_nothing() {
    let generator = NoiseTerrainGenerator::new(&WorldConfig::default());
    let positions = (0..2).flat_map(|x| (0..2).flat_map(move |z| (-1..=0).map(move |y| ChunkPosition::new(x, y, z))));
    let world = generated(&generator, positions);
    world.set_block_type_at(Point3::new(8, 2, 8), BlockType::LAMP);

    lighting::relight_world(&world);
    let first = snapshot(&world);
    lighting::relight_world(&world);
    assert_eq!(snapshot(&world), first);
}

#[test]
fn enclosed_blocks_emit_no_faces() {
    let mut blocks = Vec::new();
    for x in 7..=9 {
        for y in 7..=9 {
            for z in 7..=9 {
                blocks.push((x, y, z, BlockType::STONE));
            }
        }
    }
    let world = single_chunk(&blocks);
    lighting::relight_world(&world);

    let mesh = build_chunk_mesh(&world, ChunkPosition::new(0, 0, 0), MeshingConfig::default()).unwrap();
    // Nine faces on each side of the cube, none from the centre block.
    assert_eq!(mesh.vertices.len(), 6 * 9 * VERTICES_PER_FACE);
    assert!(mesh.vertices.iter().all(|vertex| {
        vertex.position.iter().any(|&c| c == 6.5 || c == 9.5)
    }));
}

#[test]
fn flat_floor_meshes_one_lit_quad_per_block() {
    let world = generated(&FlatTerrainGenerator::new(0), [ChunkPosition::new(0, 0, 0)]);
    lighting::relight_world(&world);

    for y in 1..CHUNK_DIMENSION {
        assert_eq!(sun(&world, 3, y, 12), 15);
    }

    let mesh = build_chunk_mesh(&world, ChunkPosition::new(0, 0, 0), MeshingConfig::default()).unwrap();
    assert_eq!(mesh.vertices.len(), 256 * VERTICES_PER_FACE);
    assert_eq!(mesh.triangle_count, 512);
    for vertex in &mesh.vertices {
        assert_eq!(vertex.position[1], 0.5);
        assert!((vertex.light - 0.8).abs() < 1e-6);
    }
}

#[test]
fn resting_on_a_block_grounds_the_player() {
    let world = single_chunk(&floor_at_zero());
    let mut eye = Point3::new(5.0, 2.0, 5.0);
    let mut velocity = Vector3::new(0.0, -0.2, 0.0);

    assert!(collision::resolve_movement(&world, &mut eye, &mut velocity));
    assert_eq!(velocity.y, 0.0);
    assert!((eye.y - 2.0).abs() < 0.01);
}

#[test]
fn breaking_then_placing_restores_blocks_and_light() {
    let generator = FlatTerrainGenerator::new(4);
    let positions = (-1..=1).flat_map(|x| (-1..=1).map(move |z| ChunkPosition::new(x, 0, z)));
    let world = generated(&generator, positions);
    lighting::relight_world(&world);
    let before = snapshot(&world);

    let target = Point3::new(0, 4, 0);
    let touched = edit::break_block(&world, target).unwrap();
    // x = 0 is a chunk border, so the western neighbour is remeshed as well.
    assert!(touched.contains(&ChunkPosition::new(0, 0, 0)));
    assert!(touched.contains(&ChunkPosition::new(-1, 0, 0)));
    assert!(!world.is_solid_at(target));
    assert_eq!(sun(&world, 0, 4, 0), 15);

    assert!(edit::place_block(&world, target, BlockType::GRASS).is_some());
    assert!(world.is_solid_at(target));
    assert_eq!(snapshot(&world), before);

    lighting::relight_world(&world);
    assert_eq!(snapshot(&world), before);
}

#[test]
fn breaking_a_pillar_top_remeshes_only_its_chunk() {
    let world = single_chunk(&[
        (8, 0, 8, BlockType::STONE),
        (8, 1, 8, BlockType::STONE),
        (8, 2, 8, BlockType::STONE),
    ]);
    lighting::relight_world(&world);
    assert_eq!(sun(&world, 8, 2, 8), 0);

    let touched = edit::break_block(&world, Point3::new(8, 2, 8)).unwrap();
    assert_eq!(touched, HashSet::from([ChunkPosition::new(0, 0, 0)]));
    assert_eq!(sun(&world, 8, 2, 8), 15);
}

#[test]
fn engine_walks_and_digs_on_a_flat_world() {
    let mut config = EngineConfig::default();
    config.world.generation = GenerationMethod::Flat;
    config.world.flat_height = 4;
    config.world.render_distance = 1;
    config.world.min_chunk_y = 0;
    config.world.max_chunk_y = 0;
    config.streaming.workers = 1;

    let mut engine = EngineState::new(config);
    let mut renderer = HeadlessRenderer::new();
    assert_eq!(engine.render(&mut renderer), 5);
    assert_eq!(renderer.live_meshes(), 5);

    let frame = Duration::from_secs_f32(engine.config.physics.tick_duration());
    for _ in 0..20 {
        engine.set_player_actions(PlayerAction {
            move_forward: true,
            ..Default::default()
        });
        engine.update(frame).unwrap();
    }
    let eye = engine.camera_state.camera.position;
    assert!(eye.x > 1.0);
    assert!((eye.y - 6.0).abs() < 0.01);
    assert!(engine.player.grounded);

    // Let the walk damp out so the eye stays put while aiming.
    for _ in 0..30 {
        engine.update(frame).unwrap();
    }

    engine.camera_state.camera.pitch = Rad(-1.5);
    let camera = engine.camera_state.camera;
    let target = {
        let world = engine.world.get();
        raycast::find_break_target(&world, camera.position, camera.front(), engine.config.physics.reach).unwrap()
    };
    assert_eq!(target.y, 4);

    engine.set_player_actions(PlayerAction {
        break_block: true,
        ..Default::default()
    });
    engine.update(frame).unwrap();
    assert!(!engine.world.get().is_solid_at(target));
    assert!(engine.render(&mut renderer) >= 1);
    assert_eq!(renderer.live_meshes(), 5);
}
