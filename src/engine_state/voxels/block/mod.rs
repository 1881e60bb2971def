//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, block face handling, and block data structures.

use block_type::{properties_of, BlockProperties, BlockType};

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// Highest light level of either channel.
pub const MAX_LIGHT: u8 = 15;

/// Maps each block type to its atlas tile for each face.
///
/// The outer array is indexed by `BlockType` as a `usize`.
/// The inner array contains 6 tile indices, one for each face in the order:
/// [Front, Back, Bottom, Top, Left, Right]
pub static BLOCK_TYPE_TO_TEXTURE_INDICES: [[usize; 6]; 6] = [
    [0, 0, 0, 0, 0, 0], // AIR (never meshed)
    [0, 0, 0, 0, 0, 0], // DIRT
    [2, 2, 0, 1, 2, 2], // GRASS (top: 1, bottom: dirt, sides: 2)
    [3, 3, 3, 3, 3, 3], // STONE
    [4, 4, 4, 4, 4, 4], // WOOD
    [5, 5, 5, 5, 5, 5], // LAMP
];

/// Atlas tile drawn on top of grass sides and tinted with the foliage colour.
pub const GRASS_SIDE_OVERLAY_TEXTURE_INDEX: usize = 6;

/// Which light field a light pass reads and writes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LightChannel {
    /// Light falling from the sky
    Sun,
    /// Light emitted by blocks such as lamps
    Block,
}

/// Represents a single voxel block in the world.
///
/// The block type selects the static properties; the two light fields are the
/// mutable per-block state written by the light propagation engine.
///
/// # Memory Layout
/// Three bytes, `#[repr(C)]`, so a chunk's block array can be copied around as
/// raw bytes. The all-zero block is unlit air.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq, Eq, Default)]
pub struct Block {
    /// The type of this block, encoded as a `BlockTypeSize` for compact storage.
    pub block_type: BlockTypeSize,
    /// Light emitted by nearby light sources, 0..=15.
    pub block_light: u8,
    /// Light coming from the sky, 0..=15.
    pub sun_light: u8,
}

impl Block {
    /// Creates a new, unlit block of the specified type.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            block_type: block_type as BlockTypeSize,
            block_light: 0,
            sun_light: 0,
        }
    }

    /// Unlit air.
    pub const fn air() -> Self {
        Block {
            block_type: BlockType::AIR as BlockTypeSize,
            block_light: 0,
            sun_light: 0,
        }
    }

    /// The static properties of this block's type.
    pub fn properties(&self) -> &'static BlockProperties {
        properties_of(self.block_type)
    }

    pub fn is_solid(&self) -> bool {
        self.properties().is_solid
    }

    pub fn is_transparent(&self) -> bool {
        self.properties().is_transparent
    }

    /// Brightness used for shading: the brighter of the two channels.
    pub fn light_level(&self) -> u8 {
        self.block_light.max(self.sun_light)
    }

    /// Reads one light channel.
    pub fn light(&self, channel: LightChannel) -> u8 {
        match channel {
            LightChannel::Sun => self.sun_light,
            LightChannel::Block => self.block_light,
        }
    }

    /// Writes one light channel, clamped to [`MAX_LIGHT`].
    pub fn set_light(&mut self, channel: LightChannel, level: u8) {
        let level = level.min(MAX_LIGHT);
        match channel {
            LightChannel::Sun => self.sun_light = level,
            LightChannel::Block => self.block_light = level,
        }
    }

    /// Gets the atlas tiles for all faces of a block given its type as an integer.
    ///
    /// Ids outside the table fall back to the dirt tiles.
    pub fn get_texture_indices_from_int(btype_int: BlockTypeSize) -> [usize; 6] {
        BLOCK_TYPE_TO_TEXTURE_INDICES
            .get(btype_int as usize)
            .copied()
            .unwrap_or(BLOCK_TYPE_TO_TEXTURE_INDICES[BlockType::DIRT as usize])
    }
}
