//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world and the
//! static property table the rest of the engine consults for solidity,
//! transparency and light emission.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use phf::phf_map;

use crate::error::{Result, WorldError};

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// The discriminant is the id stored in every [`Block`](super::Block).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
#[repr(u8)]
pub enum BlockType {
    /// An air block, which is non-solid and transparent.
    AIR = 0,

    /// A basic dirt block. Placed blocks are always dirt.
    DIRT = 1,

    /// A grass block. The top is tinted, the sides carry a tinted overlay.
    GRASS = 2,

    /// Stone found deeper below the surface.
    STONE = 3,

    /// A wooden block with a bark texture on all sides.
    WOOD = 4,

    /// A solid block that emits block light.
    LAMP = 5,
}

/// Static properties of one block type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockProperties {
    /// Solid blocks occlude faces and stop the player.
    pub is_solid: bool,
    /// Light floods through transparent blocks.
    pub is_transparent: bool,
    /// Block light level emitted by the block itself.
    pub light_emission: u8,
}

const OPAQUE: BlockProperties = BlockProperties {
    is_solid: true,
    is_transparent: false,
    light_emission: 0,
};

/// Property table indexed by block type id. Built at compile time and never
/// mutated afterwards.
pub static BLOCK_PROPERTIES: phf::Map<u8, BlockProperties> = phf_map! {
    0u8 => BlockProperties { is_solid: false, is_transparent: true, light_emission: 0 },
    1u8 => OPAQUE,
    2u8 => OPAQUE,
    3u8 => OPAQUE,
    4u8 => OPAQUE,
    5u8 => BlockProperties { is_solid: true, is_transparent: false, light_emission: 15 },
};

/// Properties used for ids missing from the table. Unknown ids never enter a
/// chunk through the public API, this only keeps lookups total.
const UNKNOWN_PROPERTIES: BlockProperties = OPAQUE;

impl BlockType {
    /// Decodes a block type id.
    ///
    /// # Errors
    /// Returns [`WorldError::UnknownBlockType`] when `btype` names no block type.
    pub fn from_int(btype: BlockTypeSize) -> Result<Self> {
        FromPrimitive::from_u8(btype).ok_or(WorldError::UnknownBlockType(btype))
    }

    /// Looks up the static properties of this block type.
    pub fn properties(self) -> &'static BlockProperties {
        properties_of(self as BlockTypeSize)
    }
}

/// Looks up the static properties of a raw block type id.
pub fn properties_of(btype: BlockTypeSize) -> &'static BlockProperties {
    BLOCK_PROPERTIES.get(&btype).unwrap_or(&UNKNOWN_PROPERTIES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn air_is_the_only_transparent_type() {
        for id in 0..=5u8 {
            let block_type = BlockType::from_int(id).unwrap();
            let properties = block_type.properties();
            assert_eq!(properties.is_transparent, block_type == BlockType::AIR);
            assert_eq!(properties.is_solid, block_type != BlockType::AIR);
        }
    }

    #[test]
    fn only_lamps_emit_light() {
        assert_eq!(BlockType::LAMP.properties().light_emission, 15);
        assert_eq!(BlockType::GRASS.properties().light_emission, 0);
    }

    #[test]
    fn unknown_ids_are_rejected() {
        assert!(matches!(
            BlockType::from_int(200),
            Err(WorldError::UnknownBlockType(200))
        ));
    }
}
