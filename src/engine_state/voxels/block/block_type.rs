//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! It provides functionality for block type identification, conversion from the
//! compact storage code, and lookup by hotbar name.

use num_derive::FromPrimitive;
use phf::phf_map;
use serde::{Deserialize, Serialize};

use super::BlockTypeSize;

/// Number of distinct block types, including `Air`.
pub const BLOCK_TYPE_COUNT: usize = 9;

/// Enumerates all possible block types in the voxel world.
///
/// The discriminants are the storage codes written into the voxel grid, so they
/// must stay stable. The `FromPrimitive` derive gives the reverse conversion.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum BlockType {
    /// Empty space. Never rendered, never collides.
    Air = 0,
    /// Top layer of dry land.
    Grass = 1,
    /// The few layers under grass.
    Dirt = 2,
    /// Bulk of the terrain.
    Stone = 3,
    /// Tree trunks.
    Wood = 4,
    /// Tree canopies. Rendered, but passable and see-through for culling.
    Leaves = 5,
    /// Beaches around the waterline.
    Sand = 6,
    /// Fills terrain below the water level. Translucent and swimmable.
    Water = 7,
    /// The indestructible floor at `y = 0`.
    Bedrock = 8,
}

/// Hotbar slot names understood by [`BlockType::from_hotbar_name`].
static HOTBAR_NAMES: phf::Map<&'static str, BlockType> = phf_map! {
    "grass" => BlockType::Grass,
    "dirt" => BlockType::Dirt,
    "stone" => BlockType::Stone,
    "wood" => BlockType::Wood,
    "leaves" => BlockType::Leaves,
    "sand" => BlockType::Sand,
    "water" => BlockType::Water,
};

impl BlockType {
    /// Every block type in code order.
    pub const ALL: [BlockType; BLOCK_TYPE_COUNT] = [
        BlockType::Air,
        BlockType::Grass,
        BlockType::Dirt,
        BlockType::Stone,
        BlockType::Wood,
        BlockType::Leaves,
        BlockType::Sand,
        BlockType::Water,
        BlockType::Bedrock,
    ];

    /// Converts a storage code back into a `BlockType`.
    ///
    /// Codes that do not name a block decode as `Air`, so a corrupted cell can
    /// never become solid.
    pub fn from_code(code: BlockTypeSize) -> Self {
        num_traits::FromPrimitive::from_u8(code).unwrap_or(BlockType::Air)
    }

    /// The compact storage code of this block type.
    #[inline]
    pub const fn code(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Looks up a hotbar slot name such as `"stone"`.
    pub fn from_hotbar_name(name: &str) -> Option<Self> {
        HOTBAR_NAMES.get(name).copied()
    }

    /// Resolves a hotbar selection, falling back to `Grass` for unknown names.
    pub fn hotbar_selection(name: &str) -> Self {
        Self::from_hotbar_name(name).unwrap_or(BlockType::Grass)
    }

    /// Whether the player collides with this block.
    ///
    /// Air, water and leaves are all passable.
    #[inline]
    pub const fn is_solid(self) -> bool {
        !matches!(self, BlockType::Air | BlockType::Water | BlockType::Leaves)
    }

    /// Whether a targeting ray stops at this block. Water is looked through.
    #[inline]
    pub const fn is_targetable(self) -> bool {
        !matches!(self, BlockType::Air | BlockType::Water)
    }

    /// Whether gameplay is allowed to remove this block.
    #[inline]
    pub const fn is_breakable(self) -> bool {
        !matches!(self, BlockType::Air | BlockType::Bedrock)
    }
}

impl Default for BlockType {
    fn default() -> Self {
        BlockType::Air
    }
}
