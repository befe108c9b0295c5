//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, block face handling, and the material
//! descriptors the renderer draws each block type with.

use block_type::{BlockType, BLOCK_TYPE_COUNT};

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
/// This is used for efficient storage of block data in the voxel grid.
pub type BlockTypeSize = u8;

/// How the renderer should draw every instance of one block type.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BlockMaterial {
    /// Base color as `0xRRGGBB`.
    pub color: u32,
    /// Alpha in `[0, 1]`; only meaningful when `transparent` is set.
    pub opacity: f32,
    /// Drawn in the blended pass.
    pub transparent: bool,
    /// Both faces of each triangle are rasterized.
    pub double_sided: bool,
    /// Occludes the sun.
    pub cast_shadow: bool,
    /// Darkened by other shadow casters.
    pub receive_shadow: bool,
}

impl BlockMaterial {
    const fn opaque(color: u32) -> Self {
        BlockMaterial {
            color,
            opacity: 1.0,
            transparent: false,
            double_sided: false,
            cast_shadow: true,
            receive_shadow: true,
        }
    }

    /// The base color split into linear `[r, g, b]` channels in `[0, 1]`.
    pub fn rgb(&self) -> [f32; 3] {
        [
            ((self.color >> 16) & 0xff) as f32 / 255.0,
            ((self.color >> 8) & 0xff) as f32 / 255.0,
            (self.color & 0xff) as f32 / 255.0,
        ]
    }
}

/// Maps each block type code to its material. `Air` has none.
static BLOCK_TYPE_TO_MATERIAL: [Option<BlockMaterial>; BLOCK_TYPE_COUNT] = [
    None,                                   // AIR
    Some(BlockMaterial::opaque(0x5d9e3c)),  // GRASS
    Some(BlockMaterial::opaque(0x8b6914)),  // DIRT
    Some(BlockMaterial::opaque(0x888888)),  // STONE
    Some(BlockMaterial::opaque(0x8b5a2b)),  // WOOD
    Some(BlockMaterial::opaque(0x2d8a4e)),  // LEAVES
    Some(BlockMaterial::opaque(0xd4c476)),  // SAND
    Some(BlockMaterial {
        color: 0x3b7dd8,
        opacity: 0.6,
        transparent: true,
        double_sided: true,
        cast_shadow: false,
        receive_shadow: true,
    }), // WATER
    Some(BlockMaterial::opaque(0x333333)),  // BEDROCK
];

impl BlockType {
    /// The material every visible instance of this block type is drawn with.
    ///
    /// # Returns
    /// `None` for `Air`, which is never drawn.
    pub fn material(self) -> Option<BlockMaterial> {
        BLOCK_TYPE_TO_MATERIAL[self as usize]
    }
}
