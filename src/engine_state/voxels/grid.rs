//! # Voxel Grid Module
//!
//! This module provides the `VoxelGrid` struct, the dense block store backing the
//! whole world.
//!
//! ## Memory Layout
//!
//! Blocks are stored as one contiguous buffer of [`BlockTypeSize`] codes indexed
//! `x * height * depth + y * depth + z`. Every x value therefore owns one contiguous
//! slab of `height * depth` cells, which is what lets terrain generation hand
//! disjoint slabs to different threads.
//!
//! ## Bounds Safety
//!
//! Any coordinate outside the grid reads as `Air` and writes to it are dropped.
//! Generation, collision, raycasting and meshing all probe one cell past the
//! edges, so none of them have to special-case the border.

use cgmath::Point3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::block::{block_type::BlockType, BlockTypeSize};

/// Width, height and depth of a grid in blocks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridDimensions {
    /// Extent along x.
    pub width: usize,
    /// Extent along y. Also the world's build height.
    pub height: usize,
    /// Extent along z.
    pub depth: usize,
}

impl GridDimensions {
    /// Creates a new set of dimensions.
    pub const fn new(width: usize, height: usize, depth: usize) -> Self {
        GridDimensions {
            width,
            height,
            depth,
        }
    }

    /// Total number of cells.
    pub const fn volume(&self) -> usize {
        self.width * self.height * self.depth
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        GridDimensions::new(64, 40, 64)
    }
}

/// A dense `width × height × depth` array of blocks.
///
/// # Examples
///
/// ```
/// use voxel_world::{BlockType, GridDimensions, VoxelGrid};
///
/// let mut grid = VoxelGrid::new(GridDimensions::new(4, 4, 4));
/// grid.set(1, 2, 3, BlockType::Stone);
/// assert_eq!(grid.get(1, 2, 3), BlockType::Stone);
///
/// // Outside the grid everything is air, and writes vanish.
/// grid.set(-1, 0, 0, BlockType::Stone);
/// assert_eq!(grid.get(-1, 0, 0), BlockType::Air);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelGrid {
    dimensions: GridDimensions,
    /// Block codes in `x, y, z` order (z fastest).
    blocks: Vec<BlockTypeSize>,
}

impl VoxelGrid {
    /// Creates a grid filled with air.
    pub fn new(dimensions: GridDimensions) -> Self {
        Self::filled(dimensions, BlockType::Air)
    }

    /// Creates a grid with every cell set to `block`.
    pub fn filled(dimensions: GridDimensions, block: BlockType) -> Self {
        VoxelGrid {
            dimensions,
            blocks: vec![block.code(); dimensions.volume()],
        }
    }

    /// The grid's dimensions.
    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Extent along x.
    pub fn width(&self) -> usize {
        self.dimensions.width
    }

    /// Extent along y.
    pub fn height(&self) -> usize {
        self.dimensions.height
    }

    /// Extent along z.
    pub fn depth(&self) -> usize {
        self.dimensions.depth
    }

    /// Whether `(x, y, z)` addresses a cell of this grid.
    #[inline]
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.dimensions.width
            && (y as usize) < self.dimensions.height
            && (z as usize) < self.dimensions.depth
    }

    #[inline]
    fn index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if !self.contains(x, y, z) {
            return None;
        }
        let GridDimensions { height, depth, .. } = self.dimensions;
        Some(x as usize * height * depth + y as usize * depth + z as usize)
    }

    /// Reads the block at `(x, y, z)`, or `Air` outside the grid.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> BlockType {
        match self.index(x, y, z) {
            Some(i) => BlockType::from_code(self.blocks[i]),
            None => BlockType::Air,
        }
    }

    /// Writes the block at `(x, y, z)`. Does nothing outside the grid.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, z: i32, block: BlockType) {
        if let Some(i) = self.index(x, y, z) {
            self.blocks[i] = block.code();
        }
    }

    /// [`get`](Self::get) for a cell position.
    pub fn get_at(&self, position: Point3<i32>) -> BlockType {
        self.get(position.x, position.y, position.z)
    }

    /// [`set`](Self::set) for a cell position.
    pub fn set_at(&mut self, position: Point3<i32>, block: BlockType) {
        self.set(position.x, position.y, position.z, block)
    }

    /// Reads the block containing a continuous world-space point.
    pub fn sample(&self, x: f32, y: f32, z: f32) -> BlockType {
        self.get(x.floor() as i32, y.floor() as i32, z.floor() as i32)
    }

    /// Number of cells holding `block`.
    pub fn count(&self, block: BlockType) -> usize {
        let code = block.code();
        self.blocks.iter().filter(|&&b| b == code).count()
    }

    /// The raw code buffer, for byte-wise comparisons and hashing.
    pub fn as_bytes(&self) -> &[u8] {
        &self.blocks
    }

    /// Splits the grid into one mutable slab per x value, in parallel.
    ///
    /// Slabs are disjoint, so each can be filled on its own thread.
    pub fn par_slabs_mut(&mut self) -> impl IndexedParallelIterator<Item = SlabMut<'_>> {
        let GridDimensions { height, depth, .. } = self.dimensions;
        let slab_len = (height * depth).max(1);
        self.blocks
            .par_chunks_mut(slab_len)
            .enumerate()
            .map(move |(x, cells)| SlabMut {
                x: x as i32,
                height,
                depth,
                cells,
            })
    }
}

/// Mutable view of every cell sharing one x value.
///
/// Carries the same out-of-bounds rules as the grid it came from.
pub struct SlabMut<'a> {
    x: i32,
    height: usize,
    depth: usize,
    cells: &'a mut [BlockTypeSize],
}

impl SlabMut<'_> {
    /// The x value this slab covers.
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Writes the block at `(self.x(), y, z)`. Does nothing outside the grid.
    #[inline]
    pub fn set(&mut self, y: i32, z: i32, block: BlockType) {
        if y < 0 || z < 0 || y as usize >= self.height || z as usize >= self.depth {
            return;
        }
        self.cells[y as usize * self.depth + z as usize] = block.code();
    }

    /// Reads the block at `(self.x(), y, z)`, or `Air` outside the grid.
    #[inline]
    pub fn get(&self, y: i32, z: i32) -> BlockType {
        if y < 0 || z < 0 || y as usize >= self.height || z as usize >= self.depth {
            return BlockType::Air;
        }
        BlockType::from_code(self.cells[y as usize * self.depth + z as usize])
    }
}
