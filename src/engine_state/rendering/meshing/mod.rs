//! # Meshing
//!
//! Turns the voxel grid into one instance batch per block type.
//!
//! ## Visibility
//!
//! A voxel is drawn when at least one of its six neighbours lets light through:
//! air always does, water does for every type but water, and leaves do for every
//! type but leaves. Fully enclosed voxels produce no instance at all.
//!
//! ## Two-Pass Build
//!
//! Instance buffers are fixed-size on the GPU side, so the build first counts the
//! visible voxels of every type, then allocates exactly-sized buffers and fills
//! them in grid-scan order (x, then y, then z) with one write cursor per type.
//! The visibility of each cell is cached in a bit vector between the passes.
//!
//! Any edit to the grid is followed by a full rebuild.

use bitvec::vec::BitVec;
use cgmath::Point3;
use log::debug;
use web_time::Instant;

use super::instance::InstanceTransform;
use crate::engine_state::voxels::{
    block::{
        block_side::BlockSide,
        block_type::{BlockType, BLOCK_TYPE_COUNT},
        BlockMaterial,
    },
    grid::VoxelGrid,
};

/// Whether the voxel at `(x, y, z)`, of type `block`, has a face that can be seen.
pub fn is_visible(grid: &VoxelGrid, x: i32, y: i32, z: i32, block: BlockType) -> bool {
    let cell = Point3::new(x, y, z);
    BlockSide::all().into_iter().any(|side| {
        let neighbour = grid.get_at(side.neighbour_of(cell));
        neighbour == BlockType::Air
            || (block != BlockType::Water && neighbour == BlockType::Water)
            || (block != BlockType::Leaves && neighbour == BlockType::Leaves)
    })
}

/// All visible instances of one block type.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshBatch {
    /// The block type every instance in this batch shares.
    pub block: BlockType,
    /// How the batch is drawn.
    pub material: BlockMaterial,
    /// One transform per visible voxel, in grid-scan order.
    pub instances: Vec<InstanceTransform>,
}

impl MeshBatch {
    /// Number of instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether the batch holds no instances.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// The instance buffer as raw bytes, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

/// The drawable state of the whole world at one point in time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorldMesh {
    /// Increases by one with every build.
    pub revision: u64,
    /// One batch per block type with at least one visible voxel, in code order.
    pub batches: Vec<MeshBatch>,
}

impl WorldMesh {
    /// The batch of `block`, if any voxel of that type is visible.
    pub fn batch(&self, block: BlockType) -> Option<&MeshBatch> {
        self.batches.iter().find(|batch| batch.block == block)
    }

    /// Total number of instances across all batches.
    pub fn instance_count(&self) -> usize {
        self.batches.iter().map(MeshBatch::len).sum()
    }

    /// Whether any batch holds an instance at `cell`.
    pub fn has_instance_at(&self, cell: Point3<i32>) -> bool {
        self.batches
            .iter()
            .flat_map(|batch| batch.instances.iter())
            .any(|instance| instance.cell() == cell)
    }
}

/// Builds [`WorldMesh`]es and numbers them.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    revision: u64,
}

impl MeshBuilder {
    /// Creates a builder whose first mesh gets revision 1.
    pub fn new() -> Self {
        MeshBuilder::default()
    }

    /// Revision of the most recent build, 0 before the first one.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Rebuilds every batch from scratch.
    pub fn build(&mut self, grid: &VoxelGrid) -> WorldMesh {
        let started = Instant::now();
        let (width, height, depth) = (
            grid.width() as i32,
            grid.height() as i32,
            grid.depth() as i32,
        );
        let codes = grid.as_bytes();

        // Pass 1: visibility and per-type counts.
        let mut visible = BitVec::<usize>::with_capacity(codes.len());
        let mut counts = [0usize; BLOCK_TYPE_COUNT];
        let mut index = 0;
        for x in 0..width {
            for y in 0..height {
                for z in 0..depth {
                    let block = BlockType::from_code(codes[index]);
                    let shown = block != BlockType::Air && is_visible(grid, x, y, z, block);
                    visible.push(shown);
                    if shown {
                        counts[block as usize] += 1;
                    }
                    index += 1;
                }
            }
        }

        // Pass 2: exactly-sized buffers filled through per-type cursors.
        let mut buffers: Vec<Vec<InstanceTransform>> = counts
            .iter()
            .map(|&count| vec![bytemuck::Zeroable::zeroed(); count])
            .collect();
        let mut cursors = [0usize; BLOCK_TYPE_COUNT];
        let mut index = 0;
        for x in 0..width {
            for y in 0..height {
                for z in 0..depth {
                    if visible[index] {
                        let slot = codes[index] as usize;
                        buffers[slot][cursors[slot]] =
                            InstanceTransform::at_cell(Point3::new(x, y, z));
                        cursors[slot] += 1;
                    }
                    index += 1;
                }
            }
        }

        let batches: Vec<MeshBatch> = BlockType::ALL
            .into_iter()
            .zip(buffers)
            .filter(|(_, instances)| !instances.is_empty())
            .filter_map(|(block, instances)| {
                block.material().map(|material| MeshBatch {
                    block,
                    material,
                    instances,
                })
            })
            .collect();

        self.revision += 1;
        let mesh = WorldMesh {
            revision: self.revision,
            batches,
        };
        debug!(
            "Built mesh revision {} with {} instances in {} batches in {:?}",
            mesh.revision,
            mesh.instance_count(),
            mesh.batches.len(),
            started.elapsed()
        );
        mesh
    }
}
