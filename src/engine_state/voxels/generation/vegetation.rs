//! # Vegetation Generation
//!
//! Plants trees on grass after the terrain pass. Placement is gated by the
//! height-map noise field and a minimum spacing between trunks; trunk height and
//! canopy corner thinning come from an rng seeded with the world seed, so the same
//! seed always grows the same forest.

use log::{debug, info};
use noise::NoiseFn;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use super::{noise_field::NoiseField, report_progress, ProgressSink};
use crate::engine_state::voxels::{block::block_type::BlockType, grid::VoxelGrid};

/// Overall progress reported once vegetation is done.
pub const VEGETATION_PROGRESS: f32 = 0.8;

/// Mixed into the world seed for the shape rng so it does not mirror other
/// seeded streams.
const SHAPE_RNG_SALT: u64 = 0x7472_6565_7368_6170;

/// Tunables of the vegetation pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VegetationSettings {
    /// Scaled into the placement gate: a column is eligible when the gate noise
    /// reaches `1 - tree_chance * 100`.
    pub tree_chance: f64,
    /// Columns this close to the world edge never grow trees.
    pub margin: i32,
    /// Trunks closer than this on both axes to an earlier trunk are skipped.
    pub min_spacing: i32,
    /// Input scale of the gate noise.
    pub gate_frequency: f64,
    /// Shortest trunk.
    pub trunk_min: i32,
    /// Tallest trunk.
    pub trunk_max: i32,
    /// Canopy radius on every row but the top one, which uses radius 1.
    pub canopy_radius: i32,
    /// Chance that a canopy corner leaf is kept.
    pub corner_keep_chance: f32,
}

impl Default for VegetationSettings {
    fn default() -> Self {
        VegetationSettings {
            tree_chance: 0.012,
            margin: 3,
            min_spacing: 4,
            gate_frequency: 0.5,
            trunk_min: 4,
            trunk_max: 6,
            canopy_radius: 2,
            corner_keep_chance: 0.5,
        }
    }
}

/// One planted tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TreeSite {
    /// Trunk column x.
    pub x: i32,
    /// Trunk column z.
    pub z: i32,
    /// y of the grass block the trunk stands on.
    pub surface: i32,
    /// Number of wood blocks in the trunk.
    pub trunk_height: i32,
}

/// Stamps trees onto generated terrain.
pub struct VegetationGenerator {
    seed: u64,
    gate_field: NoiseField,
    water_level: i32,
    settings: VegetationSettings,
}

impl VegetationGenerator {
    /// Creates a vegetation generator for `seed`.
    ///
    /// The gate noise is built from the seed itself, so it matches the terrain
    /// height field.
    pub fn new(seed: u64, water_level: i32, settings: VegetationSettings) -> Self {
        VegetationGenerator {
            seed,
            gate_field: NoiseField::new(seed),
            water_level,
            settings,
        }
    }

    fn surface_of(&self, grid: &VoxelGrid, x: i32, z: i32) -> Option<i32> {
        (0..grid.height() as i32)
            .rev()
            .find(|&y| grid.get(x, y, z) == BlockType::Grass)
    }

    /// Plants every tree of the world into `grid`.
    ///
    /// # Returns
    /// The planted trees in scan order (x, then z).
    pub fn generate(&self, grid: &mut VoxelGrid, progress: &dyn ProgressSink) -> Vec<TreeSite> {
        let started = Instant::now();
        let s = &self.settings;
        let mut rng = fastrand::Rng::with_seed(self.seed ^ SHAPE_RNG_SALT);
        let gate = 1.0 - s.tree_chance * 100.0;
        let mut trees: Vec<TreeSite> = Vec::new();

        for x in s.margin..grid.width() as i32 - s.margin {
            for z in s.margin..grid.depth() as i32 - s.margin {
                let surface = match self.surface_of(grid, x, z) {
                    Some(y) if y > self.water_level => y,
                    _ => continue,
                };

                let roll = NoiseFn::<f64, 2>::get(
                    &self.gate_field,
                    [x as f64 * s.gate_frequency, z as f64 * s.gate_frequency],
                );
                if roll < gate {
                    continue;
                }

                let crowded = trees.iter().any(|tree| {
                    (tree.x - x).abs() < s.min_spacing && (tree.z - z).abs() < s.min_spacing
                });
                if crowded {
                    continue;
                }

                let trunk_height = rng.i32(s.trunk_min..=s.trunk_max.max(s.trunk_min));
                let site = TreeSite {
                    x,
                    z,
                    surface,
                    trunk_height,
                };
                self.grow(grid, site, &mut rng);
                trees.push(site);
            }
        }

        report_progress(progress, VEGETATION_PROGRESS);
        info!("Planted {} trees in {:?}", trees.len(), started.elapsed());
        trees
    }

    /// Writes one tree: a wood trunk topped by a leaf canopy.
    ///
    /// Leaves only ever replace air.
    fn grow(&self, grid: &mut VoxelGrid, site: TreeSite, rng: &mut fastrand::Rng) {
        let TreeSite {
            x,
            z,
            surface,
            trunk_height,
        } = site;
        for y in surface + 1..=surface + trunk_height {
            grid.set(x, y, z, BlockType::Wood);
        }

        let canopy_bottom = surface + trunk_height - 1;
        let canopy_top = surface + trunk_height + 2;
        for ly in canopy_bottom..=canopy_top {
            let radius = if ly == canopy_top {
                1
            } else {
                self.settings.canopy_radius
            };
            for lx in -radius..=radius {
                for lz in -radius..=radius {
                    if lx == 0 && lz == 0 && ly < canopy_top {
                        continue;
                    }
                    let corner = lx.abs() == radius && lz.abs() == radius;
                    if corner && rng.f32() >= self.settings.corner_keep_chance {
                        continue;
                    }
                    if grid.get(x + lx, ly, z + lz) == BlockType::Air {
                        grid.set(x + lx, ly, z + lz, BlockType::Leaves);
                    }
                }
            }
        }
        debug!("Tree at ({}, {}, {}) trunk {}", x, surface, z, trunk_height);
    }
}
