//! # Terrain Generation
//!
//! Fills a [`VoxelGrid`] column by column from two noise fields:
//!
//! 1. A height map built from a continental fBm layer plus a weaker detail layer
//! 2. Soil layering on top of stone, with sand replacing grass and dirt on beaches
//! 3. Water filling every empty cell up to the water level
//! 4. Caves carved where two independent cave densities are both high enough
//!
//! Each column only depends on its own `(x, z)`, so x-slabs are filled in parallel
//! with rayon. The result is byte-identical to a serial fill.

use std::sync::atomic::{AtomicUsize, Ordering};

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use super::{
    noise_field::{FbmParams, NoiseField},
    report_progress, ProgressSink,
};
use crate::engine_state::voxels::{
    block::block_type::BlockType,
    grid::{GridDimensions, SlabMut, VoxelGrid},
};

/// Share of the overall loading bar covered by the terrain pass.
pub const TERRAIN_PROGRESS_SHARE: f32 = 0.6;

/// Number of finished x-slabs between two progress reports.
const SLABS_PER_REPORT: usize = 4;

/// One fBm layer of the height map.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeightLayer {
    /// Multiplier applied to the normalized column coordinate.
    pub frequency: f64,
    /// Added to the scaled coordinate, to decorrelate layers sampling one field.
    pub offset: f64,
    /// Contribution of this layer to the raw height.
    pub weight: f64,
    /// Octave settings.
    pub fbm: FbmParams,
}

impl HeightLayer {
    fn sample(&self, field: &NoiseField, nx: f64, nz: f64) -> f64 {
        field.fbm(
            nx * self.frequency + self.offset,
            nz * self.frequency + self.offset,
            self.fbm,
        ) * self.weight
    }
}

/// Tunables of the terrain pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    /// Broad land/sea shape.
    pub continental: HeightLayer,
    /// Small hills layered on top.
    pub detail: HeightLayer,
    /// Lowest possible surface height.
    pub base_height: i32,
    /// Cells kept free between the highest possible surface and the build limit.
    pub headroom: i32,
    /// Number of soil layers (surface included) above the stone.
    pub soil_depth: i32,
    /// Surfaces from `water_level - beach_below` to `water_level + beach_above`
    /// are beaches.
    pub beach_below: i32,
    /// See `beach_below`.
    pub beach_above: i32,
    /// A cell is cave when the primary density exceeds `1 - cave_threshold`.
    pub cave_threshold: f64,
    /// Input scale of the primary cave density.
    pub cave_scale: f64,
    /// Input scale of the secondary cave density.
    pub cave_mask_scale: f64,
    /// Offset applied to all three axes before sampling the secondary density.
    pub cave_mask_offset: f64,
    /// The secondary density must exceed this for a cave.
    pub cave_mask_threshold: f64,
    /// Added to the world seed to seed the cave field.
    pub cave_seed_offset: u64,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        TerrainSettings {
            continental: HeightLayer {
                frequency: 3.0,
                offset: 0.0,
                weight: 1.0,
                fbm: FbmParams::new(5, 2.2, 0.45),
            },
            detail: HeightLayer {
                frequency: 8.0,
                offset: 100.0,
                weight: 0.3,
                fbm: FbmParams::new(3, 2.0, 0.4),
            },
            base_height: 5,
            headroom: 10,
            soil_depth: 4,
            beach_below: 1,
            beach_above: 2,
            cave_threshold: 0.38,
            cave_scale: 0.08,
            cave_mask_scale: 0.06,
            cave_mask_offset: 500.0,
            cave_mask_threshold: 0.4,
            cave_seed_offset: 1337,
        }
    }
}

/// Generates the base terrain of a world.
pub struct TerrainGenerator {
    height_field: NoiseField,
    cave_field: NoiseField,
    water_level: i32,
    settings: TerrainSettings,
}

impl TerrainGenerator {
    /// Creates a generator for `seed`.
    ///
    /// # Arguments
    /// * `seed` - World seed; the cave field uses `seed + settings.cave_seed_offset`
    /// * `water_level` - Highest y filled with water
    /// * `settings` - Height map and cave tunables
    pub fn new(seed: u64, water_level: i32, settings: TerrainSettings) -> Self {
        TerrainGenerator {
            height_field: NoiseField::new(seed),
            cave_field: NoiseField::new(seed.wrapping_add(settings.cave_seed_offset)),
            water_level,
            settings,
        }
    }

    /// The noise field the height map is sampled from.
    ///
    /// The vegetation pass gates tree placement on this same field.
    pub fn height_field(&self) -> &NoiseField {
        &self.height_field
    }

    /// Surface height of the column at `(x, z)`.
    pub fn column_height(&self, x: i32, z: i32, dimensions: GridDimensions) -> i32 {
        let nx = x as f64 / dimensions.width as f64;
        let nz = z as f64 / dimensions.depth as f64;
        let continental = self.settings.continental.sample(&self.height_field, nx, nz);
        let detail = self.settings.detail.sample(&self.height_field, nx, nz);
        let raw = (continental + detail + 1.0) / 2.0;
        let span = (dimensions.height as i32 - self.settings.headroom) as f64;
        (raw * span).floor() as i32 + self.settings.base_height
    }

    fn is_cave(&self, x: i32, y: i32, z: i32, column_height: i32) -> bool {
        if y <= 2 || y >= column_height - 2 {
            return false;
        }
        let s = &self.settings;
        let (fx, fy, fz) = (x as f64, y as f64, z as f64);
        let primary = self.cave_field.cave_density(fx, fy, fz, s.cave_scale);
        if primary <= 1.0 - s.cave_threshold {
            return false;
        }
        let o = s.cave_mask_offset;
        let mask = self
            .cave_field
            .cave_density(fx + o, fy + o, fz + o, s.cave_mask_scale);
        mask > s.cave_mask_threshold
    }

    /// The block generated at `(x, y, z)` in a column whose surface is at
    /// `column_height`.
    pub fn block_at(&self, x: i32, y: i32, z: i32, column_height: i32) -> BlockType {
        if y == 0 {
            return BlockType::Bedrock;
        }
        if y > column_height {
            return if y <= self.water_level {
                BlockType::Water
            } else {
                BlockType::Air
            };
        }
        if self.is_cave(x, y, z, column_height) {
            return BlockType::Air;
        }

        let s = &self.settings;
        let is_beach = column_height >= self.water_level - s.beach_below
            && column_height <= self.water_level + s.beach_above;
        if y == column_height {
            if is_beach {
                BlockType::Sand
            } else {
                BlockType::Grass
            }
        } else if y > column_height - s.soil_depth {
            if is_beach {
                BlockType::Sand
            } else {
                BlockType::Dirt
            }
        } else {
            BlockType::Stone
        }
    }

    fn fill_column(&self, slab: &mut SlabMut<'_>, z: i32, dimensions: GridDimensions) {
        let x = slab.x();
        let column_height = self.column_height(x, z, dimensions);
        for y in 0..dimensions.height as i32 {
            slab.set(y, z, self.block_at(x, y, z, column_height));
        }
    }

    /// Overwrites every cell of `grid` with generated terrain.
    ///
    /// # Arguments
    /// * `grid` - The grid to fill; its dimensions drive the height map
    /// * `progress` - Receives fractions in `(0, 0.6]` every few slabs
    pub fn generate(&self, grid: &mut VoxelGrid, progress: &dyn ProgressSink) {
        let started = Instant::now();
        let dimensions = grid.dimensions();
        let finished_slabs = AtomicUsize::new(0);

        grid.par_slabs_mut().for_each(|mut slab| {
            for z in 0..dimensions.depth as i32 {
                self.fill_column(&mut slab, z, dimensions);
            }

            let finished = finished_slabs.fetch_add(1, Ordering::Relaxed) + 1;
            if finished % SLABS_PER_REPORT == 0 || finished == dimensions.width {
                let fraction = finished as f32 / dimensions.width as f32;
                report_progress(progress, fraction * TERRAIN_PROGRESS_SHARE);
            }
        });

        info!(
            "Generated {}x{}x{} terrain in {:?}",
            dimensions.width,
            dimensions.height,
            dimensions.depth,
            started.elapsed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::generation::NoProgress;

    fn dims() -> GridDimensions {
        GridDimensions::new(24, 40, 20)
    }

    #[test]
    fn parallel_fill_matches_serial_fill() {
        let generator = TerrainGenerator::new(77, 12, TerrainSettings::default());
        let mut parallel = VoxelGrid::new(dims());
        generator.generate(&mut parallel, &NoProgress);

        let mut serial = VoxelGrid::new(dims());
        for x in 0..24 {
            for z in 0..20 {
                let h = generator.column_height(x, z, dims());
                for y in 0..40 {
                    serial.set(x, y, z, generator.block_at(x, y, z, h));
                }
            }
        }
        assert_eq!(parallel.as_bytes(), serial.as_bytes());
    }

    #[test]
    fn columns_are_layered_from_bedrock_up() {
        let generator = TerrainGenerator::new(5, 12, TerrainSettings::default());
        let mut grid = VoxelGrid::new(dims());
        generator.generate(&mut grid, &NoProgress);

        for x in 0..24 {
            for z in 0..20 {
                assert_eq!(grid.get(x, 0, z), BlockType::Bedrock);
                let h = generator.column_height(x, z, dims());
                for y in (h + 1).max(1)..40 {
                    let expected = if y <= 12 { BlockType::Water } else { BlockType::Air };
                    assert_eq!(grid.get(x, y, z), expected);
                }
                for y in 1..=(h - 4).min(2) {
                    assert_eq!(grid.get(x, y, z), BlockType::Stone);
                }
            }
        }
    }

    #[test]
    fn beach_surfaces_are_sand() {
        let generator = TerrainGenerator::new(1, 12, TerrainSettings::default());
        for h in 11..=14 {
            assert_eq!(generator.block_at(0, h, 0, h), BlockType::Sand);
            assert_eq!(generator.block_at(0, h - 1, 0, h), BlockType::Sand);
        }
        assert_eq!(generator.block_at(0, 20, 0, 20), BlockType::Grass);
        assert_eq!(generator.block_at(0, 18, 0, 20), BlockType::Dirt);
        assert_eq!(generator.block_at(0, 10, 0, 10), BlockType::Grass);
    }

    #[test]
    fn no_caves_near_bedrock_or_surface() {
        let settings = TerrainSettings {
            cave_threshold: 1.0,
            cave_mask_threshold: -1.0,
            ..TerrainSettings::default()
        };
        let generator = TerrainGenerator::new(9, 0, settings);
        assert_eq!(generator.block_at(3, 2, 3, 30), BlockType::Stone);
        assert_eq!(generator.block_at(3, 3, 3, 30), BlockType::Air);
        assert_eq!(generator.block_at(3, 27, 3, 30), BlockType::Air);
        assert_eq!(generator.block_at(3, 28, 3, 30), BlockType::Dirt);
    }
}
