//! # World Generation
//!
//! Everything that turns a seed into a populated [`VoxelGrid`](super::grid::VoxelGrid):
//!
//! * **noise_field**: the seeded gradient noise every other generator samples
//! * **terrain**: height map, soil layers, water and caves, column by column
//! * **vegetation**: trees stamped onto grass after the terrain pass
//!
//! Generation is a pure function of the seed and the grid dimensions. Long passes
//! report how far along they are through a [`ProgressSink`].

pub mod noise_field;
pub mod terrain;
pub mod vegetation;

/// What a loading screen should say for a given overall progress fraction.
///
/// Terrain generation covers `[0, 0.6]`, vegetation ends at `0.8` and the first
/// mesh build ends at `1.0`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GenerationStage {
    /// First half of the terrain pass.
    SculptingTerrain,
    /// Second half of the terrain pass.
    CarvingCaves,
    /// Vegetation pass.
    PlantingTrees,
    /// Mesh build.
    BuildingMeshes,
    /// Everything done.
    Ready,
}

impl GenerationStage {
    /// Maps an overall progress fraction to its stage.
    pub fn from_progress(fraction: f32) -> Self {
        if fraction < 0.3 {
            GenerationStage::SculptingTerrain
        } else if fraction < 0.6 {
            GenerationStage::CarvingCaves
        } else if fraction < 0.8 {
            GenerationStage::PlantingTrees
        } else if fraction < 0.95 {
            GenerationStage::BuildingMeshes
        } else {
            GenerationStage::Ready
        }
    }

    /// Human readable status line.
    pub fn label(self) -> &'static str {
        match self {
            GenerationStage::SculptingTerrain => "Sculpting terrain...",
            GenerationStage::CarvingCaves => "Carving caves...",
            GenerationStage::PlantingTrees => "Planting trees...",
            GenerationStage::BuildingMeshes => "Building meshes...",
            GenerationStage::Ready => "Ready!",
        }
    }
}

/// Receives progress updates during world generation.
///
/// Terrain columns are generated on worker threads, so sinks must be `Sync` and
/// may see terrain fractions slightly out of order.
pub trait ProgressSink: Sync {
    /// Called with the stage matching `fraction` and the fraction itself.
    fn report(&self, stage: GenerationStage, fraction: f32);
}

impl<F> ProgressSink for F
where
    F: Fn(GenerationStage, f32) + Sync,
{
    fn report(&self, stage: GenerationStage, fraction: f32) {
        self(stage, fraction)
    }
}

/// A sink that drops every update.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _stage: GenerationStage, _fraction: f32) {}
}

/// Reports `fraction` to `sink` together with its derived stage.
pub(crate) fn report_progress(sink: &dyn ProgressSink, fraction: f32) {
    let stage = GenerationStage::from_progress(fraction);
    log::trace!("generation {:>3.0}% {}", fraction * 100.0, stage.label());
    sink.report(stage, fraction);
}
