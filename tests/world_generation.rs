use std::sync::Mutex;

use voxel_world::{
    engine_state::voxels::generation::{
        terrain::{TerrainGenerator, TerrainSettings},
        vegetation::{VegetationGenerator, VegetationSettings},
    },
    BlockType, EngineConfig, GameState, GenerationStage, GridDimensions, NoProgress, VoxelGrid,
};

const WATER_LEVEL: i32 = 12;

fn generate(seed: u64, dimensions: GridDimensions) -> VoxelGrid {
    let mut grid = VoxelGrid::new(dimensions);
    TerrainGenerator::new(seed, WATER_LEVEL, TerrainSettings::default())
        .generate(&mut grid, &NoProgress);
    VegetationGenerator::new(seed, WATER_LEVEL, VegetationSettings::default())
        .generate(&mut grid, &NoProgress);
    grid
}

#[test]
fn equal_seeds_give_identical_worlds() {
    let dims = GridDimensions::new(32, 40, 32);
    let a = generate(1234, dims);
    let b = generate(1234, dims);
    assert_eq!(a.as_bytes(), b.as_bytes());

    let c = generate(1235, dims);
    assert_ne!(a.as_bytes(), c.as_bytes());
}

#[test]
fn bottom_layer_is_bedrock_everywhere() {
    let grid = generate(99, GridDimensions::new(40, 40, 24));
    for x in 0..40 {
        for z in 0..24 {
            assert_eq!(grid.get(x, 0, z), BlockType::Bedrock, "column ({x}, {z})");
        }
    }
}

#[test]
fn default_world_has_bedrock_under_its_center() {
    let mut config = EngineConfig::default();
    config.world.seed = Some(2024);
    assert_eq!(config.world.dimensions, GridDimensions::new(64, 40, 64));
    assert_eq!(config.world.water_level, 12);

    let game = GameState::generate(&config, &NoProgress);
    assert_eq!(game.grid().get(32, 0, 32), BlockType::Bedrock);
}

#[test]
fn water_never_rises_above_the_water_level() {
    let grid = generate(7, GridDimensions::new(32, 40, 32));
    for x in 0..32 {
        for z in 0..32 {
            for y in WATER_LEVEL + 1..40 {
                assert_ne!(grid.get(x, y, z), BlockType::Water);
            }
        }
    }
}

#[test]
fn generated_grid_is_bounds_safe() {
    let mut grid = generate(3, GridDimensions::new(16, 24, 16));
    let before = grid.as_bytes().to_vec();

    for (x, y, z) in [(-1, 0, 0), (16, 0, 0), (0, -1, 0), (0, 24, 0), (0, 0, 16)] {
        assert_eq!(grid.get(x, y, z), BlockType::Air);
        grid.set(x, y, z, BlockType::Stone);
    }
    assert_eq!(grid.as_bytes(), &before[..]);
}

#[test]
fn progress_walks_through_every_stage_and_ends_ready() {
    let reports = Mutex::new(Vec::new());
    let sink = |stage: GenerationStage, fraction: f32| {
        reports.lock().unwrap().push((stage, fraction));
    };
    let mut config = EngineConfig::default();
    config.world.seed = Some(8);
    config.world.dimensions = GridDimensions::new(32, 40, 32);
    GameState::generate(&config, &sink);

    let reports = reports.into_inner().unwrap();
    for (stage, fraction) in &reports {
        assert!((0.0..=1.0).contains(fraction));
        assert_eq!(*stage, GenerationStage::from_progress(*fraction));
    }

    let terrain_done = reports
        .iter()
        .position(|&(_, f)| (f - 0.6).abs() < 1e-6)
        .expect("terrain reports its last slab");
    let trees_done = reports
        .iter()
        .position(|&(_, f)| (f - 0.8).abs() < 1e-6)
        .expect("vegetation reports completion");
    assert!(terrain_done < trees_done);
    assert_eq!(reports.last(), Some(&(GenerationStage::Ready, 1.0)));
    assert_eq!(GenerationStage::Ready.label(), "Ready!");
}
