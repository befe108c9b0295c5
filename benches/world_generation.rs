/// Benchmarks for world generation, meshing and the frame loop
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use voxel_world::{
    engine_state::voxels::generation::{
        terrain::{TerrainGenerator, TerrainSettings},
        vegetation::{VegetationGenerator, VegetationSettings},
    },
    EngineConfig, FrameInput, GameState, GridDimensions, MeshBuilder, NoProgress, VoxelGrid,
};

const SEED: u64 = 4242;
const WATER_LEVEL: i32 = 12;

fn generated(dimensions: GridDimensions) -> VoxelGrid {
    let mut grid = VoxelGrid::new(dimensions);
    TerrainGenerator::new(SEED, WATER_LEVEL, TerrainSettings::default())
        .generate(&mut grid, &NoProgress);
    VegetationGenerator::new(SEED, WATER_LEVEL, VegetationSettings::default())
        .generate(&mut grid, &NoProgress);
    grid
}

fn bench_terrain(c: &mut Criterion) {
    let mut group = c.benchmark_group("terrain");

    for &size in &[32usize, 64, 128] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let generator = TerrainGenerator::new(SEED, WATER_LEVEL, TerrainSettings::default());
            let mut grid = VoxelGrid::new(GridDimensions::new(size, 40, size));
            b.iter(|| {
                generator.generate(&mut grid, &NoProgress);
                black_box(grid.as_bytes().len())
            });
        });
    }
    group.finish();
}

fn bench_meshing(c: &mut Criterion) {
    let mut group = c.benchmark_group("meshing");

    for &size in &[32usize, 64] {
        let grid = generated(GridDimensions::new(size, 40, size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &grid, |b, grid| {
            let mut builder = MeshBuilder::new();
            b.iter(|| black_box(builder.build(grid).instance_count()));
        });
    }
    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    c.bench_function("frame_tick", |b| {
        let mut config = EngineConfig::default();
        config.world.seed = Some(SEED);
        let mut game = GameState::generate(&config, &NoProgress);
        let input = FrameInput {
            move_z: 1.0,
            yaw_delta: 0.01,
            ..FrameInput::default()
        };
        b.iter(|| black_box(game.tick(input, 1.0 / 60.0)));
    });
}

criterion_group!(benches, bench_terrain, bench_meshing, bench_frame);
criterion_main!(benches);
