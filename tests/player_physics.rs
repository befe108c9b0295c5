use approx::assert_abs_diff_eq;
use cgmath::Point3;
use voxel_world::{
    engine_state::player::controller::{MovementInput, PhysicsSettings, PlayerController},
    BlockType, GridDimensions, PlayerState, VoxelGrid,
};

const FLOOR_TOP: i32 = 20;

/// Stone up to and including `FLOOR_TOP` across the whole grid.
fn flat_world() -> VoxelGrid {
    let mut grid = VoxelGrid::new(GridDimensions::new(32, 40, 32));
    for x in 0..32 {
        for z in 0..32 {
            for y in 0..=FLOOR_TOP {
                grid.set(x, y, z, BlockType::Stone);
            }
        }
    }
    grid
}

#[test]
fn spawned_player_settles_on_a_flat_column() {
    let grid = flat_world();
    let controller = PlayerController::default();
    let mut player = PlayerState::spawn(&grid);
    assert_eq!(player.position, Point3::new(16.0, 22.0, 16.0));

    for _ in 0..200 {
        controller.update(&mut player, &grid, MovementInput::default(), 0.016);
    }
    assert!(player.on_ground);
    assert!(!player.in_water);
    assert_abs_diff_eq!(player.position.y, FLOOR_TOP as f32 + 1.0 + 1.7, epsilon = 0.05);
}

#[test]
fn dropped_player_lands_at_the_same_height() {
    let grid = flat_world();
    let controller = PlayerController::default();
    let mut player = PlayerState::at(Point3::new(10.5, 35.0, 10.5));

    let mut ticks = 0;
    while !player.on_ground && ticks < 1000 {
        controller.update(&mut player, &grid, MovementInput::default(), 0.016);
        ticks += 1;
    }
    assert!(player.on_ground);
    assert_abs_diff_eq!(player.position.y, 22.7, epsilon = 0.05);
}

#[test]
fn jumping_under_the_corner_of_an_overhang_keeps_the_head_out() {
    let mut grid = flat_world();
    grid.set(17, FLOOR_TOP + 3, 17, BlockType::Stone);
    let controller = PlayerController::default();
    let mut player = PlayerState::at(Point3::new(16.8, 22.7, 16.8));
    let jump = MovementInput {
        jump: true,
        ..MovementInput::default()
    };

    for tick in 0..60 {
        let input = if tick < 2 { jump } else { MovementInput::default() };
        controller.update(&mut player, &grid, input, 0.016);
        let Point3 { x, y, z } = player.position;
        assert!(
            !grid.sample(x + 0.3, y, z + 0.3).is_solid(),
            "eye corner entered stone at {:?}",
            player.position
        );
    }
    assert!(player.on_ground);
    assert_abs_diff_eq!(player.position.y, 22.7, epsilon = 1e-4);
}

#[test]
fn random_walks_never_end_inside_stone() {
    let mut grid = flat_world();
    for y in FLOOR_TOP + 1..40 {
        for i in 0..32 {
            grid.set(4, y, i, BlockType::Stone);
            grid.set(27, y, i, BlockType::Stone);
            grid.set(i, y, 4, BlockType::Stone);
            grid.set(i, y, 27, BlockType::Stone);
        }
    }
    // A pillar in the middle of the arena.
    for y in FLOOR_TOP + 1..40 {
        grid.set(12, y, 12, BlockType::Stone);
    }
    // Overhangs low enough to bump a jumping head.
    grid.set(17, FLOOR_TOP + 3, 17, BlockType::Stone);
    grid.set(20, FLOOR_TOP + 3, 10, BlockType::Stone);
    for x in 6..11 {
        grid.set(x, FLOOR_TOP + 3, 20, BlockType::Stone);
    }

    let settings = PhysicsSettings::default();
    let width = settings.player_width;
    let controller = PlayerController::new(settings);
    let mut player = PlayerState::at(Point3::new(16.5, 22.7, 16.5));
    let mut rng = fastrand::Rng::with_seed(0xC0FFEE);

    for _ in 0..5000 {
        player.apply_look(rng.f32() - 0.5, 0.0);
        let input = MovementInput {
            move_x: rng.f32() * 2.0 - 1.0,
            move_z: rng.f32() * 2.0 - 1.0,
            jump: rng.u8(..) < 40,
        };
        let dt = (rng.f32() * 0.05).max(0.001);
        controller.update(&mut player, &grid, input, dt);

        let Point3 { x, y, z } = player.position;
        for sample_y in [y, y - 1.0] {
            for (dx, dz) in [(width, width), (width, -width), (-width, width), (-width, -width)] {
                assert!(
                    !grid.sample(x + dx, sample_y, z + dz).is_solid(),
                    "player at {:?} overlaps stone",
                    player.position
                );
            }
        }
        assert!(y - 1.7 >= FLOOR_TOP as f32 + 1.0 - 1e-4, "feet sank to {}", y - 1.7);
    }
}
