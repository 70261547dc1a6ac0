//! Plugin domain: test room and player spawning for the demo.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::config::MotionTuning;
use crate::controller::MotionController;

use super::{GameLayer, Ground, MotionDriver, MotionSeed, Player, SpawnPoint, Wall};

pub const PLAYER_SPAWN: Vec2 = Vec2::new(0.0, -100.0);

fn solid(
    commands: &mut Commands,
    color: Color,
    size: Vec2,
    position: Vec2,
    layers: CollisionLayers,
    is_wall: bool,
) {
    let mut entity = commands.spawn((
        Sprite {
            color,
            custom_size: Some(size),
            ..default()
        },
        Transform::from_xyz(position.x, position.y, 0.0),
        RigidBody::Static,
        Collider::rectangle(size.x, size.y),
        layers,
    ));
    if is_wall {
        entity.insert(Wall);
    } else {
        entity.insert(Ground);
    }
}

pub(crate) fn spawn_test_room(mut commands: Commands) {
    let wall_color = Color::srgb(0.3, 0.3, 0.4);
    let ground_color = Color::srgb(0.4, 0.5, 0.4);
    let platform_color = Color::srgb(0.5, 0.4, 0.3);

    let ground_layers = CollisionLayers::new(GameLayer::Ground, [GameLayer::Player]);
    let wall_layers = CollisionLayers::new(GameLayer::Wall, [GameLayer::Player]);

    let pieces = [
        // Floor
        (ground_color, Vec2::new(800.0, 40.0), Vec2::new(0.0, -200.0), false),
        // Side walls, tall enough for chained wall jumps
        (wall_color, Vec2::new(40.0, 500.0), Vec2::new(-420.0, 50.0), true),
        (wall_color, Vec2::new(40.0, 500.0), Vec2::new(420.0, 50.0), true),
        // Platforms spaced for single, double and triple jumps
        (platform_color, Vec2::new(150.0, 20.0), Vec2::new(-250.0, -50.0), false),
        (platform_color, Vec2::new(150.0, 20.0), Vec2::new(250.0, 50.0), false),
        (platform_color, Vec2::new(120.0, 20.0), Vec2::new(0.0, 150.0), false),
        // Pillar for wall slide and wall jump practice
        (wall_color, Vec2::new(30.0, 200.0), Vec2::new(-100.0, -80.0), true),
    ];

    for (color, size, position, is_wall) in pieces {
        let layers = if is_wall { wall_layers } else { ground_layers };
        solid(&mut commands, color, size, position, layers, is_wall);
    }

    info!("Spawned test room with {} solids", pieces.len());
}

pub(crate) fn spawn_player(
    mut commands: Commands,
    tuning: Res<MotionTuning>,
    seed: Res<MotionSeed>,
) {
    let size = Vec2::new(tuning.body.half_width * 2.0, tuning.body.half_height * 2.0);

    commands.spawn((
        Player,
        MotionDriver(MotionController::new(tuning.clone(), seed.0)),
        SpawnPoint(PLAYER_SPAWN),
        Sprite {
            color: Color::srgb(0.9, 0.9, 0.9),
            custom_size: Some(size),
            ..default()
        },
        Transform::from_xyz(PLAYER_SPAWN.x, PLAYER_SPAWN.y, 0.0),
        (
            RigidBody::Dynamic,
            Collider::rectangle(size.x, size.y),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity::default(),
            AngularVelocity::default(),
            GravityScale(0.0), // The motion core integrates gravity itself
            Friction::new(0.0),
            CollisionLayers::new(GameLayer::Player, [GameLayer::Ground, GameLayer::Wall]),
        ),
    ));

    info!("Spawned player at {:?} with seed {:#x}", PLAYER_SPAWN, seed.0);
}
