use avian2d::prelude::*;
use bevy::prelude::*;

use skybound::plugin::{MotionPlugin, TuningPath};

const TUNING_PATH: &str = "assets/data/motion_tuning.ron";

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Skybound".to_string(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(PhysicsPlugins::default())
        .insert_resource(TuningPath(TUNING_PATH.into()))
        .add_plugins(MotionPlugin)
        .add_systems(Startup, spawn_camera)
        .run();
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
