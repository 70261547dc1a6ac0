//! Plugin domain: drives motion controllers from Bevy with avian2d physics.

mod bridge;
mod components;
#[cfg(feature = "dev-tools")]
mod dev;
mod systems;
#[cfg(test)]
mod tests;

pub use bridge::{AvianBody, AvianWorld, solid_filter};
pub use components::{
    ExhaustedJumpPolicy, GameLayer, Ground, JumpExhaustedMessage, MotionDebug, MotionDriver,
    MotionMessage, MotionSeed, Player, SpawnPoint, TuningPath, Wall,
};
#[cfg(feature = "dev-tools")]
pub use dev::PLAYER_SPAWN;
pub use systems::{event_json_line, raw_buttons_from_keys, tuning_or_default};

use bevy::prelude::*;

use crate::config::MotionTuning;
use crate::plugin::systems::{
    apply_exhausted_policy, configure_fixed_timestep, drive_motion, load_tuning_file,
    log_motion_messages, poll_keyboard,
};

pub struct MotionPlugin;

impl Plugin for MotionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MotionTuning>()
            .init_resource::<ExhaustedJumpPolicy>()
            .init_resource::<MotionDebug>()
            .init_resource::<MotionSeed>()
            .add_message::<MotionMessage>()
            .add_message::<JumpExhaustedMessage>()
            .add_systems(PreStartup, load_tuning_file)
            .add_systems(Startup, configure_fixed_timestep)
            .add_systems(Update, (poll_keyboard, log_motion_messages))
            .add_systems(FixedUpdate, (drive_motion, apply_exhausted_policy).chain());

        #[cfg(feature = "dev-tools")]
        app.add_systems(Startup, (dev::spawn_test_room, dev::spawn_player));
    }
}
