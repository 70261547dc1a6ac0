//! Plugin domain: components, resources and messages for controlled characters.

use std::path::PathBuf;

use avian2d::prelude::*;
use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::controller::{MotionController, MotionEvent};

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Ground surfaces (floors, platforms)
    Ground,
    /// Wall surfaces
    Wall,
    /// Controlled characters
    Player,
}

#[derive(Component, Debug)]
pub struct Player;

/// Marker for ground colliders
#[derive(Component, Debug)]
pub struct Ground;

/// Marker for wall colliders
#[derive(Component, Debug)]
pub struct Wall;

/// The motion core for one character. Dropping it tears the controller
/// down and cancels its scheduled tasks.
#[derive(Component, Debug)]
pub struct MotionDriver(pub MotionController);

/// Where the exhausted-jump policy puts a character back.
#[derive(Component, Debug, Clone, Copy)]
pub struct SpawnPoint(pub Vec2);

/// What the host does when a character attempts a jump while exhausted.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExhaustedJumpPolicy {
    /// Report it and carry on.
    #[default]
    Ignore,
    /// Treat it as a failed run: back to the spawn point with fresh state.
    ResetToSpawn,
}

impl ExhaustedJumpPolicy {
    pub fn resets(self) -> bool {
        matches!(self, ExhaustedJumpPolicy::ResetToSpawn)
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct MotionDebug {
    /// Mirror every motion event to the log as one JSON line.
    pub trace_events: bool,
}

/// RON file to read tuning from at startup. Without it the tuning resource
/// already in the app is used as is.
#[derive(Resource, Debug, Clone)]
pub struct TuningPath(pub PathBuf);

/// Seed for cosmetic randomness of spawned characters.
#[derive(Resource, Debug, Clone, Copy)]
pub struct MotionSeed(pub u64);

impl Default for MotionSeed {
    fn default() -> Self {
        Self(0x5eed)
    }
}

/// A motion event republished for effects, audio and UI systems.
#[derive(Debug, Clone)]
pub struct MotionMessage {
    pub entity: Entity,
    pub event: MotionEvent,
}

impl Message for MotionMessage {}

/// Fired when a character attempts a jump while exhausted
#[derive(Debug, Clone, Copy)]
pub struct JumpExhaustedMessage {
    pub entity: Entity,
}

impl Message for JumpExhaustedMessage {}
