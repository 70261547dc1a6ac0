//! Sensing domain: left/right wall probes.

use bevy::log::{trace, warn};
use bevy::math::{Dir2, Vec2};
use serde::{Deserialize, Serialize};

use crate::config::{BodyTuning, WallTuning};
use crate::controller::PhysicsWorld;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallSide {
    Left,
    Right,
}

impl WallSide {
    pub const BOTH: [WallSide; 2] = [WallSide::Left, WallSide::Right];

    /// Sign of the direction from the body toward this wall.
    pub fn toward(self) -> f32 {
        match self {
            WallSide::Left => -1.0,
            WallSide::Right => 1.0,
        }
    }

    /// Sign of the direction pointing away from this wall.
    pub fn away(self) -> f32 {
        -self.toward()
    }

    fn probe_direction(self) -> Dir2 {
        match self {
            WallSide::Left => Dir2::NEG_X,
            WallSide::Right => Dir2::X,
        }
    }
}

/// Wall contact and slide bookkeeping for one character.
///
/// The sensor owns the touching flags and contact data; slide fields are
/// driven by the wall interaction system.
#[derive(Debug, Clone, PartialEq)]
pub struct WallContactState {
    pub touching_left: bool,
    pub touching_right: bool,
    pub slide_active: bool,
    pub grip_strength: f32,
    pub slide_time_ms: f32,
    pub last_wall_normal: Vec2,
    pub contact_point: Option<Vec2>,
}

impl Default for WallContactState {
    fn default() -> Self {
        Self {
            touching_left: false,
            touching_right: false,
            slide_active: false,
            grip_strength: 1.0,
            slide_time_ms: 0.0,
            last_wall_normal: Vec2::ZERO,
            contact_point: None,
        }
    }
}

impl WallContactState {
    pub fn touching(&self, side: WallSide) -> bool {
        match side {
            WallSide::Left => self.touching_left,
            WallSide::Right => self.touching_right,
        }
    }

    fn set_touching(&mut self, side: WallSide, touching: bool) {
        match side {
            WallSide::Left => self.touching_left = touching,
            WallSide::Right => self.touching_right = touching,
        }
    }

    pub fn any_contact(&self) -> bool {
        self.touching_left || self.touching_right
    }

    /// The single wall in contact. In a shaft touching both, input picks.
    pub fn contact_side(&self, input_x: f32) -> Option<WallSide> {
        match (self.touching_left, self.touching_right) {
            (true, false) => Some(WallSide::Left),
            (false, true) => Some(WallSide::Right),
            (true, true) if input_x < 0.0 => Some(WallSide::Left),
            (true, true) if input_x > 0.0 => Some(WallSide::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEdge {
    pub side: WallSide,
    pub began: bool,
}

#[derive(Debug, Clone)]
pub struct WallContactSensor {
    state: WallContactState,
    reach: f32,
    min_contact_speed: f32,
}

impl WallContactSensor {
    pub fn new(body: &BodyTuning, tuning: &WallTuning) -> Self {
        Self {
            state: WallContactState::default(),
            reach: body.half_width + tuning.probe_distance,
            min_contact_speed: tuning.min_contact_speed,
        }
    }

    pub fn state(&self) -> &WallContactState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut WallContactState {
        &mut self.state
    }

    /// Probe both sides and return contact edges.
    ///
    /// First contact needs movement (or input) toward the wall; an existing
    /// contact holds for as long as the probe keeps hitting. Query failures
    /// degrade to "no contact" on that side.
    pub fn sense(
        &mut self,
        world: &dyn PhysicsWorld,
        position: Vec2,
        velocity: Vec2,
        input_x: f32,
    ) -> Vec<ContactEdge> {
        let mut edges = Vec::new();

        for side in WallSide::BOTH {
            let hit = match world.cast_ray(position, side.probe_direction(), self.reach, true) {
                Ok(hit) => hit,
                Err(e) => {
                    warn!("Wall probe {:?} failed, treating as no contact: {}", side, e);
                    None
                }
            };

            let was_touching = self.state.touching(side);
            let approaching = velocity.x * side.toward() >= self.min_contact_speed
                || input_x * side.toward() > 0.0;
            let touching = hit.is_some() && (was_touching || approaching);

            if let (true, Some(hit)) = (touching, hit) {
                self.state.contact_point = Some(hit.point);
                self.state.last_wall_normal = hit.normal;
            }

            if touching != was_touching {
                trace!("Wall contact {:?}: {}", side, touching);
                edges.push(ContactEdge {
                    side,
                    began: touching,
                });
            }
            self.state.set_touching(side, touching);
        }

        if !self.state.any_contact() {
            self.state.contact_point = None;
        }

        edges
    }

    pub fn reset(&mut self) {
        self.state = WallContactState::default();
    }
}
