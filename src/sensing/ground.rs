//! Sensing domain: grounded/airborne transitions and coyote time.

use bevy::log::{debug, trace};
use bevy::math::{Dir2, Vec2};
use serde::{Deserialize, Serialize};

use crate::config::{BodyTuning, GroundTuning};
use crate::controller::PhysicsWorld;
use crate::core::PhysicsError;

/// Grace window after walking off a ledge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CoyoteTimer {
    pub active: bool,
    pub grace_used: bool,
    pub remaining_ms: f32,
}

impl CoyoteTimer {
    pub fn start(&mut self, duration_ms: f32) {
        self.active = duration_ms > 0.0;
        self.grace_used = false;
        self.remaining_ms = duration_ms.max(0.0);
    }

    /// Count down; returns `true` on the tick that expires the grace.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        if !self.active {
            return false;
        }
        self.remaining_ms -= dt_ms;
        if self.remaining_ms <= 0.0 {
            self.remaining_ms = 0.0;
            self.active = false;
            return true;
        }
        false
    }

    pub fn consume(&mut self) {
        self.active = false;
        self.grace_used = true;
        self.remaining_ms = 0.0;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GroundPhase {
    OnGround,
    CoyoteGrace,
    #[default]
    Airborne,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroundTransition {
    None,
    LeftGround { coyote: bool },
    CoyoteExpired,
    Landed { impact_speed: f32 },
}

#[derive(Debug, Clone)]
pub struct GroundContactTracker {
    phase: GroundPhase,
    coyote: CoyoteTimer,
    coyote_ms: f32,
    landing_velocity_epsilon: f32,
    jumped_since_contact: bool,
    fall_speed: f32,
}

impl GroundContactTracker {
    /// Characters spawn airborne; the first contact reading lands them.
    pub fn new(tuning: &GroundTuning) -> Self {
        Self {
            phase: GroundPhase::Airborne,
            coyote: CoyoteTimer::default(),
            coyote_ms: tuning.coyote_ms,
            landing_velocity_epsilon: tuning.landing_velocity_epsilon,
            jumped_since_contact: false,
            fall_speed: 0.0,
        }
    }

    pub fn phase(&self) -> GroundPhase {
        self.phase
    }

    pub fn coyote(&self) -> &CoyoteTimer {
        &self.coyote
    }

    /// True contact; coyote grace does not count.
    pub fn is_on_ground(&self) -> bool {
        self.phase == GroundPhase::OnGround
    }

    pub fn grace_active(&self) -> bool {
        self.phase == GroundPhase::CoyoteGrace && self.coyote.active
    }

    /// Feed one contact reading and the body's vertical velocity.
    pub fn update(&mut self, contact: bool, vertical_velocity: f32, dt_ms: f32) -> GroundTransition {
        let contact = contact && vertical_velocity <= self.landing_velocity_epsilon;

        match self.phase {
            GroundPhase::OnGround if !contact => {
                if self.jumped_since_contact {
                    self.phase = GroundPhase::Airborne;
                    debug!("Left ground after jump");
                    GroundTransition::LeftGround { coyote: false }
                } else {
                    self.phase = GroundPhase::CoyoteGrace;
                    self.coyote.start(self.coyote_ms);
                    debug!("Left ground, coyote grace {} ms", self.coyote_ms);
                    GroundTransition::LeftGround { coyote: true }
                }
            }
            GroundPhase::OnGround => GroundTransition::None,
            GroundPhase::CoyoteGrace | GroundPhase::Airborne if contact => self.land(),
            GroundPhase::CoyoteGrace => {
                self.fall_speed = (-vertical_velocity).max(0.0);
                if self.coyote.tick(dt_ms) {
                    self.phase = GroundPhase::Airborne;
                    debug!("Coyote grace expired");
                    GroundTransition::CoyoteExpired
                } else {
                    GroundTransition::None
                }
            }
            GroundPhase::Airborne => {
                self.fall_speed = (-vertical_velocity).max(0.0);
                GroundTransition::None
            }
        }
    }

    fn land(&mut self) -> GroundTransition {
        let impact_speed = self.fall_speed;
        self.phase = GroundPhase::OnGround;
        self.coyote.clear();
        self.jumped_since_contact = false;
        self.fall_speed = 0.0;
        debug!("Landed: impact_speed={:.1}", impact_speed);
        GroundTransition::Landed { impact_speed }
    }

    /// Record a jump launch. Returns `true` when it consumed coyote grace.
    pub fn notify_jump(&mut self) -> bool {
        match self.phase {
            GroundPhase::OnGround => {
                self.jumped_since_contact = true;
                false
            }
            GroundPhase::CoyoteGrace => {
                let consumed = self.coyote.active;
                self.coyote.consume();
                self.phase = GroundPhase::Airborne;
                consumed
            }
            GroundPhase::Airborne => false,
        }
    }
}

/// Cast the downward ground probe from the body centre.
pub fn probe_ground(
    world: &dyn PhysicsWorld,
    position: Vec2,
    body: &BodyTuning,
    tuning: &GroundTuning,
) -> Result<bool, PhysicsError> {
    let reach = body.half_height + tuning.probe_distance;
    let hit = world.cast_ray(position, Dir2::NEG_Y, reach, true)?;
    trace!("Ground probe from {:?}: {:?}", position, hit);
    Ok(hit.is_some())
}
