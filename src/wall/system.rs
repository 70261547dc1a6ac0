//! Wall domain: slide, wall jump and dash decisions for one character.

use bevy::log::debug;
use bevy::math::Vec2;

use crate::config::{DashTuning, WallTuning};
use crate::core::{DeferredScheduler, MotionTask};
use crate::input::InputFrame;
use crate::sensing::{WallContactState, WallSide};

use super::dash::{DashDrive, DashLaunch, DashState, DashSystem};
use super::slide::{SlideConstraint, SlideEdge, grip_after};
use super::wall_jump::{DirectionLock, WallCoyote, WallJumpLaunch, wall_jump_velocity};

#[derive(Debug, Clone)]
pub struct WallInteractionSystem {
    tuning: WallTuning,
    slide_side: Option<WallSide>,
    wall_coyote: Option<WallCoyote>,
    lock: Option<DirectionLock>,
    dash: DashSystem,
}

impl WallInteractionSystem {
    pub fn new(tuning: &WallTuning, dash: &DashTuning) -> Self {
        Self {
            tuning: tuning.clone(),
            slide_side: None,
            wall_coyote: None,
            lock: None,
            dash: DashSystem::new(dash),
        }
    }

    pub fn sliding(&self) -> Option<WallSide> {
        self.slide_side
    }

    pub fn wall_coyote(&self) -> Option<&WallCoyote> {
        self.wall_coyote.as_ref()
    }

    pub fn direction_lock(&self) -> Option<&DirectionLock> {
        self.lock.as_ref()
    }

    pub fn dash_state(&self) -> &DashState {
        self.dash.state()
    }

    pub fn dash_active(&self) -> bool {
        self.dash.is_active()
    }

    /// Facing stays put while the direction lock or a dash is running.
    pub fn facing_locked(&self) -> bool {
        self.lock.is_some() || self.dash.is_active()
    }

    /// Count down wall coyote and the direction lock.
    pub fn tick(&mut self, dt_ms: f32) {
        if let Some(coyote) = self.wall_coyote.as_mut() {
            coyote.remaining_ms -= dt_ms;
            if coyote.remaining_ms <= 0.0 {
                self.wall_coyote = None;
            }
        }
        if let Some(lock) = self.lock.as_mut() {
            lock.remaining_ms -= dt_ms;
            if lock.remaining_ms <= 0.0 {
                self.lock = None;
            }
        }
    }

    /// Apply the direction lock to horizontal input.
    pub fn filter_input(&self, input_x: f32) -> f32 {
        match &self.lock {
            Some(lock) => lock.filter(input_x, self.tuning.lock_input_factor),
            None => input_x,
        }
    }

    /// Start, hold or end the slide from this step's contact and velocity.
    pub fn update_slide(
        &mut self,
        contact: &mut WallContactState,
        grounded: bool,
        velocity: Vec2,
        input_x: f32,
        dt_ms: f32,
    ) -> Option<SlideEdge> {
        if let Some(side) = self.slide_side {
            let detached = velocity.x * side.away() > self.tuning.detach_speed;
            if grounded || self.dash.is_active() || !contact.touching(side) || detached {
                self.end_slide(contact);
                if !grounded {
                    self.wall_coyote = Some(WallCoyote {
                        side,
                        remaining_ms: self.tuning.wall_coyote_ms,
                    });
                }
                debug!("Wall slide ended on {:?}: grounded={}, detached={}", side, grounded, detached);
                return Some(SlideEdge::Ended(side));
            }
            contact.slide_time_ms += dt_ms;
            contact.grip_strength = grip_after(contact.slide_time_ms, &self.tuning);
            return None;
        }

        if grounded || self.dash.is_active() || -velocity.y <= self.tuning.min_stick_speed {
            return None;
        }
        let side = contact.contact_side(input_x)?;
        self.slide_side = Some(side);
        self.wall_coyote = None;
        contact.slide_active = true;
        contact.slide_time_ms = 0.0;
        contact.grip_strength = self.tuning.grip_max;
        debug!("Wall slide started on {:?} at fall speed {:.1}", side, -velocity.y);
        Some(SlideEdge::Started(side))
    }

    fn end_slide(&mut self, contact: &mut WallContactState) {
        self.slide_side = None;
        contact.slide_active = false;
        contact.slide_time_ms = 0.0;
        contact.grip_strength = self.tuning.grip_max;
    }

    pub fn slide_constraint(&self, contact: &WallContactState) -> Option<SlideConstraint> {
        self.slide_side.map(|side| SlideConstraint {
            side,
            max_speed: self.tuning.max_slide_speed,
            grip: contact.grip_strength,
            approach_rate: self.tuning.slide_approach_rate,
        })
    }

    /// Velocity change pressing the body into the wall this step.
    pub fn stick_impulse(&self, dt_secs: f32) -> Option<Vec2> {
        self.slide_side
            .map(|side| Vec2::new(side.toward() * self.tuning.stick_force * dt_secs, 0.0))
    }

    /// Side a jump press would push off, if any.
    pub fn wall_jump_side(&self) -> Option<WallSide> {
        self.slide_side
            .or_else(|| self.wall_coyote.map(|coyote| coyote.side))
    }

    /// Push off `side`, ending any slide and starting the direction lock.
    pub fn wall_jump(&mut self, side: WallSide, vertical_axis: f32, contact: &mut WallContactState) -> WallJumpLaunch {
        if self.slide_side.is_some() {
            self.end_slide(contact);
        }
        self.wall_coyote = None;
        self.lock = Some(DirectionLock {
            wall: side,
            remaining_ms: self.tuning.direction_lock_ms,
        });
        let velocity = wall_jump_velocity(side, vertical_axis, &self.tuning);
        debug!("Wall jump off {:?}: velocity={:?}", side, velocity);
        WallJumpLaunch { side, velocity }
    }

    /// Try to dash; an active slide ends when the dash starts.
    pub fn try_dash(
        &mut self,
        now_ms: f64,
        grounded: bool,
        wall: Option<WallSide>,
        input: &InputFrame,
        facing: f32,
        scheduler: &mut impl DeferredScheduler<MotionTask>,
    ) -> Option<DashLaunch> {
        let wall = self.slide_side.or(wall);
        self.dash.try_start(now_ms, grounded, wall, input, facing, scheduler)
    }

    pub fn dash_drive(&self) -> Option<DashDrive> {
        self.dash.drive()
    }

    pub fn finish_dash_if_due(&mut self, now_ms: f64) -> Option<f32> {
        self.dash.finish_if_due(now_ms)
    }

    pub fn refresh_dashes(&mut self, scheduler: &mut impl DeferredScheduler<MotionTask>) {
        self.dash.refresh_on_landing(scheduler);
    }

    pub fn refresh_dashes_from_cooldown(&mut self) {
        self.dash.refresh_from_cooldown();
    }

    pub fn reset(&mut self) {
        self.slide_side = None;
        self.wall_coyote = None;
        self.lock = None;
        self.dash.reset();
    }
}
