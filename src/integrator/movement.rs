//! Integrator domain: per-step velocity integration.

use bevy::log::trace;
use bevy::math::Vec2;

use crate::config::{GroundTuning, MovementTuning, SurfaceParams};
use crate::jump::{GravityProfile, VerticalControl};
use crate::wall::{DashDrive, SlideConstraint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Ground,
    Air,
}

/// Everything the decision phase hands to one integration step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepDrive {
    pub input_x: f32,
    pub fast_fall_held: bool,
    pub grounded: bool,
    pub landing_recovery: bool,
    pub gravity: GravityProfile,
    pub control: VerticalControl,
    pub slide: Option<SlideConstraint>,
    pub dash: Option<DashDrive>,
}

/// Move `current` toward `target` by at most `max_delta`.
pub fn move_toward(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Blend prior horizontal velocity into a new state's target.
///
/// `preservation` is clamped to `[0, 1]`, so the result always lies between
/// `previous` and `target`.
pub fn blend_momentum(previous: f32, target: f32, preservation: f32) -> f32 {
    let p = preservation.clamp(0.0, 1.0);
    target + (previous - target) * p
}

#[derive(Debug, Clone)]
pub struct MovementIntegrator {
    tuning: MovementTuning,
    recovery_factor: f32,
    fast_falling: bool,
}

impl MovementIntegrator {
    pub fn new(movement: &MovementTuning, ground: &GroundTuning) -> Self {
        Self {
            tuning: movement.clone(),
            recovery_factor: ground.landing_recovery_factor,
            fast_falling: false,
        }
    }

    pub fn is_fast_falling(&self) -> bool {
        self.fast_falling
    }

    pub fn surface_params(&self, surface: Surface, landing_recovery: bool) -> SurfaceParams {
        match surface {
            Surface::Ground if landing_recovery => SurfaceParams {
                max_speed: self.tuning.ground.max_speed * self.recovery_factor,
                acceleration: self.tuning.ground.acceleration * self.recovery_factor,
                ..self.tuning.ground
            },
            Surface::Ground => self.tuning.ground,
            Surface::Air => self.tuning.air,
        }
    }

    fn axis(&self, input_x: f32) -> f32 {
        if input_x.abs() <= self.tuning.input_deadzone {
            0.0
        } else {
            input_x.clamp(-1.0, 1.0)
        }
    }

    /// Horizontal velocity a new surface state would settle toward.
    pub fn transition_target(&self, velocity_x: f32, input_x: f32, surface: Surface) -> f32 {
        let max = self.surface_params(surface, false).max_speed;
        let axis = self.axis(input_x);
        if axis == 0.0 {
            velocity_x.clamp(-max, max)
        } else {
            axis * max
        }
    }

    /// Carry horizontal velocity across a change of surface.
    pub fn blend_transition(&self, velocity_x: f32, input_x: f32, surface: Surface) -> f32 {
        let target = self.transition_target(velocity_x, input_x, surface);
        blend_momentum(velocity_x, target, self.tuning.momentum_preservation)
    }

    /// Skid-turn acceleration toward the input target, deceleration without input.
    pub fn horizontal(&self, velocity_x: f32, input_x: f32, params: &SurfaceParams, dt_secs: f32) -> f32 {
        let axis = self.axis(input_x);
        if axis == 0.0 {
            return move_toward(velocity_x, 0.0, params.deceleration * dt_secs);
        }

        let target = axis * params.max_speed;
        let reversing = velocity_x != 0.0 && velocity_x.signum() != axis.signum();
        let over_speed = !reversing && velocity_x.abs() > params.max_speed;
        let rate = if reversing {
            params.acceleration * params.turn_boost
        } else if over_speed {
            params.deceleration
        } else {
            params.acceleration
        };
        move_toward(velocity_x, target, rate * dt_secs)
    }

    /// Integrate one fixed step.
    pub fn integrate(&mut self, velocity: Vec2, drive: &StepDrive, dt_ms: f32) -> Vec2 {
        let dt = dt_ms / 1000.0;

        if let Some(dash) = drive.dash {
            self.fast_falling = false;
            let vy = if dash.zero_gravity {
                dash.velocity.y
            } else {
                (velocity.y - self.tuning.gravity * dt).max(-self.tuning.terminal_velocity)
            };
            return Vec2::new(dash.velocity.x, vy);
        }

        let surface = if drive.grounded {
            Surface::Ground
        } else {
            Surface::Air
        };
        let params = self.surface_params(surface, drive.landing_recovery);
        let vx = self.horizontal(velocity.x, drive.input_x, &params, dt);

        let vy = if drive.grounded {
            self.fast_falling = false;
            velocity.y.max(0.0)
        } else if let Some(slide) = drive.slide {
            self.fast_falling = false;
            -slide.next_fall_speed(-velocity.y, dt)
        } else {
            self.air_vertical(velocity.y, drive, dt)
        };

        trace!("Integrated {:?} -> ({:.1}, {:.1})", velocity, vx, vy);
        Vec2::new(vx, vy)
    }

    fn air_vertical(&mut self, vy: f32, drive: &StepDrive, dt: f32) -> f32 {
        let mut vy = vy;
        if let Some(cut) = drive.control.release_cut {
            if vy > 0.0 {
                vy *= cut;
            }
        }
        vy += drive.control.boost * dt;

        let fast_fall = drive.fast_fall_held && vy < 0.0;
        if fast_fall && !self.fast_falling {
            vy *= self.tuning.fast_fall_multiplier;
        }
        self.fast_falling = fast_fall;

        let mut gravity = self.tuning.gravity * drive.gravity.effective_scale();
        let terminal = if fast_fall {
            gravity *= self.tuning.fast_fall_multiplier;
            self.tuning.fast_fall_terminal_velocity
        } else {
            self.tuning.terminal_velocity
        };

        (vy - gravity * dt).max(-terminal)
    }

    pub fn reset(&mut self) {
        self.fast_falling = false;
    }
}
