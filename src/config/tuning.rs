//! Config domain: tuning for every motion subsystem.
//!
//! All durations are milliseconds, speeds px/s and accelerations px/s²,
//! with +y pointing up.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Jumps available between landings.
pub const MAX_JUMPS: u8 = 3;

#[derive(Resource, Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionTuning {
    pub body: BodyTuning,
    pub step: StepTuning,
    pub input: InputTuning,
    pub ground: GroundTuning,
    pub jump: JumpTuning,
    pub movement: MovementTuning,
    pub wall: WallTuning,
    pub dash: DashTuning,
    pub momentum: MomentumTuning,
}

/// Probe geometry of the controlled body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyTuning {
    pub half_width: f32,
    pub half_height: f32,
    /// Largest rotation (radians) still counted as landing upright.
    pub upright_tolerance: f32,
}

impl Default for BodyTuning {
    fn default() -> Self {
        Self {
            half_width: 12.0,
            half_height: 24.0,
            upright_tolerance: 0.35,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepTuning {
    pub steps_per_second: u32,
    /// Cap on fixed steps per update; the rest of the backlog is dropped.
    pub max_steps_per_update: u32,
    /// Larger deltas are treated as invalid and clamped.
    pub max_delta_ms: f32,
}

impl Default for StepTuning {
    fn default() -> Self {
        Self {
            steps_per_second: 60,
            max_steps_per_update: 5,
            max_delta_ms: 250.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputTuning {
    pub buffer_window_ms: f32,
    pub buffer_capacity: usize,
}

impl Default for InputTuning {
    fn default() -> Self {
        Self {
            buffer_window_ms: 12.0,
            buffer_capacity: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundTuning {
    pub coyote_ms: f32,
    /// Ray length below the body's feet.
    pub probe_distance: f32,
    /// A body rising faster than this cannot register a landing.
    pub landing_velocity_epsilon: f32,
    pub landing_recovery_ms: f32,
    /// Scale on ground acceleration and top speed during landing recovery.
    pub landing_recovery_factor: f32,
}

impl Default for GroundTuning {
    fn default() -> Self {
        Self {
            coyote_ms: 100.0,
            probe_distance: 4.0,
            landing_velocity_epsilon: 1.0,
            landing_recovery_ms: 120.0,
            landing_recovery_factor: 0.82,
        }
    }
}

/// Force curve for one jump of the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpCurve {
    pub initial_velocity: f32,
    /// Upward acceleration while the button stays held inside the hold window.
    pub hold_bonus: f32,
    pub hold_window_ms: f32,
    /// Applied once to upward velocity on release before the hold window closes.
    pub early_release_multiplier: f32,
    pub gravity_scale: f32,
    pub apex_gravity_multiplier: f32,
    /// Torque impulse on launch; non-zero for the flip on the final jump.
    pub spin_torque: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpTuning {
    pub curves: [JumpCurve; MAX_JUMPS as usize],
    /// |vy| at or below this is the apex band.
    pub apex_threshold: f32,
    pub perfect_window_ms: f32,
    pub good_window_ms: f32,
    pub perfect_bonus: f32,
    pub good_bonus: f32,
    /// Runs after the final jump of a sequence; a jump attempt inside it is
    /// reported as exhausted.
    pub exhausted_cooldown_ms: f32,
}

impl Default for JumpTuning {
    fn default() -> Self {
        Self {
            curves: [
                JumpCurve {
                    initial_velocity: 620.0,
                    hold_bonus: 1400.0,
                    hold_window_ms: 180.0,
                    early_release_multiplier: 0.5,
                    gravity_scale: 1.0,
                    apex_gravity_multiplier: 0.55,
                    spin_torque: 0.0,
                },
                JumpCurve {
                    initial_velocity: 680.0,
                    hold_bonus: 1700.0,
                    hold_window_ms: 150.0,
                    early_release_multiplier: 0.55,
                    gravity_scale: 1.05,
                    apex_gravity_multiplier: 0.5,
                    spin_torque: 0.0,
                },
                JumpCurve {
                    initial_velocity: 760.0,
                    hold_bonus: 2100.0,
                    hold_window_ms: 120.0,
                    early_release_multiplier: 0.6,
                    gravity_scale: 1.1,
                    apex_gravity_multiplier: 0.45,
                    spin_torque: 8.0,
                },
            ],
            apex_threshold: 60.0,
            perfect_window_ms: 50.0,
            good_window_ms: 150.0,
            perfect_bonus: 1.15,
            good_bonus: 1.07,
            exhausted_cooldown_ms: 500.0,
        }
    }
}

impl JumpTuning {
    /// Curve for a 1-based jump number, clamped into range.
    pub fn curve(&self, jump_number: u8) -> &JumpCurve {
        let index = jump_number.clamp(1, MAX_JUMPS) as usize - 1;
        &self.curves[index]
    }

    /// Apex height of one jump without hold bonus: h = v² / (2g).
    pub fn single_jump_height(&self, jump_number: u8, gravity: f32) -> f32 {
        let curve = self.curve(jump_number);
        let g = gravity * curve.gravity_scale;
        if g <= 0.0 {
            return 0.0;
        }
        curve.initial_velocity * curve.initial_velocity / (2.0 * g)
    }

    /// Height reachable by chaining every jump at its apex.
    /// Ignores hold bonus and apex float, so real arcs go a little higher.
    pub fn max_reachable_height(&self, gravity: f32) -> f32 {
        (1..=MAX_JUMPS)
            .map(|n| self.single_jump_height(n, gravity))
            .sum()
    }
}

/// Horizontal handling on one surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceParams {
    pub max_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    /// Acceleration multiplier when input opposes current velocity.
    pub turn_boost: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    pub ground: SurfaceParams,
    pub air: SurfaceParams,
    pub gravity: f32,
    pub terminal_velocity: f32,
    /// Scales fall speed on fast-fall onset and gravity while it is held.
    pub fast_fall_multiplier: f32,
    pub fast_fall_terminal_velocity: f32,
    /// Share of prior horizontal velocity kept across a surface change.
    pub momentum_preservation: f32,
    pub input_deadzone: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            ground: SurfaceParams {
                max_speed: 320.0,
                acceleration: 3000.0,
                deceleration: 2600.0,
                turn_boost: 1.8,
            },
            air: SurfaceParams {
                max_speed: 300.0,
                acceleration: 1800.0,
                deceleration: 900.0,
                turn_boost: 1.4,
            },
            gravity: 1800.0,
            terminal_velocity: 900.0,
            fast_fall_multiplier: 1.5,
            fast_fall_terminal_velocity: 1300.0,
            momentum_preservation: 0.9,
            input_deadzone: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallTuning {
    /// Ray length beyond the body's side.
    pub probe_distance: f32,
    /// Horizontal speed toward a wall needed to register first contact.
    pub min_contact_speed: f32,
    /// Fall speed needed to start sliding.
    pub min_stick_speed: f32,
    pub max_slide_speed: f32,
    /// Rate (1/s) at which slide speed approaches its cap at zero grip.
    pub slide_approach_rate: f32,
    pub grip_max: f32,
    pub grip_min: f32,
    pub grip_decay_per_second: f32,
    /// Acceleration pressing the body into the wall while sliding.
    pub stick_force: f32,
    /// Speed away from the wall that breaks a slide.
    pub detach_speed: f32,
    pub wall_coyote_ms: f32,
    pub jump_horizontal: f32,
    pub jump_vertical: f32,
    /// Largest launch-angle change from holding up or down.
    pub jump_angle_adjust_deg: f32,
    pub direction_lock_ms: f32,
    /// Scale on input toward the locked wall.
    pub lock_input_factor: f32,
}

impl Default for WallTuning {
    fn default() -> Self {
        Self {
            probe_distance: 4.0,
            min_contact_speed: 20.0,
            min_stick_speed: 30.0,
            max_slide_speed: 140.0,
            slide_approach_rate: 6.0,
            grip_max: 1.0,
            grip_min: 0.3,
            grip_decay_per_second: 0.35,
            stick_force: 600.0,
            detach_speed: 80.0,
            wall_coyote_ms: 80.0,
            jump_horizontal: 400.0,
            jump_vertical: 600.0,
            jump_angle_adjust_deg: 10.0,
            direction_lock_ms: 300.0,
            lock_input_factor: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashTuning {
    pub speed: f32,
    pub duration_ms: f32,
    /// Time to refill charges once they run out.
    pub cooldown_ms: f32,
    pub max_dashes: u8,
    pub zero_gravity: bool,
    /// Velocity scale applied when a dash completes.
    pub end_preservation: f32,
    pub allow_air_dash: bool,
    pub diagonal_angle_deg: f32,
}

impl Default for DashTuning {
    fn default() -> Self {
        Self {
            speed: 900.0,
            duration_ms: 160.0,
            cooldown_ms: 400.0,
            max_dashes: 1,
            zero_gravity: true,
            end_preservation: 0.55,
            allow_air_dash: true,
            diagonal_angle_deg: 45.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumTuning {
    /// Exponential decay rate (1/s) of the tracked peak.
    pub peak_decay_per_second: f32,
    pub significant_speed: f32,
    pub high_threshold: f32,
    /// Smallest magnitude change reported as a momentum change.
    pub change_threshold: f32,
}

impl Default for MomentumTuning {
    fn default() -> Self {
        Self {
            peak_decay_per_second: 1.5,
            significant_speed: 40.0,
            high_threshold: 650.0,
            change_threshold: 150.0,
        }
    }
}
