//! Jump domain: phase, jump count, hold timing and escalating launches.

use bevy::log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::{JumpTuning, MAX_JUMPS};
use crate::core::{MotionError, TaskHandle};
use crate::sensing::GroundTransition;

use super::curve::{ComboGrade, GravityProfile, VerticalControl};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JumpPhase {
    #[default]
    Grounded,
    Rising,
    Apex,
    Falling,
}

impl JumpPhase {
    /// Allowed transitions. Landing is reachable from anywhere; launching is
    /// reachable from every phase but `Grounded -> Falling` covers walking
    /// off a ledge.
    pub fn can_transition_to(self, next: JumpPhase) -> bool {
        use JumpPhase::*;
        matches!(
            (self, next),
            (_, Grounded)
                | (Grounded, Rising)
                | (Grounded, Falling)
                | (Rising, Rising)
                | (Rising, Apex)
                | (Apex, Rising)
                | (Apex, Falling)
                | (Falling, Rising)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpState {
    pub phase: JumpPhase,
    pub jump_count: u8,
    pub max_jumps: u8,
    pub last_jump_time_ms: Option<f64>,
    pub hold_time_ms: f32,
    pub combo_window_open: bool,
}

impl Default for JumpState {
    fn default() -> Self {
        Self {
            phase: JumpPhase::Grounded,
            jump_count: 0,
            max_jumps: MAX_JUMPS,
            last_jump_time_ms: None,
            hold_time_ms: 0.0,
            combo_window_open: false,
        }
    }
}

/// What a jump launch produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpLaunch {
    pub jump_number: u8,
    pub velocity: f32,
    pub combo: ComboGrade,
    pub coyote: bool,
    pub spin_torque: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JumpAttempt {
    Launched(JumpLaunch),
    /// Every jump spent and the post-sequence cooldown still running.
    Exhausted,
    /// Not eligible right now; the press may stay buffered.
    Ineligible,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveJump {
    number: u8,
    released: bool,
    hold_enabled: bool,
}

#[derive(Debug, Clone)]
pub struct JumpStateMachine {
    tuning: JumpTuning,
    state: JumpState,
    active: Option<ActiveJump>,
    exhausted_cooldown_ms: f32,
    landing_recovery: Option<TaskHandle>,
}

impl JumpStateMachine {
    pub fn new(tuning: &JumpTuning) -> Self {
        Self {
            tuning: tuning.clone(),
            state: JumpState::default(),
            active: None,
            exhausted_cooldown_ms: 0.0,
            landing_recovery: None,
        }
    }

    pub fn state(&self) -> &JumpState {
        &self.state
    }

    pub fn phase(&self) -> JumpPhase {
        self.state.phase
    }

    pub fn jump_count(&self) -> u8 {
        self.state.jump_count
    }

    pub fn tuning(&self) -> &JumpTuning {
        &self.tuning
    }

    /// Move to `next` if the table allows it; otherwise leave the phase alone.
    pub fn transition(&mut self, next: JumpPhase) -> Result<(), MotionError> {
        let from = self.state.phase;
        if !from.can_transition_to(next) {
            return Err(MotionError::InvalidTransition { from, to: next });
        }
        self.state.phase = next;
        Ok(())
    }

    fn transition_or_warn(&mut self, next: JumpPhase) {
        if let Err(e) = self.transition(next) {
            warn!("{}", e);
        }
    }

    pub fn is_eligible(&self, grounded: bool, coyote_grace: bool) -> bool {
        grounded || coyote_grace || self.state.jump_count < self.state.max_jumps
    }

    pub fn is_exhausted(&self) -> bool {
        self.state.jump_count >= self.state.max_jumps && self.exhausted_cooldown_ms > 0.0
    }

    /// Try to launch a jump for a buffered press at `now_ms`.
    pub fn attempt(&mut self, now_ms: f64, grounded: bool, coyote_grace: bool) -> JumpAttempt {
        if !self.is_eligible(grounded, coyote_grace) {
            if self.is_exhausted() {
                warn!(
                    "Jump attempted while exhausted: count={}, cooldown={:.0} ms",
                    self.state.jump_count, self.exhausted_cooldown_ms
                );
                return JumpAttempt::Exhausted;
            }
            return JumpAttempt::Ineligible;
        }

        let from_ground = grounded || coyote_grace;
        let number = if from_ground {
            1
        } else {
            self.state.jump_count + 1
        };

        let combo = match self.state.last_jump_time_ms {
            Some(last) if !from_ground => ComboGrade::grade(now_ms - last, &self.tuning),
            _ => ComboGrade::None,
        };

        let curve = *self.tuning.curve(number);
        let velocity = curve.initial_velocity * combo.multiplier(&self.tuning);

        self.transition_or_warn(JumpPhase::Rising);
        self.state.jump_count = number;
        self.state.last_jump_time_ms = Some(now_ms);
        self.state.hold_time_ms = 0.0;
        self.state.combo_window_open = true;
        self.active = Some(ActiveJump {
            number,
            released: false,
            hold_enabled: true,
        });
        if number >= self.state.max_jumps {
            self.exhausted_cooldown_ms = self.tuning.exhausted_cooldown_ms;
        }

        debug!(
            "Jump {}: velocity={:.1}, combo={:?}, coyote={}",
            number,
            velocity,
            combo,
            coyote_grace && !grounded
        );

        JumpAttempt::Launched(JumpLaunch {
            jump_number: number,
            velocity,
            combo,
            coyote: coyote_grace && !grounded,
            spin_torque: curve.spin_torque,
        })
    }

    /// A wall jump refunds air jumps: it counts as the first jump of a new
    /// sequence and flies on the first curve without hold bonus.
    pub fn register_wall_jump(&mut self, now_ms: f64) {
        self.transition_or_warn(JumpPhase::Rising);
        self.state.jump_count = 1;
        self.state.last_jump_time_ms = Some(now_ms);
        self.state.hold_time_ms = 0.0;
        self.exhausted_cooldown_ms = 0.0;
        self.active = Some(ActiveJump {
            number: 1,
            released: true,
            hold_enabled: false,
        });
    }

    /// React to the ground tracker. Returns `true` on landing.
    pub fn on_ground_transition(&mut self, transition: GroundTransition) -> bool {
        match transition {
            GroundTransition::Landed { .. } => {
                self.land();
                true
            }
            GroundTransition::CoyoteExpired => {
                // The grounded jump is lost, not banked.
                if self.state.jump_count == 0 {
                    self.state.jump_count = 1;
                }
                false
            }
            GroundTransition::LeftGround { .. } | GroundTransition::None => false,
        }
    }

    fn land(&mut self) {
        self.transition_or_warn(JumpPhase::Grounded);
        self.state.jump_count = 0;
        self.state.last_jump_time_ms = None;
        self.state.hold_time_ms = 0.0;
        self.state.combo_window_open = false;
        self.active = None;
        self.exhausted_cooldown_ms = 0.0;
    }

    /// Count down the exhausted cooldown and refresh the combo window flag.
    pub fn tick(&mut self, now_ms: f64, dt_ms: f32) {
        if self.exhausted_cooldown_ms > 0.0 {
            self.exhausted_cooldown_ms = (self.exhausted_cooldown_ms - dt_ms).max(0.0);
        }
        self.state.combo_window_open = self
            .state
            .last_jump_time_ms
            .is_some_and(|last| now_ms - last <= self.tuning.good_window_ms as f64);
    }

    /// Hold bonus while the button stays down, one early-release cut when it
    /// comes up before the hold window closes.
    pub fn vertical_control(&mut self, jump_held: bool, vertical_velocity: f32, dt_ms: f32) -> VerticalControl {
        let mut control = VerticalControl::default();
        if self.state.phase != JumpPhase::Rising {
            return control;
        }
        let Some(active) = self.active.as_mut() else {
            return control;
        };
        if active.released || !active.hold_enabled {
            return control;
        }

        let curve = self.tuning.curve(active.number);
        if jump_held {
            let left_ms = curve.hold_window_ms - self.state.hold_time_ms;
            if left_ms > 0.0 && dt_ms > 0.0 {
                let applied_ms = left_ms.min(dt_ms);
                self.state.hold_time_ms += applied_ms;
                control.boost = curve.hold_bonus * applied_ms / dt_ms;
            }
        } else {
            active.released = true;
            if self.state.hold_time_ms < curve.hold_window_ms && vertical_velocity > 0.0 {
                control.release_cut = Some(curve.early_release_multiplier);
                debug!(
                    "Early release after {:.0} ms: x{}",
                    self.state.hold_time_ms, curve.early_release_multiplier
                );
            }
        }
        control
    }

    pub fn gravity_profile(&self) -> GravityProfile {
        let at_apex = self.state.phase == JumpPhase::Apex;
        match self.active {
            Some(active) => {
                let curve = self.tuning.curve(active.number);
                GravityProfile {
                    scale: curve.gravity_scale,
                    apex_multiplier: curve.apex_gravity_multiplier,
                    at_apex,
                }
            }
            None => GravityProfile {
                at_apex,
                ..GravityProfile::default()
            },
        }
    }

    /// Advance the airborne phase from the integrated vertical velocity.
    pub fn update_phase(&mut self, vertical_velocity: f32, grounded: bool) {
        let threshold = self.tuning.apex_threshold;
        let next = match self.state.phase {
            JumpPhase::Grounded if !grounded && vertical_velocity <= 0.0 => JumpPhase::Falling,
            JumpPhase::Rising if vertical_velocity <= threshold => JumpPhase::Apex,
            JumpPhase::Apex if vertical_velocity < -threshold => JumpPhase::Falling,
            JumpPhase::Apex if vertical_velocity > threshold => JumpPhase::Rising,
            _ => return,
        };
        self.transition_or_warn(next);
    }

    pub fn landing_recovery_active(&self) -> bool {
        self.landing_recovery.is_some()
    }

    /// Open the landing-recovery window; returns the handle it replaces.
    pub fn begin_landing_recovery(&mut self, handle: TaskHandle) -> Option<TaskHandle> {
        self.landing_recovery.replace(handle)
    }

    pub fn end_landing_recovery(&mut self) {
        self.landing_recovery = None;
    }

    pub fn take_landing_recovery(&mut self) -> Option<TaskHandle> {
        self.landing_recovery.take()
    }

    pub fn reset(&mut self) {
        self.state = JumpState::default();
        self.active = None;
        self.exhausted_cooldown_ms = 0.0;
        self.landing_recovery = None;
    }
}
