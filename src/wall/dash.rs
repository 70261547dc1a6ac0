//! Wall domain: dash charges, direction selection and the dash burst.

use bevy::log::debug;
use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::DashTuning;
use crate::core::{DeferredScheduler, MotionTask, TaskHandle};
use crate::input::InputFrame;
use crate::sensing::WallSide;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DashDirection {
    #[default]
    Horizontal,
    DiagonalUp,
    DiagonalDown,
}

impl DashDirection {
    /// Unit vector for this direction, mirrored by `sign`.
    pub fn vector(self, sign: f32, diagonal_angle_deg: f32) -> Vec2 {
        let angle = diagonal_angle_deg.to_radians();
        match self {
            DashDirection::Horizontal => Vec2::new(sign, 0.0),
            DashDirection::DiagonalUp => Vec2::new(sign * angle.cos(), angle.sin()),
            DashDirection::DiagonalDown => Vec2::new(sign * angle.cos(), -angle.sin()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashState {
    pub available: bool,
    pub active: bool,
    pub direction: DashDirection,
    pub sign: f32,
    pub start_time_ms: f64,
    pub dash_count: u8,
    pub max_dashes: u8,
    pub cooldown_ms: f32,
    pub cooldown_task: Option<TaskHandle>,
}

impl DashState {
    pub fn new(tuning: &DashTuning) -> Self {
        Self {
            available: tuning.max_dashes > 0,
            active: false,
            direction: DashDirection::Horizontal,
            sign: 1.0,
            start_time_ms: 0.0,
            dash_count: 0,
            max_dashes: tuning.max_dashes,
            cooldown_ms: tuning.cooldown_ms,
            cooldown_task: None,
        }
    }

    fn refresh_available(&mut self) {
        self.available = !self.active && self.dash_count < self.max_dashes;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashLaunch {
    pub direction: DashDirection,
    pub sign: f32,
    pub velocity: Vec2,
}

/// Velocity override for an active dash.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashDrive {
    pub velocity: Vec2,
    pub zero_gravity: bool,
}

#[derive(Debug, Clone)]
pub struct DashSystem {
    tuning: DashTuning,
    state: DashState,
}

impl DashSystem {
    pub fn new(tuning: &DashTuning) -> Self {
        Self {
            tuning: tuning.clone(),
            state: DashState::new(tuning),
        }
    }

    pub fn state(&self) -> &DashState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Pick the dash heading. Away from a touched wall wins over input,
    /// input wins over facing.
    pub fn choose(&self, grounded: bool, wall: Option<WallSide>, input: &InputFrame, facing: f32) -> (DashDirection, f32) {
        let sign = match wall {
            Some(side) => side.away(),
            None if input.horizontal_axis() != 0.0 => input.horizontal_axis(),
            None => facing.signum(),
        };
        let direction = match input.vertical_axis() {
            v if v > 0.0 => DashDirection::DiagonalUp,
            v if v < 0.0 && !grounded => DashDirection::DiagonalDown,
            _ => DashDirection::Horizontal,
        };
        (direction, sign)
    }

    /// Start a dash if a charge is available.
    pub fn try_start(
        &mut self,
        now_ms: f64,
        grounded: bool,
        wall: Option<WallSide>,
        input: &InputFrame,
        facing: f32,
        scheduler: &mut impl DeferredScheduler<MotionTask>,
    ) -> Option<DashLaunch> {
        if !self.state.available {
            debug!(
                "Dash rejected: active={}, count={}/{}",
                self.state.active, self.state.dash_count, self.state.max_dashes
            );
            return None;
        }
        if !grounded && !self.tuning.allow_air_dash {
            debug!("Dash rejected: air dash disabled");
            return None;
        }

        let (direction, sign) = self.choose(grounded, wall, input, facing);
        let velocity = direction.vector(sign, self.tuning.diagonal_angle_deg) * self.tuning.speed;

        self.state.active = true;
        self.state.direction = direction;
        self.state.sign = sign;
        self.state.start_time_ms = now_ms;
        self.state.dash_count += 1;
        if self.state.dash_count >= self.state.max_dashes && self.state.cooldown_task.is_none() {
            let handle = scheduler.schedule_once(self.tuning.cooldown_ms, MotionTask::RefreshDash);
            self.state.cooldown_task = Some(handle);
        }
        self.state.refresh_available();

        debug!("Dash started: {:?} sign={} velocity={:?}", direction, sign, velocity);
        Some(DashLaunch {
            direction,
            sign,
            velocity,
        })
    }

    pub fn drive(&self) -> Option<DashDrive> {
        self.state.active.then(|| DashDrive {
            velocity: self.state.direction.vector(self.state.sign, self.tuning.diagonal_angle_deg)
                * self.tuning.speed,
            zero_gravity: self.tuning.zero_gravity,
        })
    }

    /// End the dash once its duration has run. Returns the velocity scale
    /// to apply on completion.
    pub fn finish_if_due(&mut self, now_ms: f64) -> Option<f32> {
        if !self.state.active || now_ms - self.state.start_time_ms < self.tuning.duration_ms as f64 {
            return None;
        }
        self.state.active = false;
        self.state.refresh_available();
        debug!("Dash ended after {:.0} ms", now_ms - self.state.start_time_ms);
        Some(self.tuning.end_preservation)
    }

    /// Landing refills every charge and cancels a pending cooldown.
    pub fn refresh_on_landing(&mut self, scheduler: &mut impl DeferredScheduler<MotionTask>) {
        if let Some(handle) = self.state.cooldown_task.take() {
            scheduler.cancel(handle);
        }
        self.state.dash_count = 0;
        self.state.refresh_available();
    }

    /// The cooldown task fired.
    pub fn refresh_from_cooldown(&mut self) {
        self.state.cooldown_task = None;
        self.state.dash_count = 0;
        self.state.refresh_available();
        debug!("Dash charges refreshed after cooldown");
    }

    pub fn reset(&mut self) {
        self.state = DashState::new(&self.tuning);
    }
}
