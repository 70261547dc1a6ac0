//! Integrator domain: derived momentum telemetry.
//!
//! Read-only: nothing here feeds back into velocity or decisions.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::MomentumTuning;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MomentumState {
    pub magnitude: f32,
    pub peak: f32,
    pub high: bool,
    /// Magnitude at the last reported change.
    pub reported: f32,
    /// Step time of the last step moving at or above the significant speed.
    pub last_significant_move_ms: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MomentumSignal {
    High { magnitude: f32 },
    Changed { magnitude: f32, peak: f32 },
}

#[derive(Debug, Clone)]
pub struct MomentumTracker {
    tuning: MomentumTuning,
    state: MomentumState,
}

impl MomentumTracker {
    pub fn new(tuning: &MomentumTuning) -> Self {
        Self {
            tuning: tuning.clone(),
            state: MomentumState::default(),
        }
    }

    pub fn state(&self) -> &MomentumState {
        &self.state
    }

    pub fn observe(&mut self, velocity: Vec2, now_ms: f64, dt_ms: f32) -> Vec<MomentumSignal> {
        let mut signals = Vec::new();
        let magnitude = velocity.length();
        let decay = (-self.tuning.peak_decay_per_second * dt_ms / 1000.0).exp();

        self.state.magnitude = magnitude;
        self.state.peak = (self.state.peak * decay).max(magnitude);

        let high = magnitude >= self.tuning.high_threshold;
        if high && !self.state.high {
            signals.push(MomentumSignal::High { magnitude });
        }
        self.state.high = high;

        let moving = magnitude >= self.tuning.significant_speed;
        if moving {
            self.state.last_significant_move_ms = Some(now_ms);
        }

        let significant = moving || self.state.reported >= self.tuning.significant_speed;
        if significant && (magnitude - self.state.reported).abs() >= self.tuning.change_threshold {
            self.state.reported = magnitude;
            signals.push(MomentumSignal::Changed {
                magnitude,
                peak: self.state.peak,
            });
        }

        signals
    }

    pub fn reset(&mut self) {
        self.state = MomentumState::default();
    }
}
