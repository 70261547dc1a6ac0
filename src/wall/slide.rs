//! Wall domain: slide speed cap and grip decay.

use crate::config::WallTuning;
use crate::sensing::WallSide;

/// Vertical constraint handed to the integrator while sliding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideConstraint {
    pub side: WallSide,
    pub max_speed: f32,
    pub grip: f32,
    pub approach_rate: f32,
}

impl SlideConstraint {
    /// Next fall speed (positive down) under the slide cap.
    ///
    /// Anything at or above the cap is clamped to it; slower falls approach
    /// the cap exponentially, faster as grip wears off. The result never
    /// exceeds `max_speed`.
    pub fn next_fall_speed(&self, fall_speed: f32, dt_secs: f32) -> f32 {
        if fall_speed >= self.max_speed {
            return self.max_speed;
        }
        let rate = self.approach_rate * (1.3 - self.grip).max(0.0);
        let gap = self.max_speed - fall_speed.max(0.0);
        self.max_speed - gap * (-rate * dt_secs).exp()
    }
}

/// Grip after `slide_time_ms` on the wall.
pub fn grip_after(slide_time_ms: f32, tuning: &WallTuning) -> f32 {
    let decayed = tuning.grip_max - tuning.grip_decay_per_second * slide_time_ms / 1000.0;
    decayed.max(tuning.grip_min)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideEdge {
    Started(WallSide),
    Ended(WallSide),
}
