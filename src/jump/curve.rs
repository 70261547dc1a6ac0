//! Jump domain: combo grading and per-step vertical shaping.

use serde::{Deserialize, Serialize};

use crate::config::JumpTuning;

/// Timing grade of a chained jump relative to the previous jump's start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ComboGrade {
    #[default]
    None,
    Good,
    Perfect,
}

impl ComboGrade {
    pub fn grade(since_previous_ms: f64, tuning: &JumpTuning) -> Self {
        if since_previous_ms <= tuning.perfect_window_ms as f64 {
            ComboGrade::Perfect
        } else if since_previous_ms <= tuning.good_window_ms as f64 {
            ComboGrade::Good
        } else {
            ComboGrade::None
        }
    }

    pub fn multiplier(self, tuning: &JumpTuning) -> f32 {
        match self {
            ComboGrade::None => 1.0,
            ComboGrade::Good => tuning.good_bonus,
            ComboGrade::Perfect => tuning.perfect_bonus,
        }
    }
}

/// Gravity shaping for free flight this step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityProfile {
    pub scale: f32,
    pub apex_multiplier: f32,
    pub at_apex: bool,
}

impl Default for GravityProfile {
    fn default() -> Self {
        Self {
            scale: 1.0,
            apex_multiplier: 1.0,
            at_apex: false,
        }
    }
}

impl GravityProfile {
    pub fn effective_scale(&self) -> f32 {
        if self.at_apex {
            self.scale * self.apex_multiplier
        } else {
            self.scale
        }
    }
}

/// Hold bonus and early-release cut for the active jump this step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VerticalControl {
    /// Upward acceleration (px/s²) averaged over the step.
    pub boost: f32,
    /// One-off multiplier on upward velocity.
    pub release_cut: Option<f32>,
}
