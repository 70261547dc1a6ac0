//! Wall domain: push-off launch and the direction lock that follows it.

use bevy::math::Vec2;

use crate::config::WallTuning;
use crate::sensing::WallSide;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallJumpLaunch {
    pub side: WallSide,
    pub velocity: Vec2,
}

/// Launch velocity off `side`.
///
/// The base angle comes from the horizontal and vertical push; holding up
/// steepens it and holding down flattens it by at most the configured
/// adjustment.
pub fn wall_jump_velocity(side: WallSide, vertical_axis: f32, tuning: &WallTuning) -> Vec2 {
    let speed = tuning.jump_horizontal.hypot(tuning.jump_vertical);
    let base = tuning.jump_vertical.atan2(tuning.jump_horizontal);
    let adjust = vertical_axis.clamp(-1.0, 1.0) * tuning.jump_angle_adjust_deg.to_radians();
    let angle = (base + adjust).clamp(0.0, std::f32::consts::FRAC_PI_2);
    Vec2::new(side.away() * angle.cos() * speed, angle.sin() * speed)
}

/// Dampens input back toward the wall just jumped off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionLock {
    pub wall: WallSide,
    pub remaining_ms: f32,
}

impl DirectionLock {
    pub fn filter(&self, input_x: f32, factor: f32) -> f32 {
        if input_x * self.wall.toward() > 0.0 {
            input_x * factor
        } else {
            input_x
        }
    }
}

/// Grace after leaving a wall during which a jump still pushes off it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallCoyote {
    pub side: WallSide,
    pub remaining_ms: f32,
}
