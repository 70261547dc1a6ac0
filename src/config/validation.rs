//! Validation of tuning values that the motion core relies on.

use thiserror::Error;

use super::tuning::{MotionTuning, SurfaceParams};

/// One violated tuning constraint.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {reason}")]
pub struct TuningError {
    pub field: String,
    pub reason: String,
}

/// Helper macro for pushing a finding when a condition fails
macro_rules! check {
    ($errors:expr, $cond:expr, $field:expr, $($reason:tt)+) => {
        if !$cond {
            $errors.push(TuningError {
                field: $field.to_string(),
                reason: format!($($reason)+),
            });
        }
    };
}

fn check_surface(errors: &mut Vec<TuningError>, name: &str, params: &SurfaceParams) {
    check!(
        errors,
        params.max_speed > 0.0,
        format!("movement.{name}.max_speed"),
        "must be positive, got {}",
        params.max_speed
    );
    check!(
        errors,
        params.acceleration > 0.0 && params.deceleration > 0.0,
        format!("movement.{name}"),
        "acceleration and deceleration must be positive"
    );
    check!(
        errors,
        params.turn_boost >= 1.0,
        format!("movement.{name}.turn_boost"),
        "must be at least 1.0, got {}",
        params.turn_boost
    );
}

/// Validate every constraint the motion core assumes.
/// Returns a list of findings, empty if the tuning is usable.
pub fn validate_tuning(tuning: &MotionTuning) -> Vec<TuningError> {
    let mut errors = Vec::new();

    // Step
    check!(
        errors,
        tuning.step.steps_per_second > 0,
        "step.steps_per_second",
        "must be positive"
    );
    check!(
        errors,
        (3..=10).contains(&tuning.step.max_steps_per_update),
        "step.max_steps_per_update",
        "must be within 3..=10, got {}",
        tuning.step.max_steps_per_update
    );
    check!(
        errors,
        tuning.step.max_delta_ms > 0.0,
        "step.max_delta_ms",
        "must be positive"
    );

    // Input
    check!(
        errors,
        (8.0..=12.0).contains(&tuning.input.buffer_window_ms),
        "input.buffer_window_ms",
        "must be within 8..=12 ms, got {}",
        tuning.input.buffer_window_ms
    );
    check!(
        errors,
        tuning.input.buffer_capacity > 0,
        "input.buffer_capacity",
        "must be positive"
    );

    // Ground
    check!(
        errors,
        tuning.ground.coyote_ms >= 0.0,
        "ground.coyote_ms",
        "must not be negative"
    );
    check!(
        errors,
        tuning.ground.landing_recovery_factor > 0.0 && tuning.ground.landing_recovery_factor <= 1.0,
        "ground.landing_recovery_factor",
        "must be within (0, 1], got {}",
        tuning.ground.landing_recovery_factor
    );

    // Jump curves escalate: more launch speed, shorter but stronger hold
    let jump = &tuning.jump;
    for (i, curve) in jump.curves.iter().enumerate() {
        let n = i + 1;
        check!(
            errors,
            curve.initial_velocity > 0.0,
            format!("jump.curves[{n}].initial_velocity"),
            "must be positive"
        );
        check!(
            errors,
            curve.early_release_multiplier > 0.0 && curve.early_release_multiplier < 1.0,
            format!("jump.curves[{n}].early_release_multiplier"),
            "must be within (0, 1), got {}",
            curve.early_release_multiplier
        );
        check!(
            errors,
            curve.gravity_scale > 0.0 && curve.apex_gravity_multiplier > 0.0,
            format!("jump.curves[{n}]"),
            "gravity scales must be positive"
        );
    }
    for pair in jump.curves.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        check!(
            errors,
            next.initial_velocity > prev.initial_velocity,
            "jump.curves",
            "initial velocity must strictly increase ({} -> {})",
            prev.initial_velocity,
            next.initial_velocity
        );
        check!(
            errors,
            next.hold_window_ms < prev.hold_window_ms && next.hold_bonus > prev.hold_bonus,
            "jump.curves",
            "later jumps need shorter but stronger hold windows"
        );
    }
    check!(
        errors,
        jump.perfect_window_ms < jump.good_window_ms,
        "jump.perfect_window_ms",
        "must be shorter than the good window"
    );
    check!(
        errors,
        jump.perfect_bonus > jump.good_bonus && jump.good_bonus > 1.0,
        "jump.perfect_bonus",
        "bonuses must satisfy perfect > good > 1.0"
    );

    // Movement
    check_surface(&mut errors, "ground", &tuning.movement.ground);
    check_surface(&mut errors, "air", &tuning.movement.air);
    check!(
        errors,
        (0.0..=1.0).contains(&tuning.movement.momentum_preservation),
        "movement.momentum_preservation",
        "must be within 0..=1, got {}",
        tuning.movement.momentum_preservation
    );
    check!(
        errors,
        tuning.movement.fast_fall_terminal_velocity >= tuning.movement.terminal_velocity,
        "movement.fast_fall_terminal_velocity",
        "must not be below terminal_velocity"
    );

    // Wall
    let wall = &tuning.wall;
    check!(
        errors,
        wall.max_slide_speed > 0.0 && wall.max_slide_speed < tuning.movement.terminal_velocity,
        "wall.max_slide_speed",
        "must be positive and below terminal velocity"
    );
    check!(
        errors,
        0.3 <= wall.grip_min && wall.grip_min <= wall.grip_max && wall.grip_max <= 1.0,
        "wall.grip_min",
        "grip must stay within [0.3, 1.0]"
    );
    check!(
        errors,
        (0.0..=1.0).contains(&wall.lock_input_factor),
        "wall.lock_input_factor",
        "must be within 0..=1"
    );

    // Dash
    check!(
        errors,
        tuning.dash.max_dashes > 0,
        "dash.max_dashes",
        "must allow at least one dash"
    );
    check!(
        errors,
        (0.0..=1.0).contains(&tuning.dash.end_preservation),
        "dash.end_preservation",
        "must be within 0..=1"
    );

    errors
}
