//! Wall domain: unit tests for sliding, wall jumps, the direction lock and dash.

use bevy::math::Vec2;
use proptest::prelude::*;

use super::*;
use crate::config::{DashTuning, WallTuning};
use crate::core::{MotionTask, TaskScheduler};
use crate::input::InputFrame;
use crate::sensing::{WallContactState, WallSide};

fn system() -> WallInteractionSystem {
    WallInteractionSystem::new(&WallTuning::default(), &DashTuning::default())
}

fn touching_right() -> WallContactState {
    WallContactState {
        touching_right: true,
        ..WallContactState::default()
    }
}

fn falling(speed: f32) -> Vec2 {
    Vec2::new(0.0, -speed)
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-2
}

// ---------------------------------------------------------------------------
// Slide constraint and grip
// ---------------------------------------------------------------------------

fn constraint(grip: f32) -> SlideConstraint {
    SlideConstraint {
        side: WallSide::Right,
        max_speed: 140.0,
        grip,
        approach_rate: 6.0,
    }
}

#[test]
fn test_fast_fall_is_clamped_to_slide_cap() {
    assert_eq!(constraint(1.0).next_fall_speed(200.0, 1.0 / 60.0), 140.0);
    assert_eq!(constraint(0.3).next_fall_speed(900.0, 1.0 / 60.0), 140.0);
}

#[test]
fn test_slow_fall_approaches_cap_faster_with_less_grip() {
    let dt = 1.0 / 60.0;
    let fresh = constraint(1.0).next_fall_speed(40.0, dt);
    let worn = constraint(0.3).next_fall_speed(40.0, dt);

    assert!(fresh > 40.0 && fresh < 140.0);
    assert!(worn > fresh);
}

#[test]
fn test_grip_decays_to_floor() {
    let tuning = WallTuning::default();
    assert_eq!(grip_after(0.0, &tuning), 1.0);
    assert!(close(grip_after(1_000.0, &tuning), 0.65));
    assert_eq!(grip_after(10_000.0, &tuning), 0.3);
}

proptest! {
    #[test]
    fn prop_slide_never_exceeds_cap(
        fall in -200.0f32..2_000.0,
        grip in 0.3f32..=1.0,
        dt in 0.0f32..0.1,
    ) {
        let next = constraint(grip).next_fall_speed(fall, dt);
        prop_assert!(next <= 140.0);
    }
}

// ---------------------------------------------------------------------------
// Slide lifecycle
// ---------------------------------------------------------------------------

#[test]
fn test_slide_starts_when_falling_against_wall() {
    let mut walls = system();
    let mut contact = touching_right();

    let edge = walls.update_slide(&mut contact, false, falling(100.0), 0.0, 16.0);
    assert_eq!(edge, Some(SlideEdge::Started(WallSide::Right)));
    assert_eq!(walls.sliding(), Some(WallSide::Right));
    assert!(contact.slide_active);

    let slide = walls.slide_constraint(&contact).expect("sliding has a constraint");
    assert_eq!(slide.max_speed, 140.0);
    assert_eq!(slide.grip, 1.0);
}

#[test]
fn test_slow_fall_does_not_stick() {
    let mut walls = system();
    let mut contact = touching_right();
    assert_eq!(walls.update_slide(&mut contact, false, falling(20.0), 0.0, 16.0), None);
    assert_eq!(walls.update_slide(&mut contact, true, falling(100.0), 0.0, 16.0), None);
    assert_eq!(walls.sliding(), None);
}

#[test]
fn test_grip_wears_while_sliding() {
    let mut walls = system();
    let mut contact = touching_right();
    walls.update_slide(&mut contact, false, falling(100.0), 0.0, 16.0);

    for _ in 0..10 {
        assert_eq!(walls.update_slide(&mut contact, false, falling(120.0), 0.0, 100.0), None);
    }
    assert_eq!(contact.slide_time_ms, 1_000.0);
    assert!(close(contact.grip_strength, 0.65));
}

#[test]
fn test_losing_contact_ends_slide_into_wall_coyote() {
    let mut walls = system();
    let mut contact = touching_right();
    walls.update_slide(&mut contact, false, falling(100.0), 0.0, 16.0);

    contact.touching_right = false;
    let edge = walls.update_slide(&mut contact, false, falling(100.0), 0.0, 16.0);
    assert_eq!(edge, Some(SlideEdge::Ended(WallSide::Right)));
    assert!(!contact.slide_active);
    assert_eq!(walls.wall_jump_side(), Some(WallSide::Right));

    walls.tick(79.0);
    assert!(walls.wall_coyote().is_some());
    walls.tick(1.0);
    assert!(walls.wall_coyote().is_none());
    assert_eq!(walls.wall_jump_side(), None);
}

#[test]
fn test_pushing_away_detaches() {
    let mut walls = system();
    let mut contact = touching_right();
    walls.update_slide(&mut contact, false, falling(100.0), 0.0, 16.0);

    let edge = walls.update_slide(&mut contact, false, Vec2::new(-100.0, -100.0), -1.0, 16.0);
    assert_eq!(edge, Some(SlideEdge::Ended(WallSide::Right)));
}

#[test]
fn test_landing_ends_slide_without_coyote() {
    let mut walls = system();
    let mut contact = touching_right();
    walls.update_slide(&mut contact, false, falling(100.0), 0.0, 16.0);

    let edge = walls.update_slide(&mut contact, true, Vec2::ZERO, 0.0, 16.0);
    assert_eq!(edge, Some(SlideEdge::Ended(WallSide::Right)));
    assert!(walls.wall_coyote().is_none());
}

#[test]
fn test_stick_impulse_points_into_wall() {
    let mut walls = system();
    assert_eq!(walls.stick_impulse(0.1), None);

    let mut contact = touching_right();
    walls.update_slide(&mut contact, false, falling(100.0), 0.0, 16.0);
    let impulse = walls.stick_impulse(0.1).expect("sliding pushes into the wall");
    assert!(close(impulse.x, 60.0));
    assert_eq!(impulse.y, 0.0);
}

// ---------------------------------------------------------------------------
// Wall jump and direction lock
// ---------------------------------------------------------------------------

#[test]
fn test_wall_jump_velocity_points_away() {
    let tuning = WallTuning::default();

    let right = wall_jump_velocity(WallSide::Right, 0.0, &tuning);
    assert!(close(right.x, -400.0));
    assert!(close(right.y, 600.0));

    let left = wall_jump_velocity(WallSide::Left, 0.0, &tuning);
    assert!(close(left.x, 400.0));
}

#[test]
fn test_wall_jump_angle_adjusts_with_vertical_input() {
    let tuning = WallTuning::default();
    let neutral = wall_jump_velocity(WallSide::Left, 0.0, &tuning);
    let up = wall_jump_velocity(WallSide::Left, 1.0, &tuning);
    let down = wall_jump_velocity(WallSide::Left, -1.0, &tuning);

    assert!(up.y > neutral.y && up.x < neutral.x);
    assert!(down.y < neutral.y && down.x > neutral.x);
    assert!(close(up.length(), neutral.length()));
    assert!(close(down.length(), neutral.length()));
}

#[test]
fn test_direction_lock_filter() {
    let lock = DirectionLock {
        wall: WallSide::Right,
        remaining_ms: 300.0,
    };
    assert_eq!(lock.filter(1.0, 0.25), 0.25);
    assert_eq!(lock.filter(-1.0, 0.25), -1.0);
    assert_eq!(lock.filter(0.0, 0.25), 0.0);
}

#[test]
fn test_wall_jump_ends_slide_and_locks_direction() {
    let mut walls = system();
    let mut contact = touching_right();
    walls.update_slide(&mut contact, false, falling(100.0), 0.0, 16.0);

    let side = walls.wall_jump_side().expect("sliding");
    let launch = walls.wall_jump(side, 0.0, &mut contact);
    assert_eq!(launch.side, WallSide::Right);
    assert!(launch.velocity.x < 0.0);
    assert_eq!(walls.sliding(), None);
    assert!(!contact.slide_active);

    assert!(walls.facing_locked());
    assert_eq!(walls.filter_input(1.0), 0.25);
    assert_eq!(walls.filter_input(-1.0), -1.0);

    walls.tick(300.0);
    assert!(walls.direction_lock().is_none());
    assert_eq!(walls.filter_input(1.0), 1.0);
}

// ---------------------------------------------------------------------------
// Dash
// ---------------------------------------------------------------------------

fn input(left: bool, right: bool, up: bool, down: bool) -> InputFrame {
    InputFrame {
        left,
        right,
        up,
        down,
        dash: true,
        ..InputFrame::default()
    }
}

#[test]
fn test_dash_direction_choice() {
    let dash = DashSystem::new(&DashTuning::default());

    assert_eq!(
        dash.choose(true, None, &input(false, false, false, false), -1.0),
        (DashDirection::Horizontal, -1.0)
    );
    assert_eq!(
        dash.choose(false, None, &input(false, true, true, false), -1.0),
        (DashDirection::DiagonalUp, 1.0)
    );
    assert_eq!(
        dash.choose(false, None, &input(true, false, false, true), 1.0),
        (DashDirection::DiagonalDown, -1.0)
    );
    // No downward dash into the floor.
    assert_eq!(
        dash.choose(true, None, &input(false, false, false, true), 1.0).0,
        DashDirection::Horizontal
    );
    // A touched wall wins over input.
    assert_eq!(
        dash.choose(false, Some(WallSide::Left), &input(true, false, false, false), -1.0).1,
        1.0
    );
}

#[test]
fn test_diagonal_vector_is_unit_length() {
    let v = DashDirection::DiagonalUp.vector(-1.0, 45.0);
    assert!(v.x < 0.0 && v.y > 0.0);
    assert!((v.length() - 1.0).abs() < 1e-5);
}

#[test]
fn test_dash_cooldown_refreshes_charge() {
    let mut scheduler = TaskScheduler::new();
    let mut dash = DashSystem::new(&DashTuning::default());
    let frame = input(false, true, false, false);

    let launch = dash
        .try_start(0.0, false, None, &frame, 1.0, &mut scheduler)
        .expect("first dash");
    assert_eq!(launch.velocity, Vec2::new(900.0, 0.0));
    assert!(dash.is_active());
    assert!(!dash.state().available);
    assert_eq!(scheduler.len(), 1);

    assert_eq!(dash.drive().map(|d| d.zero_gravity), Some(true));
    assert_eq!(dash.finish_if_due(100.0), None);
    assert_eq!(dash.finish_if_due(160.0), Some(0.55));
    assert!(!dash.is_active());
    assert!(dash.drive().is_none());

    // Charge spent until the cooldown fires.
    assert!(dash.try_start(200.0, false, None, &frame, 1.0, &mut scheduler).is_none());
    assert!(scheduler.advance_to(399.0).is_empty());
    assert_eq!(scheduler.advance_to(400.0), vec![MotionTask::RefreshDash]);
    dash.refresh_from_cooldown();

    assert!(dash.state().available);
    assert!(dash.try_start(400.0, false, None, &frame, 1.0, &mut scheduler).is_some());
}

#[test]
fn test_landing_refresh_cancels_cooldown() {
    let mut scheduler = TaskScheduler::new();
    let mut dash = DashSystem::new(&DashTuning::default());
    let frame = input(false, false, false, false);

    dash.try_start(0.0, false, None, &frame, 1.0, &mut scheduler);
    dash.finish_if_due(160.0);
    dash.refresh_on_landing(&mut scheduler);

    assert!(scheduler.is_empty());
    assert!(dash.state().available);
    assert_eq!(dash.state().dash_count, 0);
}

#[test]
fn test_air_dash_can_be_disabled() {
    let tuning = DashTuning {
        allow_air_dash: false,
        ..DashTuning::default()
    };
    let mut scheduler = TaskScheduler::new();
    let mut dash = DashSystem::new(&tuning);
    let frame = input(false, false, false, false);

    assert!(dash.try_start(0.0, false, None, &frame, 1.0, &mut scheduler).is_none());
    assert!(dash.try_start(0.0, true, None, &frame, 1.0, &mut scheduler).is_some());
}

#[test]
fn test_multiple_charges() {
    let tuning = DashTuning {
        max_dashes: 2,
        ..DashTuning::default()
    };
    let mut scheduler = TaskScheduler::new();
    let mut dash = DashSystem::new(&tuning);
    let frame = input(false, false, false, false);

    dash.try_start(0.0, false, None, &frame, 1.0, &mut scheduler);
    assert!(scheduler.is_empty());
    dash.finish_if_due(160.0);
    assert!(dash.state().available);

    dash.try_start(200.0, false, None, &frame, 1.0, &mut scheduler);
    assert_eq!(scheduler.len(), 1);
}

#[test]
fn test_dash_off_slide_pushes_away() {
    let mut walls = system();
    let mut contact = touching_right();
    let mut scheduler = TaskScheduler::new();
    walls.update_slide(&mut contact, false, falling(100.0), 0.0, 16.0);

    let launch = walls
        .try_dash(0.0, false, None, &input(false, true, false, false), 1.0, &mut scheduler)
        .expect("dash off the wall");
    assert_eq!(launch.sign, -1.0);
    assert!(walls.dash_active());
    assert!(walls.facing_locked());

    // The slide gives way to the dash on the next step.
    let edge = walls.update_slide(&mut contact, false, launch.velocity, 1.0, 16.0);
    assert_eq!(edge, Some(SlideEdge::Ended(WallSide::Right)));
}

#[test]
fn test_reset_clears_wall_state() {
    let mut walls = system();
    let mut contact = touching_right();
    let mut scheduler = TaskScheduler::new();
    walls.update_slide(&mut contact, false, falling(100.0), 0.0, 16.0);
    walls.wall_jump(WallSide::Right, 0.0, &mut contact);
    walls.try_dash(0.0, false, None, &input(false, false, false, false), 1.0, &mut scheduler);

    walls.reset();
    assert_eq!(walls.sliding(), None);
    assert!(walls.direction_lock().is_none());
    assert!(!walls.dash_active());
    assert!(walls.dash_state().available);
}
