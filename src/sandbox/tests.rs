//! Sandbox domain: unit tests for AABB geometry, ray queries and the box body.

use bevy::math::{Dir2, Vec2};

use super::*;
use crate::config::{BodyTuning, MotionTuning};
use crate::controller::{MotionController, PhysicsBody, PhysicsWorld, SteppedHost};
use crate::core::PhysicsError;
use crate::input::{InputFrame, RawButtons};

// ---------------------------------------------------------------------------
// Aabb
// ---------------------------------------------------------------------------

#[test]
fn test_aabb_from_center() {
    let aabb = Aabb::from_center(Vec2::new(10.0, 0.0), Vec2::new(4.0, 2.0));
    assert_eq!(aabb.min, Vec2::new(8.0, -1.0));
    assert_eq!(aabb.max, Vec2::new(12.0, 1.0));
    assert_eq!(aabb.center(), Vec2::new(10.0, 0.0));
}

#[test]
fn test_touching_boxes_do_not_overlap() {
    let a = Aabb::from_center(Vec2::ZERO, Vec2::splat(2.0));
    let touching = Aabb::from_center(Vec2::new(2.0, 0.0), Vec2::splat(2.0));
    let overlapping = Aabb::from_center(Vec2::new(1.5, 0.5), Vec2::splat(2.0));

    assert_eq!(a.overlap(&touching), None);
    assert_eq!(a.overlap(&overlapping), Some(Vec2::new(0.5, 1.5)));
}

#[test]
fn test_ray_hit_reports_distance_and_normal() {
    let solid = Aabb::from_center(Vec2::new(0.0, -20.0), Vec2::new(100.0, 40.0));

    let hit = solid
        .ray_hit(Vec2::new(0.0, 10.0), Vec2::NEG_Y, 50.0)
        .expect("ray hits the top face");
    assert_eq!(hit.distance, 10.0);
    assert_eq!(hit.normal, Vec2::Y);
    assert_eq!(hit.point, Vec2::ZERO);

    assert!(solid.ray_hit(Vec2::new(0.0, 10.0), Vec2::NEG_Y, 5.0).is_none());
    assert!(solid.ray_hit(Vec2::new(0.0, 10.0), Vec2::Y, 50.0).is_none());
    assert!(solid.ray_hit(Vec2::new(80.0, 10.0), Vec2::NEG_Y, 50.0).is_none());
}

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

#[test]
fn test_floor_and_wall_placement() {
    let level = Level::new()
        .with_floor(0.0, 400.0)
        .with_wall(50.0, 0.0, 200.0)
        .with_wall(-50.0, 0.0, 200.0);

    assert_eq!(level.solids[0].max.y, 0.0);
    assert_eq!(level.solids[1].min.x, 50.0);
    assert_eq!(level.solids[2].max.x, -50.0);
    assert_eq!(level.solids[1].max.y, 200.0);
}

#[test]
fn test_level_returns_nearest_hit() {
    let level = Level::new()
        .with_wall(30.0, -100.0, 100.0)
        .with_wall(60.0, -100.0, 100.0);

    let hit = level
        .cast_ray(Vec2::ZERO, Dir2::X, 100.0, true)
        .expect("query succeeds")
        .expect("wall hit");
    assert_eq!(hit.distance, 30.0);
    assert_eq!(hit.normal, Vec2::NEG_X);

    assert_eq!(level.cast_ray(Vec2::ZERO, Dir2::NEG_X, 100.0, true), Ok(None));
}

#[test]
fn test_injected_ray_fault() {
    let level = Level {
        fail_rays: true,
        ..Level::new().with_floor(0.0, 100.0)
    };
    assert!(matches!(
        level.cast_ray(Vec2::ZERO, Dir2::NEG_Y, 10.0, true),
        Err(PhysicsError::QueryFailed(_))
    ));
}

// ---------------------------------------------------------------------------
// SandboxBody
// ---------------------------------------------------------------------------

fn body_at(position: Vec2) -> SandboxBody {
    SandboxBody::new(position, Vec2::new(12.0, 24.0))
}

#[test]
fn test_body_lands_on_floor() {
    let level = Level::new().with_floor(0.0, 400.0);
    let mut body = body_at(Vec2::new(0.0, 30.0));
    body.velocity = Vec2::new(0.0, -600.0);
    body.angular_velocity = 5.0;

    body.integrate(&level, 0.02);
    assert!((body.position.y - 24.0).abs() < 1e-4);
    assert_eq!(body.velocity.y, 0.0);
    assert_eq!(body.angular_velocity, 0.0);
}

#[test]
fn test_body_stops_at_wall() {
    let level = Level::new().with_wall(30.0, -100.0, 100.0);
    let mut body = body_at(Vec2::new(10.0, 0.0));
    body.velocity = Vec2::new(200.0, -10.0);

    body.integrate(&level, 0.1);
    assert!((body.position.x - 18.0).abs() < 1e-4);
    assert_eq!(body.velocity.x, 0.0);
    assert_eq!(body.velocity.y, -10.0);
}

#[test]
fn test_body_free_flight_and_spin() {
    let mut body = body_at(Vec2::ZERO);
    body.set_linear_velocity(Vec2::new(10.0, 20.0)).unwrap();
    body.apply_impulse(Vec2::new(5.0, 0.0)).unwrap();
    body.apply_torque_impulse(2.0).unwrap();

    body.integrate(&Level::new(), 0.5);
    assert_eq!(body.position, Vec2::new(7.5, 10.0));
    assert_eq!(body.rotation().unwrap(), 1.0);
}

#[test]
fn test_unavailable_body_errors() {
    let mut body = body_at(Vec2::ZERO);
    body.unavailable = true;

    assert_eq!(body.position(), Err(PhysicsError::BodyUnavailable));
    assert_eq!(body.linear_velocity(), Err(PhysicsError::BodyUnavailable));
    assert_eq!(
        body.set_linear_velocity(Vec2::ONE),
        Err(PhysicsError::BodyUnavailable)
    );
    assert_eq!(body.velocity, Vec2::ZERO);
}

// ---------------------------------------------------------------------------
// Sandbox host
// ---------------------------------------------------------------------------

fn sandbox() -> Sandbox {
    Sandbox::new(
        Level::new().with_floor(0.0, 2_000.0),
        Vec2::new(0.0, 24.0),
        &BodyTuning::default(),
    )
}

#[test]
fn test_run_polls_then_steps() {
    let mut sandbox = sandbox();
    let mut controller = MotionController::new(MotionTuning::default(), 3);
    let held_right = RawButtons {
        right: true,
        ..RawButtons::default()
    };

    let reports = sandbox.run(&mut controller, vec![(17.0, held_right); 10]);
    assert_eq!(reports.len(), 10);
    assert!(reports.iter().all(|r| r.steps == 1));

    let position = sandbox.position().expect("body present");
    assert!(position.x > 0.0);
    assert_eq!(position.y, 24.0);
    assert_eq!(controller.facing(), 1.0);
}

#[test]
fn test_replay_matches_run_for_same_input() {
    let held_left = RawButtons {
        left: true,
        ..RawButtons::default()
    };

    let mut polled = sandbox();
    let mut polled_controller = MotionController::new(MotionTuning::default(), 3);
    polled.run(&mut polled_controller, vec![(17.0, held_left); 6]);

    // The same polls, stamped the way `poll_input` stamps them.
    let frames: Vec<InputFrame> = (0..6)
        .map(|i| InputFrame::from_raw(held_left, i as f64 * 17.0))
        .collect();
    let mut replayed = sandbox();
    let mut replayed_controller = MotionController::new(MotionTuning::default(), 3);
    replayed.replay(&mut replayed_controller, &frames, &[17.0; 6]);

    assert_eq!(polled.body, replayed.body);
    assert_eq!(polled.events, replayed.events);
    assert_eq!(replayed_controller.facing(), -1.0);
}

#[test]
fn test_detach_body() {
    let mut sandbox = sandbox();
    assert!(sandbox.detach_body().is_some());
    assert_eq!(sandbox.position(), None);
    assert_eq!(sandbox.velocity(), None);

    // Advancing without a body is a no-op.
    sandbox.advance(0.016);
    assert!(sandbox.body.is_none());
}
