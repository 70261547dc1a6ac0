//! Core domain: unit tests for the step clock, scheduler, RNG and errors.

use std::time::Duration;

use super::{
    CosmeticRng, DeferredScheduler, FixedStepClock, MotionError, MotionTask, PhysicsError,
    TaskScheduler,
};
use crate::config::StepTuning;

// ---------------------------------------------------------------------------
// FixedStepClock
// ---------------------------------------------------------------------------

#[test]
fn test_step_duration_matches_rate() {
    let clock = FixedStepClock::new(&StepTuning::default());
    assert_eq!(clock.step_duration(), Duration::from_nanos(16_666_667));
    assert!((clock.step_ms() - 16.666_667).abs() < 1e-4);
}

#[test]
fn test_accumulator_releases_whole_steps() {
    let mut clock = FixedStepClock::new(&StepTuning::default());

    let plan = clock.advance(16.0);
    assert_eq!(plan.steps, 0);

    let plan = clock.advance(1.0);
    assert_eq!(plan.steps, 1);
    assert_eq!(plan.dropped, Duration::ZERO);

    let plan = clock.advance(34.0);
    assert_eq!(plan.steps, 2);
}

#[test]
fn test_step_cap_drops_backlog() {
    let mut clock = FixedStepClock::new(&StepTuning::default());
    let plan = clock.advance(250.0);

    assert_eq!(plan.steps, 5);
    assert!(plan.dropped > Duration::from_millis(160));

    // Nothing left over: the next small delta starts from an empty accumulator.
    let plan = clock.advance(10.0);
    assert_eq!(plan.steps, 0);
}

#[test]
fn test_clock_time_only_counts_finished_steps() {
    let mut clock = FixedStepClock::new(&StepTuning::default());
    let plan = clock.advance(40.0);
    assert_eq!(plan.steps, 2);
    assert_eq!(clock.now_ms(), 0.0);

    for _ in 0..plan.steps {
        clock.finish_step();
    }
    assert_eq!(clock.steps_taken(), 2);
    assert!((clock.now_ms() - 33.333_334).abs() < 1e-3);
    assert!((clock.clock_ms() - 40.0).abs() < 1e-3);
}

#[test]
fn test_chunking_does_not_change_step_count() {
    let deltas_whole = [48.0_f32, 52.0, 60.0];
    let deltas_split = [12.0_f32, 12.0, 12.0, 12.0, 26.0, 26.0, 30.0, 30.0];

    let mut whole = FixedStepClock::new(&StepTuning::default());
    let mut split = FixedStepClock::new(&StepTuning::default());

    let whole_steps: u32 = deltas_whole.iter().map(|d| whole.advance(*d).steps).sum();
    let split_steps: u32 = deltas_split.iter().map(|d| split.advance(*d).steps).sum();

    assert_eq!(whole_steps, split_steps);
    assert!((whole.clock_ms() - split.clock_ms()).abs() < 1e-9);
}

#[test]
fn test_sanitize_delta() {
    let clock = FixedStepClock::new(&StepTuning::default());

    assert_eq!(clock.sanitize_delta(16.0), (16.0, None));

    let (delta, error) = clock.sanitize_delta(f32::NAN);
    assert_eq!(delta, 0.0);
    assert!(matches!(error, Some(MotionError::InvalidTimestep { .. })));

    let (delta, error) = clock.sanitize_delta(-5.0);
    assert_eq!(delta, 0.0);
    assert!(error.is_some());

    let (delta, error) = clock.sanitize_delta(10_000.0);
    assert_eq!(delta, 250.0);
    assert_eq!(
        error,
        Some(MotionError::InvalidTimestep {
            delta_ms: 10_000.0,
            clamped_ms: 250.0
        })
    );

    let (delta, _) = clock.sanitize_delta(f32::INFINITY);
    assert_eq!(delta, 250.0);
}

// ---------------------------------------------------------------------------
// TaskScheduler
// ---------------------------------------------------------------------------

#[test]
fn test_scheduler_fires_due_tasks_in_order() {
    let mut scheduler = TaskScheduler::new();
    scheduler.schedule_once(50.0, "late");
    scheduler.schedule_once(10.0, "early");
    scheduler.schedule_once(10.0, "early_second");

    assert!(scheduler.advance_to(5.0).is_empty());
    assert_eq!(scheduler.advance_to(20.0), vec!["early", "early_second"]);
    assert_eq!(scheduler.len(), 1);
    assert_eq!(scheduler.advance_to(50.0), vec!["late"]);
    assert!(scheduler.is_empty());
}

#[test]
fn test_scheduler_delay_is_relative_to_now() {
    let mut scheduler = TaskScheduler::new();
    scheduler.advance_to(100.0);
    let handle = scheduler.schedule_once(40.0, MotionTask::RefreshDash);

    assert_eq!(scheduler.remaining_ms(handle), Some(40.0));
    assert!(scheduler.advance_to(139.0).is_empty());
    assert_eq!(scheduler.remaining_ms(handle), Some(1.0));
    assert_eq!(scheduler.advance_to(140.0), vec![MotionTask::RefreshDash]);
    assert_eq!(scheduler.remaining_ms(handle), None);
}

#[test]
fn test_scheduler_time_never_moves_backwards() {
    let mut scheduler: TaskScheduler<u8> = TaskScheduler::new();
    scheduler.advance_to(100.0);
    scheduler.advance_to(50.0);
    assert_eq!(scheduler.now_ms(), 100.0);
}

#[test]
fn test_scheduler_cancel() {
    let mut scheduler = TaskScheduler::new();
    let keep = scheduler.schedule_once(10.0, 1);
    let cancelled = scheduler.schedule_once(10.0, 2);

    assert!(scheduler.cancel(cancelled));
    assert!(!scheduler.cancel(cancelled));
    assert!(scheduler.is_pending(keep));
    assert!(!scheduler.is_pending(cancelled));
    assert_eq!(scheduler.advance_to(10.0), vec![1]);

    // Already fired.
    assert!(!scheduler.cancel(keep));
}

#[test]
fn test_scheduler_cancel_all() {
    let mut scheduler = TaskScheduler::new();
    scheduler.schedule_once(10.0, MotionTask::EndLandingRecovery);
    scheduler.schedule_once(400.0, MotionTask::RefreshDash);

    assert_eq!(scheduler.cancel_all(), 2);
    assert!(scheduler.advance_to(1_000.0).is_empty());
}

// ---------------------------------------------------------------------------
// CosmeticRng
// ---------------------------------------------------------------------------

#[test]
fn test_same_seed_same_spray() {
    let mut a = CosmeticRng::new(42);
    let mut b = CosmeticRng::new(42);
    assert_eq!(a.spray(8, 0.0, 1.0), b.spray(8, 0.0, 1.0));
    assert_eq!(a.spray(3, 1.0, 0.5), b.spray(3, 1.0, 0.5));
}

#[test]
fn test_different_seeds_diverge() {
    let mut a = CosmeticRng::new(1);
    let mut b = CosmeticRng::new(2);
    assert_ne!(a.spray(8, 0.0, 1.0), b.spray(8, 0.0, 1.0));
}

#[test]
fn test_reset_replays_stream() {
    let mut rng = CosmeticRng::new(7);
    let first = rng.spray(5, 0.0, 2.0);
    rng.reset();
    assert_eq!(rng.spray(5, 0.0, 2.0), first);
    assert_eq!(rng.seed(), 7);
}

#[test]
fn test_spray_stays_within_spread() {
    let mut rng = CosmeticRng::new(99);
    let spray = rng.spray(64, 1.0, 0.5);
    assert_eq!(spray.angles.len(), 64);
    assert!(spray.angles.iter().all(|a| (a - 1.0).abs() <= 0.25));

    let flat = rng.spray(4, -1.0, 0.0);
    assert!(flat.angles.iter().all(|a| *a == -1.0));
    assert!(rng.spray(0, 0.0, 1.0).is_empty());
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn test_physics_error_converts_into_motion_error() {
    let error: MotionError = PhysicsError::BodyUnavailable.into();
    assert_eq!(error, MotionError::Physics(PhysicsError::BodyUnavailable));
    assert_eq!(error.to_string(), "physics body is no longer available");
}

#[test]
fn test_error_messages_carry_values() {
    let error = MotionError::InvalidTimestep {
        delta_ms: -3.0,
        clamped_ms: 0.0,
    };
    assert!(error.to_string().contains("-3"));

    let error = PhysicsError::QueryFailed("broadphase offline".to_string());
    assert!(error.to_string().contains("broadphase offline"));
}
