//! Core domain: fixed timestep accumulator.

use std::time::Duration;

use crate::config::StepTuning;
use crate::core::MotionError;

/// Steps to run for one external frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepPlan {
    pub steps: u32,
    /// Backlog discarded because it exceeded the per-call step cap.
    pub dropped: Duration,
}

/// Accumulates variable frame time and releases it in fixed steps.
///
/// Time is tracked in integer nanoseconds so the same total delta produces
/// the same step boundaries no matter how it is split across calls.
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    step: Duration,
    max_steps: u32,
    max_delta_ms: f32,
    accumulator: Duration,
    steps_taken: u64,
}

impl FixedStepClock {
    pub fn new(tuning: &StepTuning) -> Self {
        let hz = tuning.steps_per_second.max(1) as u64;
        Self {
            step: Duration::from_nanos((1_000_000_000 + hz / 2) / hz),
            max_steps: tuning.max_steps_per_update.max(1),
            max_delta_ms: tuning.max_delta_ms,
            accumulator: Duration::ZERO,
            steps_taken: 0,
        }
    }

    pub fn step_duration(&self) -> Duration {
        self.step
    }

    pub fn step_ms(&self) -> f32 {
        (self.step.as_nanos() as f64 / 1_000_000.0) as f32
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Simulation time at the start of the next step.
    pub fn now_ms(&self) -> f64 {
        (self.steps_taken as u128 * self.step.as_nanos()) as f64 / 1_000_000.0
    }

    /// Simulation time plus the unconsumed remainder; the timestamp base for
    /// input polled between updates.
    pub fn clock_ms(&self) -> f64 {
        self.now_ms() + self.accumulator.as_nanos() as f64 / 1_000_000.0
    }

    /// Clamp a host-supplied delta into `[0, max_delta_ms]`.
    ///
    /// Returns the usable delta and, when the input was unusable, the error
    /// describing what was clamped.
    pub fn sanitize_delta(&self, delta_ms: f32) -> (f32, Option<MotionError>) {
        let clamped_ms = if delta_ms.is_nan() || delta_ms < 0.0 {
            0.0
        } else if delta_ms > self.max_delta_ms {
            self.max_delta_ms
        } else {
            return (delta_ms, None);
        };
        (
            clamped_ms,
            Some(MotionError::InvalidTimestep {
                delta_ms,
                clamped_ms,
            }),
        )
    }

    /// Add a sanitized delta and plan the steps it releases.
    pub fn advance(&mut self, delta_ms: f32) -> StepPlan {
        let nanos = (delta_ms.max(0.0) as f64 * 1_000_000.0).round() as u64;
        self.accumulator = self.accumulator.saturating_add(Duration::from_nanos(nanos));

        let mut steps = 0u32;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }

        let mut dropped = Duration::ZERO;
        if self.accumulator >= self.step {
            dropped = self.accumulator;
            self.accumulator = Duration::ZERO;
        }

        StepPlan { steps, dropped }
    }

    /// Mark one planned step as executed.
    pub fn finish_step(&mut self) {
        self.steps_taken += 1;
    }
}
