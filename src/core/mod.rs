//! Core domain: time, randomness, deferred tasks and errors shared by every
//! motion subsystem.

mod clock;
mod error;
mod rng;
mod scheduler;
#[cfg(test)]
mod tests;

pub use clock::{FixedStepClock, StepPlan};
pub use error::{MotionError, PhysicsError};
pub use rng::{CosmeticRng, ParticleSpray};
pub use scheduler::{DeferredScheduler, MotionTask, TaskHandle, TaskScheduler};
