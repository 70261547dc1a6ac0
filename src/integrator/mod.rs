//! Integrator domain: horizontal handling, vertical shaping and momentum.

mod momentum;
mod movement;

pub use momentum::{MomentumSignal, MomentumState, MomentumTracker};
pub use movement::{MovementIntegrator, StepDrive, Surface, blend_momentum, move_toward};
