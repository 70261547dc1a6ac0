//! Jump domain: the three-stage jump sequence and its timing rules.

mod curve;
mod machine;

pub use curve::{ComboGrade, GravityProfile, VerticalControl};
pub use machine::{JumpAttempt, JumpLaunch, JumpPhase, JumpState, JumpStateMachine};
