//! Config domain: tuning data, RON loading and validation.

mod loader;
mod tuning;
mod validation;

pub use loader::{TuningLoadError, load_tuning, parse_tuning};
pub use tuning::{
    BodyTuning, DashTuning, GroundTuning, InputTuning, JumpCurve, JumpTuning, MAX_JUMPS,
    MomentumTuning, MotionTuning, MovementTuning, StepTuning, SurfaceParams, WallTuning,
};
pub use validation::{TuningError, validate_tuning};
