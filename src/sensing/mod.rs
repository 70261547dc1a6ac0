//! Sensing domain: derives ground and wall contact from physics queries.

mod ground;
mod wall;

pub use ground::{CoyoteTimer, GroundContactTracker, GroundPhase, GroundTransition, probe_ground};
pub use wall::{ContactEdge, WallContactSensor, WallContactState, WallSide};
