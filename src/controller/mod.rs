//! Controller domain: the motion façade, its collaborator traits and the
//! events it emits.

mod events;
mod motion;
mod physics;

pub use events::{EventLog, EventSink, MotionEvent};
pub use motion::{FrameReport, MotionController};
pub use physics::{MotionContext, PhysicsBody, PhysicsWorld, RayHit, SteppedHost};
