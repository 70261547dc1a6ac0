//! Character motion core for a 2D platformer.
//!
//! Turns raw per-frame input into fixed-step velocity changes, jump
//! escalation, wall interaction and dashing, and reports what happened as a
//! stream of [`MotionEvent`]s. The [`plugin`] module wires it into Bevy with
//! avian2d bodies; everything else is engine-agnostic and driven through the
//! capability traits in [`controller`].

pub mod config;
pub mod controller;
pub mod core;
pub mod input;
pub mod integrator;
pub mod jump;
pub mod plugin;
pub mod sandbox;
pub mod sensing;
pub mod wall;

pub use config::{MotionTuning, load_tuning, validate_tuning};
pub use controller::{
    EventLog, EventSink, FrameReport, MotionContext, MotionController, MotionEvent, PhysicsBody,
    PhysicsWorld, RayHit, SteppedHost,
};
pub use crate::core::{MotionError, PhysicsError};
pub use input::{InputFrame, RawButtons};
