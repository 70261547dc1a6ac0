//! Controller domain: capability traits for the external physics world.
//!
//! The motion core never owns the body. It reads and writes through these
//! accessors for the duration of one update and keeps nothing across frames.

use bevy::math::{Dir2, Vec2};

use crate::core::PhysicsError;

use super::EventSink;

/// Handle to the controlled rigid body.
pub trait PhysicsBody {
    fn position(&self) -> Result<Vec2, PhysicsError>;
    fn linear_velocity(&self) -> Result<Vec2, PhysicsError>;
    fn set_linear_velocity(&mut self, velocity: Vec2) -> Result<(), PhysicsError>;
    fn apply_impulse(&mut self, impulse: Vec2) -> Result<(), PhysicsError>;
    /// Rotation in radians, counter-clockwise.
    fn rotation(&self) -> Result<f32, PhysicsError>;
    fn apply_torque_impulse(&mut self, torque: f32) -> Result<(), PhysicsError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec2,
    pub normal: Vec2,
    pub distance: f32,
}

/// Spatial queries against the physics world.
pub trait PhysicsWorld {
    fn cast_ray(
        &self,
        origin: Vec2,
        direction: Dir2,
        max_distance: f32,
        exclude_self: bool,
    ) -> Result<Option<RayHit>, PhysicsError>;
}

/// Borrowed collaborators for one update.
///
/// `body` is optional: a character whose body is gone skips the frame.
pub struct MotionContext<'a> {
    pub body: Option<&'a mut dyn PhysicsBody>,
    pub world: &'a dyn PhysicsWorld,
    pub events: &'a mut dyn EventSink,
}

impl<'a> MotionContext<'a> {
    pub fn new(
        body: &'a mut dyn PhysicsBody,
        world: &'a dyn PhysicsWorld,
        events: &'a mut dyn EventSink,
    ) -> Self {
        Self {
            body: Some(body),
            world,
            events,
        }
    }
}

/// A host whose physics integrates in lockstep with the controller's fixed
/// steps, so one call to `update_stepped` covers sensing through to the
/// moved body.
pub trait SteppedHost {
    fn context(&mut self) -> MotionContext<'_>;

    /// Integrate the world by one fixed step.
    fn advance(&mut self, dt_secs: f32);
}
