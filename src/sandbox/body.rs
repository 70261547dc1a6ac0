//! Sandbox domain: a unit-mass box body with axis-separated collision.

use bevy::math::Vec2;

use crate::controller::PhysicsBody;
use crate::core::PhysicsError;

use super::level::{Aabb, Level};

#[derive(Debug, Clone, PartialEq)]
pub struct SandboxBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub rotation: f32,
    pub angular_velocity: f32,
    pub half_extents: Vec2,
    /// While set, every accessor reports the body as unavailable.
    pub unavailable: bool,
}

impl SandboxBody {
    pub fn new(position: Vec2, half_extents: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            angular_velocity: 0.0,
            half_extents,
            unavailable: false,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb {
            min: self.position - self.half_extents,
            max: self.position + self.half_extents,
        }
    }

    fn check(&self) -> Result<(), PhysicsError> {
        if self.unavailable {
            Err(PhysicsError::BodyUnavailable)
        } else {
            Ok(())
        }
    }

    /// Move by one step, resolving x then y against the level. Contact
    /// zeroes velocity along the blocked axis; landing also stops the spin.
    pub fn integrate(&mut self, level: &Level, dt_secs: f32) {
        self.position.x += self.velocity.x * dt_secs;
        for solid in &level.solids {
            if let Some(depth) = self.aabb().overlap(solid) {
                if self.position.x < solid.center().x {
                    self.position.x -= depth.x;
                } else {
                    self.position.x += depth.x;
                }
                self.velocity.x = 0.0;
            }
        }

        self.position.y += self.velocity.y * dt_secs;
        for solid in &level.solids {
            if let Some(depth) = self.aabb().overlap(solid) {
                if self.position.y < solid.center().y {
                    self.position.y -= depth.y;
                } else {
                    self.position.y += depth.y;
                    self.angular_velocity = 0.0;
                }
                self.velocity.y = 0.0;
            }
        }

        self.rotation += self.angular_velocity * dt_secs;
    }
}

impl PhysicsBody for SandboxBody {
    fn position(&self) -> Result<Vec2, PhysicsError> {
        self.check()?;
        Ok(self.position)
    }

    fn linear_velocity(&self) -> Result<Vec2, PhysicsError> {
        self.check()?;
        Ok(self.velocity)
    }

    fn set_linear_velocity(&mut self, velocity: Vec2) -> Result<(), PhysicsError> {
        self.check()?;
        self.velocity = velocity;
        Ok(())
    }

    fn apply_impulse(&mut self, impulse: Vec2) -> Result<(), PhysicsError> {
        self.check()?;
        self.velocity += impulse;
        Ok(())
    }

    fn rotation(&self) -> Result<f32, PhysicsError> {
        self.check()?;
        Ok(self.rotation)
    }

    fn apply_torque_impulse(&mut self, torque: f32) -> Result<(), PhysicsError> {
        self.check()?;
        self.angular_velocity += torque;
        Ok(())
    }
}
