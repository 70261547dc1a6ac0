//! Plugin domain: avian2d adapters for the motion core's physics traits.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::controller::{PhysicsBody, PhysicsWorld, RayHit};
use crate::core::PhysicsError;

use super::GameLayer;

/// One character's rigid body for the duration of a fixed step.
///
/// Impulses are applied as velocity changes: the motion core treats the
/// character as unit mass.
pub struct AvianBody<'a> {
    pub transform: &'a Transform,
    pub velocity: &'a mut LinearVelocity,
    pub angular_velocity: &'a mut AngularVelocity,
}

impl PhysicsBody for AvianBody<'_> {
    fn position(&self) -> Result<Vec2, PhysicsError> {
        let position = self.transform.translation.truncate();
        if !position.is_finite() {
            return Err(PhysicsError::NonFinite("position"));
        }
        Ok(position)
    }

    fn linear_velocity(&self) -> Result<Vec2, PhysicsError> {
        Ok(self.velocity.0)
    }

    fn set_linear_velocity(&mut self, velocity: Vec2) -> Result<(), PhysicsError> {
        if !velocity.is_finite() {
            return Err(PhysicsError::NonFinite("velocity"));
        }
        self.velocity.0 = velocity;
        Ok(())
    }

    fn apply_impulse(&mut self, impulse: Vec2) -> Result<(), PhysicsError> {
        if !impulse.is_finite() {
            return Err(PhysicsError::NonFinite("impulse"));
        }
        self.velocity.0 += impulse;
        Ok(())
    }

    fn rotation(&self) -> Result<f32, PhysicsError> {
        let (z, _, _) = self.transform.rotation.to_euler(EulerRot::ZYX);
        Ok(z)
    }

    fn apply_torque_impulse(&mut self, torque: f32) -> Result<(), PhysicsError> {
        if !torque.is_finite() {
            return Err(PhysicsError::NonFinite("torque"));
        }
        self.angular_velocity.0 += torque;
        Ok(())
    }
}

/// Ray queries against ground and wall colliders.
pub struct AvianWorld<'a, 'w, 's> {
    spatial_query: &'a SpatialQuery<'w, 's>,
    solids: SpatialQueryFilter,
    solids_except_self: SpatialQueryFilter,
}

impl<'a, 'w, 's> AvianWorld<'a, 'w, 's> {
    pub fn new(spatial_query: &'a SpatialQuery<'w, 's>, this: Entity) -> Self {
        let solids = solid_filter();
        Self {
            spatial_query,
            solids_except_self: solids.clone().with_excluded_entities([this]),
            solids,
        }
    }
}

/// Only ground and wall layers block probes; sensors and other characters
/// never count as contact.
pub fn solid_filter() -> SpatialQueryFilter {
    SpatialQueryFilter::from_mask([GameLayer::Ground, GameLayer::Wall])
}

impl PhysicsWorld for AvianWorld<'_, '_, '_> {
    fn cast_ray(
        &self,
        origin: Vec2,
        direction: Dir2,
        max_distance: f32,
        exclude_self: bool,
    ) -> Result<Option<RayHit>, PhysicsError> {
        if !origin.is_finite() || !max_distance.is_finite() {
            return Err(PhysicsError::QueryFailed(format!(
                "non-finite ray from {origin:?} over {max_distance}"
            )));
        }
        let filter = if exclude_self {
            &self.solids_except_self
        } else {
            &self.solids
        };
        let hit = self
            .spatial_query
            .cast_ray(origin, direction, max_distance, true, filter)
            .map(|hit| RayHit {
                point: origin + *direction * hit.distance,
                normal: hit.normal,
                distance: hit.distance,
            });
        Ok(hit)
    }
}
