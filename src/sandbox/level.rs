//! Sandbox domain: static AABB geometry and ray queries against it.

use bevy::math::{Dir2, Vec2};

use crate::controller::{PhysicsWorld, RayHit};
use crate::core::PhysicsError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Penetration depth per axis, or `None` when the boxes only touch.
    pub fn overlap(&self, other: &Aabb) -> Option<Vec2> {
        let x = self.max.x.min(other.max.x) - self.min.x.max(other.min.x);
        let y = self.max.y.min(other.max.y) - self.min.y.max(other.min.y);
        (x > OVERLAP_EPSILON && y > OVERLAP_EPSILON).then_some(Vec2::new(x, y))
    }

    /// Slab test; returns the entry distance and surface normal.
    pub fn ray_hit(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<RayHit> {
        let mut t_min = 0.0_f32;
        let mut t_max = max_distance;
        let mut normal = Vec2::ZERO;

        for axis in 0..2 {
            let (o, d, lo, hi) = (origin[axis], direction[axis], self.min[axis], self.max[axis]);
            if d.abs() < f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let (mut t0, mut t1) = ((lo - o) * inv, (hi - o) * inv);
            let mut axis_normal = Vec2::ZERO;
            axis_normal[axis] = -d.signum();
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            if t0 > t_min {
                t_min = t0;
                normal = axis_normal;
            }
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        Some(RayHit {
            point: origin + direction * t_min,
            normal,
            distance: t_min,
        })
    }
}

const OVERLAP_EPSILON: f32 = 1e-3;

/// Solid geometry plus an injectable query fault.
#[derive(Debug, Clone, Default)]
pub struct Level {
    pub solids: Vec<Aabb>,
    /// While set, every ray cast fails.
    pub fail_rays: bool,
}

impl Level {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_solid(mut self, center: Vec2, size: Vec2) -> Self {
        self.solids.push(Aabb::from_center(center, size));
        self
    }

    /// Flat floor whose top surface sits at `top`.
    pub fn with_floor(self, top: f32, width: f32) -> Self {
        self.with_solid(Vec2::new(0.0, top - 20.0), Vec2::new(width, 40.0))
    }

    /// Wall spanning `bottom..top` whose inner face sits at `face_x`; the
    /// solid extends away from the origin.
    pub fn with_wall(self, face_x: f32, bottom: f32, top: f32) -> Self {
        let center_x = face_x + face_x.signum() * 20.0;
        self.with_solid(
            Vec2::new(center_x, (bottom + top) * 0.5),
            Vec2::new(40.0, top - bottom),
        )
    }
}

impl PhysicsWorld for Level {
    fn cast_ray(
        &self,
        origin: Vec2,
        direction: Dir2,
        max_distance: f32,
        _exclude_self: bool,
    ) -> Result<Option<RayHit>, PhysicsError> {
        if self.fail_rays {
            return Err(PhysicsError::QueryFailed("injected ray fault".to_string()));
        }
        let hit = self
            .solids
            .iter()
            .filter_map(|solid| solid.ray_hit(origin, *direction, max_distance))
            .min_by(|a, b| a.distance.total_cmp(&b.distance));
        Ok(hit)
    }
}
