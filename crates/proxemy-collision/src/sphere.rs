//! Sphere body.

use glam::DVec3;

use crate::aabb::Aabb;
use crate::oriented_box::OrientedBox;

/// A sphere with a mirrored bounding box for rejection tests.
#[derive(Debug, Clone)]
pub struct Sphere {
    position: DVec3,
    radius: f64,
    bounds: Aabb,
    dirty: bool,
}

impl Sphere {
    pub fn new(position: DVec3, radius: f64) -> Self {
        Self {
            position,
            radius,
            bounds: Aabb::default(),
            dirty: true,
        }
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_position(&mut self, position: DVec3) {
        self.position = position;
        self.dirty = true;
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
        self.dirty = true;
    }

    pub fn ensure_not_dirty(&mut self) {
        if self.dirty {
            self.bounds = Aabb::from_center_radius(self.position, self.radius);
            self.dirty = false;
        }
    }

    pub fn bounding_box(&mut self) -> Aabb {
        self.ensure_not_dirty();
        self.bounds
    }

    pub(crate) fn current_bounds(&self) -> Aabb {
        if self.dirty {
            Aabb::from_center_radius(self.position, self.radius)
        } else {
            self.bounds
        }
    }

    pub fn intersects(&self, other: &Sphere) -> bool {
        self.position.distance(other.position) <= self.radius + other.radius
    }

    /// Clamp the centre into the box's local frame, then compare the clamped
    /// point's distance against the radius.
    pub fn intersects_box(&self, other: &OrientedBox) -> bool {
        if !self.current_bounds().intersects(&other.current_bounds()) {
            return false;
        }
        let local = other.orientation().inverse() * (self.position - other.position());
        let half = other.half_extents();
        let clamped = local.clamp(-half, half);
        local.distance_squared(clamped) <= self.radius * self.radius
    }

    /// Distance along a unit ray to the sphere surface. Zero when the origin is inside.
    pub fn ray_distance(&self, origin: DVec3, direction: DVec3) -> Option<f64> {
        let offset = origin - self.position;
        let c = offset.length_squared() - self.radius * self.radius;
        if c <= 0.0 {
            return Some(0.0);
        }
        let b = offset.dot(direction);
        if b > 0.0 {
            return None;
        }
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        Some(-b - discriminant.sqrt())
    }
}
