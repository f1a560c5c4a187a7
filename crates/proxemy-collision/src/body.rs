//! Tagged collision body and the shape-pair intersection table.

use glam::{DQuat, DVec3};

use crate::aabb::Aabb;
use crate::oriented_box::OrientedBox;
use crate::sphere::Sphere;

/// Shape tag of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShapeKind {
    Box,
    Sphere,
}

/// A collision body owned by exactly one entity.
#[derive(Debug, Clone)]
pub enum CollisionBody {
    Box(OrientedBox),
    Sphere(Sphere),
}

impl CollisionBody {
    pub fn cuboid(position: DVec3, size: DVec3, orientation: DQuat) -> Self {
        Self::Box(OrientedBox::new(position, size, orientation))
    }

    pub fn sphere(position: DVec3, radius: f64) -> Self {
        Self::Sphere(Sphere::new(position, radius))
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Box(_) => ShapeKind::Box,
            Self::Sphere(_) => ShapeKind::Sphere,
        }
    }

    pub fn position(&self) -> DVec3 {
        match self {
            Self::Box(b) => b.position(),
            Self::Sphere(s) => s.position(),
        }
    }

    pub fn set_position(&mut self, position: DVec3) {
        match self {
            Self::Box(b) => b.set_position(position),
            Self::Sphere(s) => s.set_position(position),
        }
    }

    /// Spheres are rotation invariant, so only boxes record the orientation.
    pub fn set_orientation(&mut self, orientation: DQuat) {
        if let Self::Box(b) = self {
            b.set_orientation(orientation);
        }
    }

    pub fn is_dirty(&self) -> bool {
        match self {
            Self::Box(b) => b.is_dirty(),
            Self::Sphere(s) => s.is_dirty(),
        }
    }

    pub fn ensure_not_dirty(&mut self) {
        match self {
            Self::Box(b) => b.ensure_not_dirty(),
            Self::Sphere(s) => s.ensure_not_dirty(),
        }
    }

    pub fn bounding_box(&mut self) -> Aabb {
        match self {
            Self::Box(b) => b.bounding_box(),
            Self::Sphere(s) => s.bounding_box(),
        }
    }

    /// Narrow-phase test. The pair is resolved to one of three cases:
    /// box/box, sphere/sphere, and sphere/box in either order.
    pub fn intersects(&self, other: &CollisionBody) -> bool {
        match (self, other) {
            (Self::Box(a), Self::Box(b)) => a.intersects(b),
            (Self::Sphere(a), Self::Sphere(b)) => a.intersects(b),
            (Self::Sphere(s), Self::Box(b)) | (Self::Box(b), Self::Sphere(s)) => {
                s.intersects_box(b)
            }
        }
    }

    /// Refresh both bodies, then test them.
    pub fn collides_with(&mut self, other: &mut CollisionBody) -> bool {
        self.ensure_not_dirty();
        other.ensure_not_dirty();
        self.intersects(other)
    }

    /// Distance along a unit ray to the body, if it is hit.
    pub fn ray_distance(&self, origin: DVec3, direction: DVec3) -> Option<f64> {
        match self {
            Self::Box(b) => b.ray_distance(origin, direction),
            Self::Sphere(s) => s.ray_distance(origin, direction),
        }
    }
}
