//! Axis-aligned bounding boxes used for cheap rejection.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// World-aligned bounds of a body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            min: DVec3::ZERO,
            max: DVec3::ZERO,
        }
    }
}

impl Aabb {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Smallest box enclosing every point. Empty input yields a degenerate box at the origin.
    pub fn from_points(points: &[DVec3]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };
        let (min, max) = points
            .iter()
            .skip(1)
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Self { min, max }
    }

    pub fn from_center_radius(center: DVec3, radius: f64) -> Self {
        let extent = DVec3::splat(radius);
        Self {
            min: center - extent,
            max: center + extent,
        }
    }

    /// Touching boxes count as intersecting.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    pub fn contains_point(&self, point: DVec3) -> bool {
        self.min.cmple(point).all() && self.max.cmpge(point).all()
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }
}
