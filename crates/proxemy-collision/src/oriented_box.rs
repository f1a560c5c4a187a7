//! Oriented box body with a separating-axis intersection test.

use glam::{DQuat, DVec3};

use crate::aabb::Aabb;

/// Geometry derived from position, size and orientation.
#[derive(Debug, Clone, Copy, Default)]
struct Derived {
    corners: [DVec3; 8],
    /// Face normals of the box, i.e. the unit axes rotated by the orientation.
    edges: [DVec3; 3],
    bounds: Aabb,
}

impl Derived {
    fn compute(position: DVec3, size: DVec3, orientation: DQuat) -> Self {
        let half = size * 0.5;
        let mut corners = [DVec3::ZERO; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            let offset = DVec3::new(
                if i & 1 == 0 { -half.x } else { half.x },
                if i & 2 == 0 { -half.y } else { half.y },
                if i & 4 == 0 { -half.z } else { half.z },
            );
            *corner = position + orientation * offset;
        }
        let edges = [
            orientation * DVec3::X,
            orientation * DVec3::Y,
            orientation * DVec3::Z,
        ];
        Self {
            corners,
            edges,
            bounds: Aabb::from_points(&corners),
        }
    }
}

/// A box of arbitrary orientation.
///
/// Mutators only flag the derived geometry as dirty; corners, edges and the
/// bounding box are rebuilt by [`OrientedBox::ensure_not_dirty`] or on demand
/// by the read-only tests.
#[derive(Debug, Clone)]
pub struct OrientedBox {
    position: DVec3,
    size: DVec3,
    orientation: DQuat,
    derived: Derived,
    dirty: bool,
}

impl OrientedBox {
    pub fn new(position: DVec3, size: DVec3, orientation: DQuat) -> Self {
        Self {
            position,
            size,
            orientation,
            derived: Derived::default(),
            dirty: true,
        }
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn size(&self) -> DVec3 {
        self.size
    }

    pub fn orientation(&self) -> DQuat {
        self.orientation
    }

    pub fn half_extents(&self) -> DVec3 {
        self.size * 0.5
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_position(&mut self, position: DVec3) {
        self.position = position;
        self.dirty = true;
    }

    pub fn set_size(&mut self, size: DVec3) {
        self.size = size;
        self.dirty = true;
    }

    pub fn set_orientation(&mut self, orientation: DQuat) {
        self.orientation = orientation;
        self.dirty = true;
    }

    /// Rebuild the cached corners, edges and bounds if a mutation happened since the last rebuild.
    pub fn ensure_not_dirty(&mut self) {
        if self.dirty {
            self.derived = Derived::compute(self.position, self.size, self.orientation);
            self.dirty = false;
        }
    }

    pub fn corners(&mut self) -> &[DVec3; 8] {
        self.ensure_not_dirty();
        &self.derived.corners
    }

    pub fn edges(&mut self) -> &[DVec3; 3] {
        self.ensure_not_dirty();
        &self.derived.edges
    }

    pub fn bounding_box(&mut self) -> Aabb {
        self.ensure_not_dirty();
        self.derived.bounds
    }

    /// Cached geometry when clean, a fresh computation otherwise.
    fn derived(&self) -> Derived {
        if self.dirty {
            Derived::compute(self.position, self.size, self.orientation)
        } else {
            self.derived
        }
    }

    pub(crate) fn current_bounds(&self) -> Aabb {
        self.derived().bounds
    }

    /// Bounding-box rejection followed by a separating-axis test over the
    /// three face normals of each box.
    pub fn intersects(&self, other: &OrientedBox) -> bool {
        let this = self.derived();
        let that = other.derived();
        if !this.bounds.intersects(&that.bounds) {
            return false;
        }

        this.edges.iter().chain(that.edges.iter()).all(|axis| {
            let (this_min, this_max) = project(&this.corners, *axis);
            let (other_min, other_max) = project(&that.corners, *axis);
            !(this_min > other_max || this_max < other_min)
        })
    }

    /// Refresh both bodies, then test them.
    pub fn collides_with(&mut self, other: &mut OrientedBox) -> bool {
        self.ensure_not_dirty();
        other.ensure_not_dirty();
        self.intersects(other)
    }

    /// Distance along a unit ray to the box surface, using a slab test in box-local space.
    /// A ray starting inside the box hits at distance zero.
    pub fn ray_distance(&self, origin: DVec3, direction: DVec3) -> Option<f64> {
        let inverse = self.orientation.inverse();
        let local_origin = inverse * (origin - self.position);
        let local_direction = inverse * direction;
        let half = self.half_extents();

        let mut t_min = 0.0_f64;
        let mut t_max = f64::INFINITY;
        for axis in 0..3 {
            let o = local_origin[axis];
            let d = local_direction[axis];
            if d.abs() < 1e-12 {
                if o < -half[axis] || o > half[axis] {
                    return None;
                }
                continue;
            }
            let t1 = (-half[axis] - o) / d;
            let t2 = (half[axis] - o) / d;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}

/// Interval covered by a point set along an axis.
fn project(points: &[DVec3; 8], axis: DVec3) -> (f64, f64) {
    points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), p| {
        let d = p.dot(axis);
        (min.min(d), max.max(d))
    })
}
