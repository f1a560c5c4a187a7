//! Detector backed by collision bodies.
//!
//! Ray casts test every active body analytically. Visibility is a cone
//! test against a [`Viewpoint`] placed behind and above the player ship.

use glam::DVec3;
use hecs::Entity;
use serde::{Deserialize, Serialize};

use proxemy_core::constants::{CAMERA_FAR, CAMERA_HALF_FOV, CAMERA_OFFSET_BACK, CAMERA_OFFSET_UP};
use proxemy_core::interfaces::{Detector, Intersection, ObjectId};
use proxemy_core::spatial::Spatial;

/// Camera used for visibility queries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewpoint {
    pub position: DVec3,
    /// Unit view direction.
    pub direction: DVec3,
    pub half_fov: f64,
    pub far: f64,
}

impl Default for Viewpoint {
    fn default() -> Self {
        Self::looking_at(DVec3::new(150.0 + CAMERA_OFFSET_BACK, CAMERA_OFFSET_UP, 0.0), DVec3::ZERO)
    }
}

impl Viewpoint {
    pub fn looking_at(position: DVec3, target: DVec3) -> Self {
        Self {
            position,
            direction: (target - position).try_normalize().unwrap_or(DVec3::NEG_X),
            half_fov: CAMERA_HALF_FOV,
            far: CAMERA_FAR,
        }
    }

    /// Chase camera: behind the ship (outward from the sphere) and above
    /// it, looking at the centre.
    pub fn behind(ship: &Spatial) -> Self {
        let position = ship.position() - ship.forward() * CAMERA_OFFSET_BACK + ship.up() * CAMERA_OFFSET_UP;
        Self::looking_at(position, DVec3::ZERO)
    }

    pub fn sees(&self, point: DVec3) -> bool {
        let offset = point - self.position;
        let distance = offset.length();
        if distance > self.far {
            return false;
        }
        if distance <= f64::EPSILON {
            return true;
        }
        offset.dot(self.direction) / distance >= self.half_fov.cos()
    }
}

pub fn object_id(entity: Entity) -> ObjectId {
    ObjectId(entity.to_bits().get())
}

pub fn entity_of(id: ObjectId) -> Option<Entity> {
    Entity::from_bits(id.0)
}

/// Read-only detector over the active objects of a world.
pub struct BodyDetector<'w> {
    ecs: &'w hecs::World,
    active: &'w [Entity],
    viewpoint: Viewpoint,
}

impl<'w> BodyDetector<'w> {
    pub fn new(ecs: &'w hecs::World, active: &'w [Entity], viewpoint: Viewpoint) -> Self {
        Self {
            ecs,
            active,
            viewpoint,
        }
    }

    fn position(&self, object: ObjectId) -> Option<DVec3> {
        let entity = entity_of(object)?;
        let spatial = self.ecs.get::<&Spatial>(entity).ok()?;
        Some(spatial.position())
    }

    fn hit(&self, entity: Entity, origin: DVec3, direction: DVec3) -> Option<Intersection> {
        let spatial = self.ecs.get::<&Spatial>(entity).ok()?;
        let distance = spatial.body()?.ray_distance(origin, direction)?;
        Some(Intersection {
            object: object_id(entity),
            distance,
            point: origin + direction * distance,
        })
    }
}

impl Detector for BodyDetector<'_> {
    fn is_visible(&self, object: ObjectId) -> bool {
        self.position(object)
            .is_some_and(|position| self.viewpoint.sees(position))
    }

    fn is_occluded(&self, object: ObjectId) -> bool {
        let Some(position) = self.position(object) else {
            return false;
        };
        let to_camera = self.viewpoint.position - position;
        let Some(direction) = to_camera.try_normalize() else {
            return false;
        };
        let range = to_camera.length();
        self.raycast(position, direction)
            .iter()
            .any(|hit| hit.object != object && hit.distance < range)
    }

    fn raycast(&self, origin: DVec3, direction: DVec3) -> Vec<Intersection> {
        let mut hits: Vec<Intersection> = self
            .active
            .iter()
            .filter_map(|&entity| self.hit(entity, origin, direction))
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn raycast_to_object(&self, origin: DVec3, direction: DVec3, object: ObjectId) -> Vec<Intersection> {
        entity_of(object)
            .filter(|entity| self.active.contains(entity))
            .and_then(|entity| self.hit(entity, origin, direction))
            .into_iter()
            .collect()
    }
}
