//! ECS components shared by every object kind.
//!
//! Components are plain data. Per-kind behaviour state (ship, vessel,
//! boss parts) lives with the systems that drive it.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::CollisionGroup;
use crate::interfaces::ModelId;

/// Collision filtering data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collider {
    /// Group this object belongs to.
    pub group: CollisionGroup,
    /// Group this object reacts to, if any.
    pub accepts: Option<CollisionGroup>,
}

impl Collider {
    pub fn new(group: CollisionGroup, accepts: Option<CollisionGroup>) -> Self {
        Self { group, accepts }
    }

    pub fn can_collide_with(&self, other: &Collider) -> bool {
        self.accepts == Some(other.group)
    }
}

/// Model attached to the render context while the object is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Renderable {
    pub model: ModelId,
    /// Set once a boss module has lost half its life; the renderer draws it as wireframe.
    pub damaged: bool,
}

impl Renderable {
    pub fn new(model: ModelId) -> Self {
        Self {
            model,
            damaged: false,
        }
    }
}

/// Straight-flying bullet state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// World-space velocity (units/s).
    pub velocity: DVec3,
    /// Seconds left before the bullet expires.
    pub remaining: f64,
    /// Damage dealt on impact.
    pub power: f64,
}

/// Normalized control signals written by the input collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipControls {
    /// -1..1
    pub vertical_speed: f64,
    /// -1..1
    pub horizontal_speed: f64,
    pub is_shooting: bool,
    /// World-space point the cannon aims at.
    pub aimed_point: DVec3,
}
