//! Orientable cannon mounted on a ship, vessel or turret.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::spatial::Spatial;

/// A barrel attached to an owner at a fixed (right, up) offset of the owner's frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cannon {
    mount: DVec2,
    length: f64,
    position: DVec3,
    forward: DVec3,
    up: DVec3,
    right: DVec3,
}

impl Cannon {
    pub fn new(mount: [f64; 2], length: f64) -> Self {
        Self {
            mount: DVec2::from(mount),
            length,
            position: DVec3::ZERO,
            forward: DVec3::NEG_X,
            up: DVec3::Y,
            right: DVec3::Z,
        }
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn forward(&self) -> DVec3 {
        self.forward
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Place the cannon on its owner's frame.
    pub fn update_position(&mut self, owner: &Spatial) {
        self.position =
            owner.position() + owner.right() * self.mount.x + owner.up() * self.mount.y;
        self.up = owner.up();
    }

    /// Turn the barrel toward `target`. The barrel's right and up axes are
    /// rebuilt around the new forward, keeping up as close to the owner's as possible.
    pub fn look_at(&mut self, target: DVec3) {
        let Some(forward) = (target - self.position).try_normalize() else {
            return;
        };
        let right = self
            .up
            .cross(forward)
            .try_normalize()
            .unwrap_or_else(|| forward.any_orthonormal_vector());
        self.forward = forward;
        self.right = right;
        self.up = forward.cross(right);
    }

    /// Muzzle position.
    pub fn shoot_position(&self) -> DVec3 {
        self.position + self.forward * self.length
    }

    /// Muzzle position shifted by a pattern offset in the barrel's (right, up) frame.
    pub fn offset_shoot_position(&self, offset: DVec2) -> DVec3 {
        self.shoot_position() + self.right * offset.x + self.up * offset.y
    }
}

/// A bullet to spawn: muzzle position and world-space velocity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BulletLaunch {
    pub position: DVec3,
    pub velocity: DVec3,
}
