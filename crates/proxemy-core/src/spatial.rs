//! Spatial frame shared by every world object.
//!
//! `Spatial` owns an entity's transform together with its optional
//! collision body. Every mutator forwards the new position or orientation
//! to the body, so the body never lags behind the entity.

use glam::{DMat3, DQuat, DVec3};

use proxemy_collision::CollisionBody;

use crate::types::{gl_to_spherical, SphericalVector};

#[derive(Debug, Clone)]
pub struct Spatial {
    position: DVec3,
    orientation: DQuat,
    /// Inward surface normal for objects moving on the sphere.
    forward: DVec3,
    up: DVec3,
    right: DVec3,
    body: Option<CollisionBody>,
}

impl Default for Spatial {
    fn default() -> Self {
        Self::new(DVec3::ZERO)
    }
}

impl Spatial {
    pub fn new(position: DVec3) -> Self {
        Self {
            position,
            orientation: DQuat::IDENTITY,
            forward: DVec3::NEG_X,
            up: DVec3::Y,
            right: DVec3::NEG_X.cross(DVec3::Y),
            body: None,
        }
    }

    /// Attach a body; it is moved onto the current transform.
    pub fn with_body(mut self, mut body: CollisionBody) -> Self {
        body.set_position(self.position);
        body.set_orientation(self.orientation);
        self.body = Some(body);
        self
    }

    pub fn with_forward(mut self, forward: DVec3) -> Self {
        self.set_forward(forward);
        self
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn orientation(&self) -> DQuat {
        self.orientation
    }

    pub fn forward(&self) -> DVec3 {
        self.forward
    }

    pub fn up(&self) -> DVec3 {
        self.up
    }

    pub fn right(&self) -> DVec3 {
        self.right
    }

    pub fn body(&self) -> Option<&CollisionBody> {
        self.body.as_ref()
    }

    /// Refresh the body's derived geometry.
    pub fn refresh_body(&mut self) -> Option<&CollisionBody> {
        if let Some(body) = &mut self.body {
            body.ensure_not_dirty();
        }
        self.body.as_ref()
    }

    pub fn set_position(&mut self, position: DVec3) {
        self.position = position;
        if let Some(body) = &mut self.body {
            body.set_position(position);
        }
    }

    pub fn translate(&mut self, delta: DVec3) {
        self.set_position(self.position + delta);
    }

    pub fn set_orientation(&mut self, orientation: DQuat) {
        self.orientation = orientation;
        if let Some(body) = &mut self.body {
            body.set_orientation(orientation);
        }
    }

    pub fn set_forward(&mut self, forward: DVec3) {
        self.forward = forward;
    }

    pub fn set_up(&mut self, up: DVec3) {
        self.up = up;
    }

    pub fn set_right(&mut self, right: DVec3) {
        self.right = right;
    }

    /// Point local +Z at `target`, using the current up vector as the roll hint.
    pub fn look_at(&mut self, target: DVec3) {
        if let Some(orientation) = look_rotation(target - self.position, self.up) {
            self.set_orientation(orientation);
        }
    }
}

/// Rotation whose +Z axis points along `direction`, with +Y as close to `up` as possible.
pub fn look_rotation(direction: DVec3, up: DVec3) -> Option<DQuat> {
    let z = direction.try_normalize()?;
    let x = up
        .cross(z)
        .try_normalize()
        .unwrap_or_else(|| z.any_orthonormal_vector());
    let y = z.cross(x);
    Some(DQuat::from_mat3(&DMat3::from_cols(x, y, z)))
}

/// Movement constrained to the surface of a sphere centred on the origin.
pub trait SphereMover {
    fn spatial(&self) -> &Spatial;
    fn spatial_mut(&mut self) -> &mut Spatial;

    /// Rotate the object across the sphere by `dtheta` around its up axis
    /// and `dphi` around its right axis, keeping its distance to the centre.
    ///
    /// The frame is rebuilt from the position first: forward becomes the
    /// inward normal and up is projected onto the tangent plane. The
    /// rotated frame then yields the new up, forward, right and position.
    fn move_on_sphere(&mut self, dtheta: f64, dphi: f64) {
        let spatial = self.spatial_mut();
        let radius = spatial.position.length();
        let Some(forward) = (-spatial.position).try_normalize() else {
            return;
        };
        let up = (spatial.up - forward * spatial.up.dot(forward))
            .try_normalize()
            .unwrap_or_else(|| forward.any_orthonormal_vector());
        let right = forward.cross(up);

        let basis = DMat3::from_cols(forward, up, right);
        let rotation = basis * DMat3::from_rotation_y(dtheta) * DMat3::from_rotation_z(dphi);

        let new_forward = rotation * DVec3::X;
        let new_up = rotation * DVec3::Y;
        spatial.forward = new_forward;
        spatial.up = new_up;
        spatial.right = new_forward.cross(new_up);
        spatial.set_position(-new_forward * radius);
    }

    fn spherical_position(&self) -> SphericalVector {
        gl_to_spherical(self.spatial().position)
    }
}

impl SphereMover for Spatial {
    fn spatial(&self) -> &Spatial {
        self
    }

    fn spatial_mut(&mut self) -> &mut Spatial {
        self
    }
}
