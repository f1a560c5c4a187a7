//! Narrow-phase collision bodies for Proxemy.
//!
//! Two shapes are supported: oriented boxes and spheres. Both cache their
//! derived geometry (corners, separating axes, bounding box) and only
//! recompute it on the first access after a mutation. No broad phase lives
//! here; the world runs a pairwise scan and calls into these tests.

pub mod aabb;
pub mod body;
pub mod oriented_box;
pub mod sphere;

pub use aabb::Aabb;
pub use body::{CollisionBody, ShapeKind};
pub use oriented_box::OrientedBox;
pub use sphere::Sphere;

#[cfg(test)]
mod tests;
