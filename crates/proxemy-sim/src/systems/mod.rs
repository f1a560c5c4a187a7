//! Per-kind update functions and the snapshot builder.
//!
//! Update systems take `&mut World` and the entity to advance. They do not
//! own state; everything they touch lives in components.

pub mod boss;
pub mod projectile;
pub mod ship;
pub mod snapshot;
pub mod vessel;
