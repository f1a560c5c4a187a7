//! AI for Proxemy escort vessels.
//!
//! Steering behaviours turn the surroundings of a vessel into a desired
//! velocity and an avoidance velocity; the vessel brain runs the
//! Detect / Spherical / Chase / Aim cycle on top of them. No ECS
//! dependency: everything operates on plain data handed in by the
//! simulation.

pub mod profiles;
pub mod steering;
pub mod vessel;

#[cfg(test)]
mod tests;
