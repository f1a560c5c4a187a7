//! Simulation engine for Proxemy.
//!
//! Owns the hecs-backed world, dispatches collisions, updates every object
//! at a fixed tick rate and produces `GameStateSnapshot`s for the frontend.

pub mod detector;
pub mod engine;
pub mod objects;
pub mod systems;
pub mod world;
pub mod world_setup;

pub use proxemy_core as core;
pub use engine::SimulationEngine;
pub use world::{Spawn, World};
