//! Player commands sent from the input layer to the simulation.
//!
//! Commands are queued and applied at the next tick boundary.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Ship control ---
    /// Normalized direction input; screen-space `dy` grows downward.
    SetDirection { dx: f64, dy: f64 },
    FireStart,
    FireEnd,
    /// World-space aim point for the ship cannon.
    AimAt { point: DVec3 },

    // --- Game flow ---
    StartGame,
    /// Clear the world and set the scene up again.
    RestartGame,
    Pause,
    Resume,
}
