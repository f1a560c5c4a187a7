//! Game state snapshot, the read-only view handed to the frontend each tick.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::enums::{EntityKind, GamePhase};
use crate::events::GameEvent;
use crate::interfaces::{ModelId, ObjectId};
use crate::types::SimTime;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub score: u32,
    pub ship: Option<ShipView>,
    pub objects: Vec<ObjectView>,
    pub events: Vec<GameEvent>,
}

/// Player ship state for the HUD and camera.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipView {
    pub id: ObjectId,
    pub position: DVec3,
    pub forward: DVec3,
    pub up: DVec3,
    pub life: f64,
    pub max_life: f64,
    pub is_shooting: bool,
}

/// One active object with a renderable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectView {
    pub id: ObjectId,
    pub kind: EntityKind,
    pub model: Option<ModelId>,
    pub position: DVec3,
    pub orientation: DQuat,
    pub life: Option<f64>,
    pub damaged: bool,
}
