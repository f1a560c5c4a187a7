//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Concrete object types the world can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Ship,
    Vessel,
    Boss,
    Module,
    Gatling,
    ShipBullet,
    GatlingBullet,
}

impl EntityKind {
    /// Kinds whose destroyed instances are recycled by the world.
    pub fn is_poolable(self) -> bool {
        matches!(self, EntityKind::ShipBullet | EntityKind::GatlingBullet)
    }
}

/// Collision filtering tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionGroup {
    #[serde(rename = "player")]
    Player,
    #[serde(rename = "player-shot")]
    PlayerShot,
    #[serde(rename = "boss")]
    Boss,
    #[serde(rename = "boss_shot")]
    BossShot,
}

/// Current game phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    MainMenu,
    Active,
    Paused,
    /// The boss was destroyed.
    Won,
    /// The player ship was destroyed.
    Lost,
}

/// Life thresholds of the player ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipState {
    Flying,
    Wrecked,
}

/// Life thresholds of a boss module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleState {
    FullLife,
    HalfBroken,
    Broken,
}

/// Behaviour cycle of an AI vessel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VesselState {
    Detect,
    Spherical,
    Chase,
    Aim,
}

/// Firing mode of a gatling turret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatlingMode {
    #[default]
    Idle,
    Shooting,
}
