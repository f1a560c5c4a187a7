//! Events emitted by the simulation for the HUD and effects collaborators.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::GamePhase;
use crate::interfaces::ObjectId;

/// One-shot visual effect requested from the effects collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectRequest {
    pub position: DVec3,
    pub min_radius: f64,
    pub max_radius: f64,
    /// 0xRRGGBB
    pub color: u32,
    pub opacity: f64,
    /// Seconds.
    pub lifespan: f64,
}

impl EffectRequest {
    /// Bullet impact.
    pub fn impact(position: DVec3) -> Self {
        Self {
            position,
            min_radius: 1.0,
            max_radius: 3.0,
            color: 0xffff00,
            opacity: 0.75,
            lifespan: 0.25,
        }
    }

    /// Player ship or escort vessel blowing up.
    pub fn wreck(position: DVec3) -> Self {
        Self {
            position,
            min_radius: 1.0,
            max_radius: 20.0,
            color: 0xffff00,
            opacity: 0.9,
            lifespan: 1.0,
        }
    }

    pub fn boss_death(position: DVec3) -> Self {
        Self {
            position,
            min_radius: 1.0,
            max_radius: 150.0,
            color: 0xff00ff,
            opacity: 1.0,
            lifespan: 2.0,
        }
    }
}

/// Simulation events, drained by the engine every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Player ship life changed.
    LifeChanged { life: f64 },
    /// Score gained.
    PointsAdded { points: u32 },
    Explosion { effect: EffectRequest },
    VesselDestroyed { id: ObjectId },
    ModuleDestroyed { id: ObjectId },
    WeaponDestroyed { id: ObjectId },
    BossDestroyed { id: ObjectId },
    ShipDestroyed { id: ObjectId },
    PhaseChanged { phase: GamePhase },
}
