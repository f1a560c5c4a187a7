//! Scenario configuration.
//!
//! Every section defaults to the shipped scenario, so a config file only
//! needs the fields it overrides.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, PI, TAU};
use std::path::Path;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::*;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// RNG seed for determinism. Same seed = same game.
    pub seed: u64,
    /// Fixed-step frequency (Hz).
    pub tick_rate: u32,
    pub ship: ShipConfig,
    pub vessels: VesselConfig,
    pub boss: BossConfig,
    pub models: ModelNames,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_rate: TICK_RATE,
            ship: ShipConfig::default(),
            vessels: VesselConfig::default(),
            boss: BossConfig::default(),
            models: ModelNames::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Seconds per fixed step. A zero tick rate falls back to the default.
    pub fn dt(&self) -> f64 {
        if self.tick_rate == 0 {
            warn!("tick_rate of 0 is invalid, using {TICK_RATE} Hz");
            return DT;
        }
        1.0 / f64::from(self.tick_rate)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    pub max_life: f64,
    pub start_position: DVec3,
    /// Inward normal at the start position.
    pub start_forward: DVec3,
    pub angular_speed: f64,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            max_life: 10.0,
            start_position: DVec3::new(150.0, 0.0, 0.0),
            start_forward: DVec3::new(-1.0, 0.0, 0.0),
            angular_speed: SHIP_ANGULAR_SPEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VesselConfig {
    pub life: f64,
    /// One vessel is spawned per entry.
    pub spawn_positions: Vec<DVec3>,
}

impl Default for VesselConfig {
    fn default() -> Self {
        Self {
            life: 30.0,
            spawn_positions: vec![
                DVec3::new(-50.0, 30.0, 0.0),
                DVec3::new(-30.0, 50.0, 0.0),
                DVec3::new(-30.0, 50.0, 15.0),
                DVec3::new(-30.0, 50.0, -15.0),
            ],
        }
    }
}

/// Angular rectangle of a boss module (theta and phi ranges in radians).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModuleConfig {
    pub theta_range: [f64; 2],
    pub phi_range: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    pub radius: f64,
    pub module_life: f64,
    pub weapons_per_module: usize,
    pub modules: Vec<ModuleConfig>,
}

impl Default for BossConfig {
    fn default() -> Self {
        let module = |theta_range, phi_range| ModuleConfig {
            theta_range,
            phi_range,
        };
        Self {
            radius: BOSS_RADIUS,
            module_life: MODULE_LIFE,
            weapons_per_module: MODULE_WEAPON_COUNT,
            modules: vec![
                module([0.0, FRAC_PI_3], [0.0, TAU]),
                module([FRAC_PI_3, FRAC_PI_2], [0.0, 3.0 * PI / 4.0]),
                module([FRAC_PI_3, FRAC_PI_2], [3.0 * PI / 4.0, TAU]),
                module([FRAC_PI_2, 2.0 * FRAC_PI_3], [0.0, 2.0 * FRAC_PI_3]),
                module([FRAC_PI_2, 2.0 * FRAC_PI_3], [2.0 * FRAC_PI_3, 4.0 * FRAC_PI_3]),
                module([FRAC_PI_2, 2.0 * FRAC_PI_3], [4.0 * FRAC_PI_3, TAU]),
                module([2.0 * FRAC_PI_3, PI], [0.0, PI]),
                module([2.0 * FRAC_PI_3, PI], [PI, TAU]),
            ],
        }
    }
}

/// Model names handed to the catalog, one per renderable object kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelNames {
    pub ship: String,
    pub vessel: String,
    pub boss: String,
    pub module: String,
    pub gatling: String,
    pub bullet: String,
}

impl Default for ModelNames {
    fn default() -> Self {
        Self {
            ship: "ship".into(),
            vessel: "miniship".into(),
            boss: "boss".into(),
            module: "module".into(),
            gatling: "gatling".into(),
            bullet: "bullet".into(),
        }
    }
}

impl ModelNames {
    pub fn all(&self) -> [&str; 6] {
        [
            &self.ship,
            &self.vessel,
            &self.boss,
            &self.module,
            &self.gatling,
            &self.bullet,
        ]
    }
}
