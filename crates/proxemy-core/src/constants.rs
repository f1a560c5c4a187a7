//! Simulation constants and tuning parameters.

use std::f64::consts::PI;

/// Default simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick at the default rate.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Player ship ---

/// Collision box of the player ship (length, height, width).
pub const SHIP_BOX_SIZE: [f64; 3] = [32.0, 4.0, 8.0];
/// Angular speed on the sphere per unit of control input (rad/s).
pub const SHIP_ANGULAR_SPEED: f64 = 0.75;
/// Cannon mount on the ship frame (right, up).
pub const SHIP_CANNON_OFFSET: [f64; 2] = [0.0, 7.5];
pub const SHIP_PATTERN_PERIOD: f64 = 0.2;
pub const SHIP_BULLET_SPEED: f64 = 350.0;

// --- Cannon ---

/// Barrel length; shots leave from the muzzle.
pub const CANNON_LENGTH: f64 = 20.0;
pub const VESSEL_CANNON_LENGTH: f64 = 10.0;

// --- Projectiles ---

pub const BULLET_BOX_SIZE: [f64; 3] = [1.0, 1.0, 4.0];
/// Seconds before a bullet expires on its own.
pub const BULLET_LIFESPAN: f64 = 0.5;
pub const BULLET_POWER: f64 = 1.0;

// --- AI vessels ---

/// Seconds between two detection passes.
pub const VESSEL_DETECTION_PERIOD: f64 = 0.5;
/// Seconds between two follow-slot changes while aiming.
pub const VESSEL_FOLLOW_CHANGE_PERIOD: f64 = 3.0;
pub const VESSEL_ANGULAR_TOLERANCE: f64 = PI / 6.0;
pub const VESSEL_BASE_SPEED: f64 = 60.0;
/// Speed factor applied while aiming.
pub const VESSEL_AIM_SPEED_FACTOR: f64 = 2.0;
/// Below this follow intensity a chasing vessel starts aiming.
pub const VESSEL_AIM_THRESHOLD: f64 = 0.3;
pub const VESSEL_SHOOT_INTERVAL: f64 = 0.2;
pub const VESSEL_BULLET_SPEED: f64 = 200.0;
pub const VESSEL_BOX_SIZE: [f64; 3] = [10.0, 10.0, 10.0];
/// Lateral/vertical offsets a vessel may hold relative to its target.
pub const VESSEL_FOLLOW_SLOTS: [[f64; 2]; 6] = [
    [0.0, 0.0],
    [50.0, 0.0],
    [0.0, 50.0],
    [-50.0, 0.0],
    [-50.0, 50.0],
    [50.0, 50.0],
];

// --- Steering ---

/// Follow intensity is 0 below this distance to the follow point.
pub const FOLLOW_MIN_DISTANCE: f64 = 20.0;
/// Follow intensity reaches 1 at this distance.
pub const FOLLOW_REF_DISTANCE: f64 = 40.0;
/// Distance ahead of the target the follow point is placed.
pub const FOLLOW_LEAD_DISTANCE: f64 = 60.0;
pub const FOLLOW_WEIGHT: f64 = 1.0;
pub const STAY_VISIBLE_WEIGHT: f64 = 0.5;
/// Repulsion band measured from the boss surface.
pub const AVOID_BOSS_MIN_DISTANCE: f64 = 10.0;
pub const AVOID_BOSS_MAX_DISTANCE: f64 = 30.0;
/// Repulsion band between vessel centres.
pub const AVOID_VESSEL_MIN_DISTANCE: f64 = 5.0;
pub const AVOID_VESSEL_MAX_DISTANCE: f64 = 20.0;

// --- Boss ---

pub const BOSS_RADIUS: f64 = 40.0;
pub const MODULE_LIFE: f64 = 100.0;
pub const MODULE_WEAPON_COUNT: usize = 4;
/// Seconds before a destroyed turret is replaced.
pub const WEAPON_REVIVE_TIMEOUT: f64 = 20.0;
/// Score added per hit on the boss.
pub const BOSS_HIT_POINTS: u32 = 1;
/// Damage dealt to every surviving vessel when the boss dies.
pub const LETHAL_DAMAGE: f64 = 30_000.0;

// --- Gatling turret ---

pub const GATLING_RADIUS: f64 = 10.0;
pub const GATLING_LIFE: f64 = 20.0;
pub const GATLING_SHOOT_PERIOD: f64 = 0.1;
pub const GATLING_BULLET_SPEED: f64 = 350.0;
/// Maximum angular deviation of a gatling bullet (rad).
pub const GATLING_SPREAD: f64 = 0.1;
/// Seconds between fire-mode coin flips while idle.
pub const GATLING_IDLE_SWITCH_PERIOD: f64 = 1.5;
/// Seconds between fire-mode coin flips while shooting.
pub const GATLING_SHOOTING_SWITCH_PERIOD: f64 = 0.5;

// --- Camera ---

/// Viewpoint placement in the ship frame.
pub const CAMERA_OFFSET_UP: f64 = 40.0;
pub const CAMERA_OFFSET_BACK: f64 = 45.0;
/// Half of the vertical field of view (rad).
pub const CAMERA_HALF_FOV: f64 = PI / 4.0;
pub const CAMERA_FAR: f64 = 1000.0;
