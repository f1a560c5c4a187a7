//! Tuning profiles for escort vessels and their steering.
//!
//! Consolidates the parameters the vessel brain and the steering system
//! read, so tests and scenarios can tweak them without touching constants.

use glam::DVec2;

use proxemy_core::constants::*;
use proxemy_core::pattern::WeaponPattern;
use proxemy_core::Result;

/// Steering parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SteeringProfile {
    /// Follow intensity ramps from 0 at this distance...
    pub follow_min_distance: f64,
    /// ...to 1 at this one.
    pub follow_ref_distance: f64,
    /// Distance ahead of the target, along its forward, of the follow point.
    pub follow_lead: f64,
    pub follow_weight: f64,
    pub stay_visible_weight: f64,
    /// Repulsion band measured from the boss surface.
    pub boss_band: (f64, f64),
    /// Repulsion band between vessel centres.
    pub vessel_band: (f64, f64),
}

impl Default for SteeringProfile {
    fn default() -> Self {
        Self {
            follow_min_distance: FOLLOW_MIN_DISTANCE,
            follow_ref_distance: FOLLOW_REF_DISTANCE,
            follow_lead: FOLLOW_LEAD_DISTANCE,
            follow_weight: FOLLOW_WEIGHT,
            stay_visible_weight: STAY_VISIBLE_WEIGHT,
            boss_band: (AVOID_BOSS_MIN_DISTANCE, AVOID_BOSS_MAX_DISTANCE),
            vessel_band: (AVOID_VESSEL_MIN_DISTANCE, AVOID_VESSEL_MAX_DISTANCE),
        }
    }
}

/// Behaviour parameters of an escort vessel.
#[derive(Debug, Clone, PartialEq)]
pub struct VesselProfile {
    pub base_speed: f64,
    /// Speed multiplier while aiming.
    pub aim_speed_factor: f64,
    pub detection_period: f64,
    pub follow_change_period: f64,
    pub angular_tolerance: f64,
    /// Follow intensity under which a chasing vessel starts aiming.
    pub aim_threshold: f64,
    pub bullet_speed: f64,
    pub cannon_length: f64,
    pub follow_slots: Vec<DVec2>,
    pub steering: SteeringProfile,
}

impl Default for VesselProfile {
    fn default() -> Self {
        Self {
            base_speed: VESSEL_BASE_SPEED,
            aim_speed_factor: VESSEL_AIM_SPEED_FACTOR,
            detection_period: VESSEL_DETECTION_PERIOD,
            follow_change_period: VESSEL_FOLLOW_CHANGE_PERIOD,
            angular_tolerance: VESSEL_ANGULAR_TOLERANCE,
            aim_threshold: VESSEL_AIM_THRESHOLD,
            bullet_speed: VESSEL_BULLET_SPEED,
            cannon_length: VESSEL_CANNON_LENGTH,
            follow_slots: VESSEL_FOLLOW_SLOTS.iter().map(|s| DVec2::from(*s)).collect(),
            steering: SteeringProfile::default(),
        }
    }
}

/// Burst fired while aiming: three volleys of three bullets over a 2 s cycle.
pub fn vessel_pattern() -> Result<WeaponPattern> {
    let step = VESSEL_SHOOT_INTERVAL;
    WeaponPattern::new(10.0 * step)?
        .shot([0.0, 0.0], 0.0)?
        .shot([-5.0, 0.0], 0.0)?
        .shot([5.0, 0.0], 0.0)?
        .shot([0.0, 0.0], 2.0 * step)?
        .shot([0.0, 5.0], 2.0 * step)?
        .shot([0.0, -5.0], 2.0 * step)?
        .shot([0.0, 0.0], 4.0 * step)?
        .shot([5.0, 5.0], 4.0 * step)?
        .shot([-5.0, -5.0], 4.0 * step)
}
