//! Steering behaviours.
//!
//! Each behaviour is a named function computing one velocity component
//! from the vessel's surroundings. Behaviours belong to one of two groups:
//! the `Behaviour` group feeds the desired velocity, the `Avoidance` group
//! feeds a separate avoidance velocity. Each group is summed with its
//! weights and clamped to a magnitude of at most 1; shorter sums are kept
//! as is so a vessel slows down near its goal.

use std::fmt;

use glam::{DVec2, DVec3};

use crate::profiles::SteeringProfile;

/// Frame of the object being followed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetFrame {
    pub position: DVec3,
    pub forward: DVec3,
    pub up: DVec3,
    pub right: DVec3,
}

/// Obstacle sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub center: DVec3,
    pub radius: f64,
}

/// What a vessel knows about its surroundings this tick.
#[derive(Debug, Clone, Copy)]
pub struct SteeringContext<'a> {
    pub position: DVec3,
    pub target: TargetFrame,
    pub boss: Option<Obstacle>,
    /// Positions of the other vessels.
    pub neighbours: &'a [DVec3],
    /// Whether the vessel is currently in the player's view.
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorGroup {
    Behaviour,
    Avoidance,
}

/// Mutable steering state behaviours may read and write.
#[derive(Debug, Clone)]
pub struct SteeringState {
    /// Lateral (x) and vertical (y) offset of the follow point in the target frame.
    pub follow_offset: DVec2,
    /// Last follow intensity, 0 when at the follow point and 1 when far away.
    pub follow_intensity: f64,
    pub profile: SteeringProfile,
}

pub type BehaviorFn = fn(&mut SteeringState, &SteeringContext<'_>) -> DVec3;

#[derive(Clone)]
struct Behavior {
    name: &'static str,
    group: BehaviorGroup,
    weight: f64,
    vector: DVec3,
    update: BehaviorFn,
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behavior")
            .field("name", &self.name)
            .field("group", &self.group)
            .field("weight", &self.weight)
            .field("vector", &self.vector)
            .finish()
    }
}

/// Named behaviours and the two aggregate velocities.
#[derive(Debug, Clone)]
pub struct Steerings {
    behaviors: Vec<Behavior>,
    state: SteeringState,
}

impl Steerings {
    /// An empty behaviour set.
    pub fn new(profile: SteeringProfile) -> Self {
        Self {
            behaviors: Vec::new(),
            state: SteeringState {
                follow_offset: DVec2::ZERO,
                follow_intensity: 1.0,
                profile,
            },
        }
    }

    /// Follow and stay-visible behaviours plus boss and vessel avoidance.
    pub fn escort(profile: SteeringProfile) -> Self {
        let follow_weight = profile.follow_weight;
        let visible_weight = profile.stay_visible_weight;
        let mut steerings = Self::new(profile);
        steerings
            .add_behavior("follow", BehaviorGroup::Behaviour, follow_weight, follow)
            .add_behavior("stay_visible", BehaviorGroup::Behaviour, visible_weight, stay_visible)
            .add_behavior("avoid_boss", BehaviorGroup::Avoidance, 1.0, avoid_boss)
            .add_behavior("avoid_vessels", BehaviorGroup::Avoidance, 1.0, avoid_vessels);
        steerings
    }

    /// Register a behaviour, replacing any behaviour of the same name.
    pub fn add_behavior(
        &mut self,
        name: &'static str,
        group: BehaviorGroup,
        weight: f64,
        update: BehaviorFn,
    ) -> &mut Self {
        self.behaviors.retain(|b| b.name != name);
        self.behaviors.push(Behavior {
            name,
            group,
            weight,
            vector: DVec3::ZERO,
            update,
        });
        self
    }

    pub fn remove_behavior(&mut self, name: &str) -> bool {
        let before = self.behaviors.len();
        self.behaviors.retain(|b| b.name != name);
        self.behaviors.len() != before
    }

    /// Last unweighted output of a behaviour.
    pub fn behavior_vector(&self, name: &str) -> Option<DVec3> {
        self.behaviors
            .iter()
            .find(|b| b.name == name)
            .map(|b| b.vector)
    }

    pub fn follow_offset(&self) -> DVec2 {
        self.state.follow_offset
    }

    pub fn set_follow_offset(&mut self, offset: DVec2) {
        self.state.follow_offset = offset;
    }

    pub fn follow_intensity(&self) -> f64 {
        self.state.follow_intensity
    }

    pub fn compute_desired_velocity(&mut self, ctx: &SteeringContext<'_>) -> DVec3 {
        self.compute(BehaviorGroup::Behaviour, ctx)
    }

    pub fn compute_avoidance(&mut self, ctx: &SteeringContext<'_>) -> DVec3 {
        self.compute(BehaviorGroup::Avoidance, ctx)
    }

    fn compute(&mut self, group: BehaviorGroup, ctx: &SteeringContext<'_>) -> DVec3 {
        let mut total = DVec3::ZERO;
        for behavior in self.behaviors.iter_mut().filter(|b| b.group == group) {
            behavior.vector = (behavior.update)(&mut self.state, ctx);
            total += behavior.vector * behavior.weight;
        }
        total.clamp_length_max(1.0)
    }
}

/// 0 at `min`, 1 at `max`, linear in between.
fn ramp(distance: f64, min: f64, max: f64) -> f64 {
    if distance <= min {
        0.0
    } else if distance >= max {
        1.0
    } else {
        (distance - min) / (max - min)
    }
}

/// 1 below `min`, 0 beyond `max`, linear in between.
fn repulsion(distance: f64, (min, max): (f64, f64)) -> f64 {
    1.0 - ramp(distance, min, max)
}

/// Head for a point offset from the target in its own frame, placed ahead
/// of it along its forward axis. Records the follow intensity.
pub fn follow(state: &mut SteeringState, ctx: &SteeringContext<'_>) -> DVec3 {
    let target = &ctx.target;
    let goal = target.position
        + target.right * state.follow_offset.x
        + target.up * state.follow_offset.y
        + target.forward * state.profile.follow_lead;
    let to_goal = goal - ctx.position;
    let intensity = ramp(
        to_goal.length(),
        state.profile.follow_min_distance,
        state.profile.follow_ref_distance,
    );
    state.follow_intensity = intensity;
    to_goal.normalize_or_zero() * intensity
}

/// Pull toward the target while out of the player's view.
pub fn stay_visible(_state: &mut SteeringState, ctx: &SteeringContext<'_>) -> DVec3 {
    if ctx.visible {
        DVec3::ZERO
    } else {
        (ctx.target.position - ctx.position).normalize_or_zero()
    }
}

/// Push away from the boss surface.
pub fn avoid_boss(state: &mut SteeringState, ctx: &SteeringContext<'_>) -> DVec3 {
    let Some(boss) = ctx.boss else {
        return DVec3::ZERO;
    };
    let away = ctx.position - boss.center;
    let distance = away.length() - boss.radius;
    away.normalize_or_zero() * repulsion(distance, state.profile.boss_band)
}

/// Push away from every neighbour. The direction is the sum of weighted
/// repulsions; the magnitude is the strongest single repulsion. A
/// neighbour sitting exactly on the vessel pushes along the target's right.
pub fn avoid_vessels(state: &mut SteeringState, ctx: &SteeringContext<'_>) -> DVec3 {
    let sideways = ctx.target.right.try_normalize().unwrap_or(DVec3::X);
    let mut sum = DVec3::ZERO;
    let mut strongest = 0.0_f64;
    for neighbour in ctx.neighbours {
        let away = ctx.position - *neighbour;
        let intensity = repulsion(away.length(), state.profile.vessel_band);
        if intensity <= 0.0 {
            continue;
        }
        sum += away.try_normalize().unwrap_or(sideways) * intensity;
        strongest = strongest.max(intensity);
    }
    sum.try_normalize().unwrap_or(sideways) * strongest
}
