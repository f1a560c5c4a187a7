//! Escort vessel brain.
//!
//! A vessel cycles through four states:
//! - `Detect`: cast a ray toward the target. If the boss is hit before the
//!   target, plan a detour across the sphere (`Spherical`), otherwise `Chase`.
//! - `Spherical`: slide over the sphere at the planned angular velocity,
//!   facing the centre, until within tolerance of the target's spherical
//!   position; then `Chase`.
//! - `Chase`: fly the steering velocity and face it; once close to the
//!   follow point, `Aim`.
//! - `Aim`: keep following, mirror the target's frame, hop between follow
//!   slots every few seconds and fire the burst pattern.
//!
//! Detection reruns on a fixed timer from every state except `Spherical`.
//! The avoidance velocity is applied on every tick whatever the state.

use glam::{DVec2, DVec3};
use rand::Rng;
use tracing::debug;

use proxemy_core::cannon::{BulletLaunch, Cannon};
use proxemy_core::enums::VesselState;
use proxemy_core::fsm::StateMachine;
use proxemy_core::interfaces::{Detector, ObjectId};
use proxemy_core::pattern::WeaponPattern;
use proxemy_core::spatial::Spatial;
use proxemy_core::types::{gl_to_spherical, spherical_to_gl, SphericalVector};
use proxemy_core::Result;

use crate::profiles::{vessel_pattern, VesselProfile};
use crate::steering::{Obstacle, SteeringContext, Steerings, TargetFrame};

/// State the vessel machine's callbacks act on.
#[derive(Debug, Clone)]
pub struct VesselMind {
    pub speed: f64,
    pub profile: VesselProfile,
}

/// Everything the brain needs to know about the world for one tick.
pub struct VesselSenses<'a> {
    pub id: ObjectId,
    pub target: TargetFrame,
    pub boss: Option<(ObjectId, Obstacle)>,
    pub neighbours: &'a [DVec3],
    pub detector: &'a dyn Detector,
}

#[derive(Debug)]
pub struct VesselBrain {
    fsm: StateMachine<VesselState, VesselMind>,
    mind: VesselMind,
    steerings: Steerings,
    cannon: Cannon,
    pattern: WeaponPattern,
    spherical_velocity: DVec2,
    spherical_target: SphericalVector,
    detection_timer: f64,
    change_timer: f64,
}

impl VesselBrain {
    pub fn new(profile: VesselProfile) -> Result<Self> {
        let mut fsm = StateMachine::new();
        fsm.add_state(VesselState::Detect);
        fsm.add_state(VesselState::Spherical);
        fsm.add_state(VesselState::Chase)
            .add_callback(|mind: &mut VesselMind| mind.speed = mind.profile.base_speed);
        fsm.add_state(VesselState::Aim).add_callback(|mind: &mut VesselMind| {
            mind.speed = mind.profile.base_speed * mind.profile.aim_speed_factor
        });

        let mut mind = VesselMind {
            speed: profile.base_speed,
            profile: profile.clone(),
        };
        fsm.set_state(VesselState::Detect, &mut mind);

        Ok(Self {
            fsm,
            mind,
            steerings: Steerings::escort(profile.steering.clone()),
            cannon: Cannon::new([0.0, 0.0], profile.cannon_length),
            pattern: vessel_pattern()?,
            spherical_velocity: DVec2::ZERO,
            spherical_target: SphericalVector::default(),
            detection_timer: 0.0,
            change_timer: 0.0,
        })
    }

    pub fn state(&self) -> Option<VesselState> {
        self.fsm.current()
    }

    pub fn speed(&self) -> f64 {
        self.mind.speed
    }

    pub fn steerings(&self) -> &Steerings {
        &self.steerings
    }

    pub fn steerings_mut(&mut self) -> &mut Steerings {
        &mut self.steerings
    }

    pub fn spherical_velocity(&self) -> DVec2 {
        self.spherical_velocity
    }

    pub fn cannon(&self) -> &Cannon {
        &self.cannon
    }

    fn enter(&mut self, state: VesselState) {
        if !self.fsm.is_in(state) {
            debug!(from = ?self.fsm.current(), to = ?state, "vessel state change");
        }
        self.fsm.set_state(state, &mut self.mind);
    }

    /// Advance one tick. Bullets to spawn are appended to `launches`.
    pub fn update(
        &mut self,
        spatial: &mut Spatial,
        senses: &VesselSenses<'_>,
        rng: &mut impl Rng,
        dt: f64,
        launches: &mut Vec<BulletLaunch>,
    ) {
        self.detection_timer += dt;
        let state = self.fsm.current();

        if state == Some(VesselState::Detect)
            || self.detection_timer >= self.mind.profile.detection_period
        {
            if state != Some(VesselState::Spherical) {
                self.perform_detection(spatial, senses);
            }
            self.detection_timer = 0.0;
        } else if state == Some(VesselState::Spherical) {
            self.slide_on_sphere(spatial, dt);
            if self.has_reached_spherical_target(spatial) {
                self.enter(VesselState::Chase);
            }
        } else {
            let ctx = steering_context(spatial, senses);
            let velocity = self.steerings.compute_desired_velocity(&ctx);
            spatial.translate(velocity * dt * self.mind.speed);

            if self.fsm.is_in(VesselState::Chase) {
                self.chase(spatial, senses, velocity);
            }
            if self.fsm.is_in(VesselState::Aim) {
                self.aim(spatial, senses, rng, dt, launches);
            }
        }

        let ctx = steering_context(spatial, senses);
        let avoidance = self.steerings.compute_avoidance(&ctx);
        spatial.translate(avoidance * dt * self.mind.speed);
    }

    /// Ray toward the target, tested against the boss only.
    fn perform_detection(&mut self, spatial: &Spatial, senses: &VesselSenses<'_>) {
        let position = spatial.position();
        let to_target = senses.target.position - position;
        if let (Some(direction), Some((boss_id, _))) = (to_target.try_normalize(), senses.boss) {
            let hits = senses.detector.raycast_to_object(position, direction, boss_id);
            if let Some(hit) = hits.first() {
                if hit.distance < to_target.length() {
                    self.compute_spherical_velocity(position, senses.target.position);
                    self.enter(VesselState::Spherical);
                    return;
                }
            }
        }
        self.enter(VesselState::Chase);
    }

    /// Unit (theta, phi) rate pointing from our spherical position to the target's.
    fn compute_spherical_velocity(&mut self, position: DVec3, target: DVec3) {
        let current = gl_to_spherical(position);
        self.spherical_target = gl_to_spherical(target);
        let d_theta = self.spherical_target.theta() - current.theta();
        let d_phi = self.spherical_target.phi() - current.phi();
        self.spherical_velocity = DVec2::new(d_theta, d_phi).normalize_or_zero();
    }

    fn has_reached_spherical_target(&self, spatial: &Spatial) -> bool {
        let current = gl_to_spherical(spatial.position());
        let tolerance = self.mind.profile.angular_tolerance;
        (current.theta() - self.spherical_target.theta()).abs() < tolerance
            && (current.phi() - self.spherical_target.phi()).abs() < tolerance
    }

    /// Move across the sphere at constant radius, facing the centre.
    fn slide_on_sphere(&mut self, spatial: &mut Spatial, dt: f64) {
        let mut spherical = gl_to_spherical(spatial.position());
        spherical
            .add_theta(self.spherical_velocity.x * dt)
            .add_phi(self.spherical_velocity.y * dt);
        let position = spherical_to_gl(&spherical);
        spatial.set_position(position);
        if let Some(inward) = (-position).try_normalize() {
            spatial.set_forward(inward);
        }
        spatial.look_at(DVec3::ZERO);
    }

    fn chase(&mut self, spatial: &mut Spatial, senses: &VesselSenses<'_>, velocity: DVec3) {
        spatial.look_at(spatial.position() + velocity);

        // Keep our up on the same side as the target's, seen in the plane
        // normal to the target's position.
        if let Some(normal) = senses.target.position.try_normalize() {
            let up = spatial.up();
            let projected = up - normal * up.dot(normal);
            if projected.dot(senses.target.up) < 0.0 {
                spatial.set_up(-up);
            }
        }

        if self.steerings.follow_intensity() < self.mind.profile.aim_threshold {
            self.enter(VesselState::Aim);
        }
    }

    fn aim(
        &mut self,
        spatial: &mut Spatial,
        senses: &VesselSenses<'_>,
        rng: &mut impl Rng,
        dt: f64,
        launches: &mut Vec<BulletLaunch>,
    ) {
        self.change_timer += dt;
        if self.change_timer > self.mind.profile.follow_change_period {
            self.change_timer = 0.0;
            let slots = &self.mind.profile.follow_slots;
            if !slots.is_empty() {
                let slot = slots[rng.gen_range(0..slots.len())];
                self.steerings.set_follow_offset(slot);
            }
        }

        let target = senses.target.position;
        spatial.set_up(senses.target.up);
        spatial.set_right(-senses.target.right);
        spatial.look_at(target);
        self.cannon.update_position(spatial);
        self.cannon.look_at(target);

        let velocity = self.cannon.forward() * self.mind.profile.bullet_speed;
        for offset in self.pattern.update(dt) {
            launches.push(BulletLaunch {
                position: self.cannon.offset_shoot_position(*offset),
                velocity,
            });
        }
    }
}

fn steering_context<'a>(spatial: &Spatial, senses: &VesselSenses<'a>) -> SteeringContext<'a> {
    SteeringContext {
        position: spatial.position(),
        target: senses.target,
        boss: senses.boss.map(|(_, obstacle)| obstacle),
        neighbours: senses.neighbours,
        visible: senses.detector.is_visible(senses.id),
    }
}
