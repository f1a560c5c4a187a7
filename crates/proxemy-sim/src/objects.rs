//! Per-kind object state, stored as ECS components next to the shared
//! `Spatial`, `Collider` and `Renderable` components.
//!
//! Every damageable part owns a [`LifeContainer`] and an [`Outbox`]. Life
//! thresholds drive the part's state machine; the machine's callbacks only
//! write to the outbox, and the world applies the outbox (events, damaged
//! flag, self-destruction) once the hit has been processed.

use glam::DVec3;

use proxemy_ai::vessel::VesselBrain;
use proxemy_core::callbacks::CallbackCollection;
use proxemy_core::cannon::Cannon;
use proxemy_core::config::ModuleConfig;
use proxemy_core::constants::*;
use proxemy_core::enums::{GatlingMode, ModuleState, ShipState};
use proxemy_core::events::{EffectRequest, GameEvent};
use proxemy_core::fsm::StateMachine;
use proxemy_core::interfaces::ObjectId;
use proxemy_core::life::{Damageable, LifeContainer};
use proxemy_core::pattern::WeaponPattern;
use proxemy_core::types::{spherical_to_gl, SphericalVector};
use proxemy_core::Result;

/// Side effects requested by a part's callbacks.
#[derive(Debug, Default)]
pub struct Outbox {
    /// Where the part was when it was hit.
    pub position: DVec3,
    pub events: Vec<GameEvent>,
    /// Draw the part as damaged from now on.
    pub damaged: bool,
    /// Remove the part from the world.
    pub destroy: bool,
}

impl Outbox {
    pub fn take(&mut self) -> Outbox {
        std::mem::take(self)
    }
}

/// A damageable part with an outbox the world drains after each hit.
pub trait Part: Damageable {
    fn outbox_mut(&mut self) -> &mut Outbox;
}

/// Two bullets, left and right of the barrel, five times a second.
pub fn ship_pattern() -> Result<WeaponPattern> {
    WeaponPattern::new(SHIP_PATTERN_PERIOD)?
        .shot([-2.0, 0.0], 0.0)?
        .shot([2.0, 0.0], SHIP_PATTERN_PERIOD / 2.0)
}

// ---- Player ship ----

#[derive(Debug)]
pub struct Ship {
    pub life: LifeContainer,
    fsm: StateMachine<ShipState, Outbox>,
    outbox: Outbox,
    pub cannon: Cannon,
    pub pattern: WeaponPattern,
}

impl Ship {
    pub fn new(id: ObjectId, max_life: f64, pattern: WeaponPattern) -> Self {
        let mut fsm = StateMachine::new();
        fsm.add_state(ShipState::Flying);
        fsm.add_state(ShipState::Wrecked);
        fsm.add_transition(ShipState::Flying, ShipState::Wrecked)
            .add_callback(move |out: &mut Outbox| {
                out.events.push(GameEvent::Explosion {
                    effect: EffectRequest::wreck(out.position),
                });
                out.events.push(GameEvent::ShipDestroyed { id });
                out.destroy = true;
            });

        let mut outbox = Outbox::default();
        fsm.set_state(ShipState::Flying, &mut outbox);

        Self {
            life: LifeContainer::with_life(max_life),
            fsm,
            outbox,
            cannon: Cannon::new(SHIP_CANNON_OFFSET, CANNON_LENGTH),
            pattern,
        }
    }

    pub fn state(&self) -> Option<ShipState> {
        self.fsm.current()
    }
}

impl Damageable for Ship {
    fn life_container(&self) -> &LifeContainer {
        &self.life
    }

    fn life_container_mut(&mut self) -> &mut LifeContainer {
        &mut self.life
    }

    fn on_life_changed(&mut self) {
        if !self.life.is_alive() {
            self.fsm.call_transition(ShipState::Wrecked, &mut self.outbox);
        }
    }
}

impl Part for Ship {
    fn outbox_mut(&mut self) -> &mut Outbox {
        &mut self.outbox
    }
}

// ---- Escort vessel ----

#[derive(Debug)]
pub struct Vessel {
    pub brain: VesselBrain,
    pub life: LifeContainer,
    death: CallbackCollection<Outbox>,
    dead: bool,
    outbox: Outbox,
}

impl Vessel {
    pub fn new(id: ObjectId, life: f64, brain: VesselBrain) -> Self {
        let mut death = CallbackCollection::new();
        death.add_callback(move |out: &mut Outbox| {
            out.events.push(GameEvent::VesselDestroyed { id });
            out.events.push(GameEvent::Explosion {
                effect: EffectRequest::wreck(out.position),
            });
            out.destroy = true;
        });
        Self {
            brain,
            life: LifeContainer::with_life(life),
            death,
            dead: false,
            outbox: Outbox::default(),
        }
    }

    /// Callbacks fired once each time the vessel's life drops to zero.
    pub fn on_death(&mut self) -> &mut CallbackCollection<Outbox> {
        &mut self.death
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }
}

impl Damageable for Vessel {
    fn life_container(&self) -> &LifeContainer {
        &self.life
    }

    fn life_container_mut(&mut self) -> &mut LifeContainer {
        &mut self.life
    }

    fn on_life_changed(&mut self) {
        match (self.life.is_alive(), self.dead) {
            (false, false) => {
                self.dead = true;
                self.death.fire(&mut self.outbox);
            }
            (true, true) => self.dead = false,
            _ => {}
        }
    }
}

impl Part for Vessel {
    fn outbox_mut(&mut self) -> &mut Outbox {
        &mut self.outbox
    }
}

// ---- Boss ----

#[derive(Debug)]
pub struct Boss {
    pub radius: f64,
    pub modules: Vec<hecs::Entity>,
    death: CallbackCollection<Outbox>,
    dead: bool,
    outbox: Outbox,
}

impl Boss {
    pub fn new(id: ObjectId, radius: f64) -> Self {
        let mut death = CallbackCollection::new();
        death.add_callback(move |out: &mut Outbox| {
            out.events.push(GameEvent::BossDestroyed { id });
            out.events.push(GameEvent::Explosion {
                effect: EffectRequest::boss_death(out.position),
            });
            out.destroy = true;
        });
        Self {
            radius,
            modules: Vec::new(),
            death,
            dead: false,
            outbox: Outbox::default(),
        }
    }

    pub fn on_death(&mut self) -> &mut CallbackCollection<Outbox> {
        &mut self.death
    }

    /// Fire the death callbacks, once. Returns the resulting outbox.
    pub fn die(&mut self, position: DVec3) -> Outbox {
        if !self.dead {
            self.dead = true;
            self.outbox.position = position;
            self.death.fire(&mut self.outbox);
        }
        self.outbox.take()
    }
}

// ---- Boss module ----

#[derive(Debug)]
pub struct Module {
    pub boss: hecs::Entity,
    pub theta_range: [f64; 2],
    pub phi_range: [f64; 2],
    pub life: LifeContainer,
    fsm: StateMachine<ModuleState, Outbox>,
    outbox: Outbox,
    pub weapons: Vec<hecs::Entity>,
    /// Seconds left before each pending replacement turret appears.
    pub revive_timers: Vec<f64>,
}

impl Module {
    pub fn new(id: ObjectId, boss: hecs::Entity, config: &ModuleConfig, life: f64) -> Self {
        let mut fsm = StateMachine::new();
        fsm.add_state(ModuleState::FullLife);
        fsm.add_state(ModuleState::HalfBroken);
        fsm.add_state(ModuleState::Broken);
        fsm.add_transition(ModuleState::FullLife, ModuleState::HalfBroken)
            .add_callback(|out: &mut Outbox| out.damaged = true);
        fsm.add_transition(ModuleState::HalfBroken, ModuleState::Broken)
            .add_callback(move |out: &mut Outbox| {
                out.events.push(GameEvent::ModuleDestroyed { id });
                out.destroy = true;
            });

        let mut outbox = Outbox::default();
        fsm.set_state(ModuleState::FullLife, &mut outbox);

        Self {
            boss,
            theta_range: config.theta_range,
            phi_range: config.phi_range,
            life: LifeContainer::with_life(life),
            fsm,
            outbox,
            weapons: Vec::new(),
            revive_timers: Vec::new(),
        }
    }

    pub fn state(&self) -> Option<ModuleState> {
        self.fsm.current()
    }

    /// Whether the (theta, phi) pair lies in this module's rectangle.
    pub fn contains(&self, theta: f64, phi: f64) -> bool {
        let [theta_min, theta_max] = self.theta_range;
        let [phi_min, phi_max] = self.phi_range;
        (theta_min..=theta_max).contains(&theta) && (phi_min..=phi_max).contains(&phi)
    }

    /// Turret position on a boss of the given radius, at fractions of the
    /// module's theta and phi ranges.
    pub fn weapon_position(&self, center: DVec3, radius: f64, theta_ratio: f64, phi_ratio: f64) -> DVec3 {
        let lerp = |[min, max]: [f64; 2], t: f64| min + (max - min) * t;
        let spherical = SphericalVector::new(
            radius,
            lerp(self.theta_range, theta_ratio),
            lerp(self.phi_range, phi_ratio) - std::f64::consts::FRAC_PI_2,
        );
        center + spherical_to_gl(&spherical)
    }
}

impl Damageable for Module {
    fn life_container(&self) -> &LifeContainer {
        &self.life
    }

    fn life_container_mut(&mut self) -> &mut LifeContainer {
        &mut self.life
    }

    fn on_life_changed(&mut self) {
        let life = self.life.life().unwrap_or(0.0);
        let max_life = self.life.max_life().unwrap_or(0.0);
        if life < max_life / 2.0 {
            self.fsm.call_transition(ModuleState::HalfBroken, &mut self.outbox);
        }
        if life <= 0.0 {
            self.fsm.call_transition(ModuleState::Broken, &mut self.outbox);
        }
    }
}

impl Part for Module {
    fn outbox_mut(&mut self) -> &mut Outbox {
        &mut self.outbox
    }
}

// ---- Gatling turret ----

#[derive(Debug)]
pub struct Gatling {
    pub module: hecs::Entity,
    pub life: LifeContainer,
    pub mode: GatlingMode,
    /// Time since the last fire-mode coin flip.
    pub switch_timer: f64,
    /// Time since the last bullet.
    pub shoot_timer: f64,
    pub cannon: Cannon,
    id: ObjectId,
    dead: bool,
    outbox: Outbox,
}

impl Gatling {
    pub fn new(id: ObjectId, module: hecs::Entity) -> Self {
        Self {
            module,
            life: LifeContainer::with_life(GATLING_LIFE),
            mode: GatlingMode::Idle,
            switch_timer: 0.0,
            shoot_timer: 0.0,
            cannon: Cannon::new([0.0, 0.0], CANNON_LENGTH),
            id,
            dead: false,
            outbox: Outbox::default(),
        }
    }

    /// Seconds between two coin flips in the current mode.
    pub fn switch_period(&self) -> f64 {
        match self.mode {
            GatlingMode::Idle => GATLING_IDLE_SWITCH_PERIOD,
            GatlingMode::Shooting => GATLING_SHOOTING_SWITCH_PERIOD,
        }
    }
}

impl Damageable for Gatling {
    fn life_container(&self) -> &LifeContainer {
        &self.life
    }

    fn life_container_mut(&mut self) -> &mut LifeContainer {
        &mut self.life
    }

    fn on_life_changed(&mut self) {
        if !self.life.is_alive() && !self.dead {
            self.dead = true;
            self.outbox.events.push(GameEvent::WeaponDestroyed { id: self.id });
            self.outbox.events.push(GameEvent::Explosion {
                effect: EffectRequest::wreck(self.outbox.position),
            });
            self.outbox.destroy = true;
        }
    }
}

impl Part for Gatling {
    fn outbox_mut(&mut self) -> &mut Outbox {
        &mut self.outbox
    }
}
