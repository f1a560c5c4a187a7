//! The world: entity registry, collision dispatch and object lifecycle.
//!
//! Objects live in a hecs world. The `active` list keeps insertion order for
//! updates and collision pairs. Destroyed objects of poolable kinds stay
//! spawned in a per-kind dead pool and are handed out again by `create`, so
//! bullets keep their entity id across lives.

use std::collections::{HashMap, HashSet};
use std::f64::consts::{FRAC_PI_2, TAU};

use glam::{DQuat, DVec3};
use hecs::Entity;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

use proxemy_ai::profiles::VesselProfile;
use proxemy_ai::vessel::VesselBrain;
use proxemy_collision::CollisionBody;
use proxemy_core::cannon::BulletLaunch;
use proxemy_core::components::{Collider, Projectile, Renderable, ShipControls};
use proxemy_core::config::{GameConfig, ModuleConfig};
use proxemy_core::constants::*;
use proxemy_core::enums::{CollisionGroup, EntityKind};
use proxemy_core::events::{EffectRequest, GameEvent};
use proxemy_core::interfaces::{ModelCatalog, ModelId, RenderContext, RenderHandle};
use proxemy_core::life::Damageable;
use proxemy_core::spatial::Spatial;
use proxemy_core::types::{cartesian_to_spherical, from_gl};
use proxemy_core::Result;

use crate::detector::{object_id, Viewpoint};
use crate::objects::{ship_pattern, Boss, Gatling, Module, Outbox, Part, Ship, Vessel};
use crate::systems;

/// What to create, with its construction arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Spawn {
    Ship,
    Vessel { position: DVec3 },
    Boss,
    Module { boss: Entity, config: ModuleConfig },
    Gatling { module: Entity, position: DVec3 },
    ShipBullet(BulletLaunch),
    GatlingBullet(BulletLaunch),
}

impl Spawn {
    pub fn kind(&self) -> EntityKind {
        match self {
            Spawn::Ship => EntityKind::Ship,
            Spawn::Vessel { .. } => EntityKind::Vessel,
            Spawn::Boss => EntityKind::Boss,
            Spawn::Module { .. } => EntityKind::Module,
            Spawn::Gatling { .. } => EntityKind::Gatling,
            Spawn::ShipBullet(_) => EntityKind::ShipBullet,
            Spawn::GatlingBullet(_) => EntityKind::GatlingBullet,
        }
    }
}

/// Collision data of one object, captured at the start of the collision pass.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub entity: Entity,
    pub kind: EntityKind,
    pub body: CollisionBody,
    pub collider: Collider,
    pub position: DVec3,
    /// Damage dealt on contact.
    pub power: f64,
}

pub struct World {
    pub(crate) ecs: hecs::World,
    pub(crate) active: Vec<Entity>,
    active_set: HashSet<Entity>,
    dead_pools: HashMap<EntityKind, Vec<Entity>>,
    pub(crate) events: Vec<GameEvent>,
    render: Box<dyn RenderContext + Send>,
    catalog: ModelCatalog,
    pub(crate) config: GameConfig,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) viewpoint: Viewpoint,
    // Scratch buffers reused across ticks.
    candidates: Vec<Candidate>,
    update_order: Vec<Entity>,
    pub(crate) launches: Vec<BulletLaunch>,
    pub(crate) neighbours: Vec<DVec3>,
}

impl World {
    pub fn new(config: GameConfig, catalog: ModelCatalog, render: Box<dyn RenderContext + Send>) -> Self {
        Self {
            ecs: hecs::World::new(),
            active: Vec::new(),
            active_set: HashSet::new(),
            dead_pools: HashMap::new(),
            events: Vec::new(),
            render,
            catalog,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            viewpoint: Viewpoint::default(),
            candidates: Vec::new(),
            update_order: Vec::new(),
            launches: Vec::new(),
            neighbours: Vec::new(),
        }
    }

    /// Read-only access to the underlying ECS world.
    pub fn ecs(&self) -> &hecs::World {
        &self.ecs
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn viewpoint(&self) -> Viewpoint {
        self.viewpoint
    }

    /// Active objects in insertion order.
    pub fn active(&self) -> &[Entity] {
        &self.active
    }

    pub fn is_active(&self, entity: Entity) -> bool {
        self.active_set.contains(&entity)
    }

    pub fn kind(&self, entity: Entity) -> Option<EntityKind> {
        self.ecs.get::<&EntityKind>(entity).ok().map(|kind| *kind)
    }

    pub fn position(&self, entity: Entity) -> Option<DVec3> {
        self.ecs.get::<&Spatial>(entity).ok().map(|s| s.position())
    }

    /// Number of destroyed objects of `kind` waiting for reuse.
    pub fn pooled(&self, kind: EntityKind) -> usize {
        self.dead_pools.get(&kind).map_or(0, Vec::len)
    }

    /// First active object of a kind.
    pub fn get_object_of_type(&self, kind: EntityKind) -> Option<Entity> {
        self.active
            .iter()
            .copied()
            .find(|&e| self.kind(e) == Some(kind))
    }

    pub fn get_objects_of_type(&self, kind: EntityKind) -> Vec<Entity> {
        self.active
            .iter()
            .copied()
            .filter(|&e| self.kind(e) == Some(kind))
            .collect()
    }

    /// Take the events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Place the visibility camera behind the player ship, if there is one.
    pub fn place_viewpoint(&mut self) {
        let Some(ship) = self.get_object_of_type(EntityKind::Ship) else {
            return;
        };
        if let Ok(spatial) = self.ecs.get::<&Spatial>(ship) {
            self.viewpoint = Viewpoint::behind(&spatial);
        }
    }

    // ---- Lifecycle ----

    /// Create an object. Poolable kinds reuse a destroyed instance when one
    /// is available. Fails when the object's model is not in the catalog.
    pub fn create(&mut self, spawn: Spawn) -> Result<Entity> {
        let kind = spawn.kind();
        let model = self.catalog.resolve(self.model_name(kind))?;

        if kind.is_poolable() {
            if let Some(entity) = self.dead_pools.get_mut(&kind).and_then(Vec::pop) {
                if let Spawn::ShipBullet(launch) | Spawn::GatlingBullet(launch) = &spawn {
                    let _ = self.ecs.insert(entity, bullet_parts(launch));
                }
                self.activate(entity);
                trace!(?kind, ?entity, "reused pooled object");
                return Ok(entity);
            }
        }

        let entity = match spawn {
            Spawn::Ship => self.spawn_ship(model)?,
            Spawn::Vessel { position } => self.spawn_vessel(model, position)?,
            Spawn::Boss => self.spawn_boss(model),
            Spawn::Module { boss, config } => self.spawn_module(model, boss, &config),
            Spawn::Gatling { module, position } => self.spawn_gatling(model, module, position),
            Spawn::ShipBullet(launch) | Spawn::GatlingBullet(launch) => {
                let (spatial, projectile) = bullet_parts(&launch);
                let collider = match kind {
                    EntityKind::ShipBullet => {
                        Collider::new(CollisionGroup::PlayerShot, Some(CollisionGroup::Boss))
                    }
                    _ => Collider::new(CollisionGroup::BossShot, Some(CollisionGroup::Player)),
                };
                self.ecs
                    .spawn((kind, spatial, collider, Renderable::new(model), projectile))
            }
        };
        self.activate(entity);
        trace!(?kind, ?entity, "created object");
        Ok(entity)
    }

    /// Spawn a turret on `module` at fractions of its angular ranges.
    pub fn add_weapon(&mut self, module: Entity, theta_ratio: f64, phi_ratio: f64) -> Result<Option<Entity>> {
        let Some(boss) = self.ecs.get::<&Module>(module).ok().map(|m| m.boss) else {
            return Ok(None);
        };
        let Some(center) = self.position(boss) else {
            return Ok(None);
        };
        let radius = self.config.boss.radius;
        let Some(position) = self
            .ecs
            .get::<&Module>(module)
            .ok()
            .map(|m| m.weapon_position(center, radius, theta_ratio, phi_ratio))
        else {
            return Ok(None);
        };
        self.create(Spawn::Gatling { module, position }).map(Some)
    }

    /// Destroy an object. No-op if it is not active.
    pub fn destroy(&mut self, entity: Entity) {
        if !self.active_set.remove(&entity) {
            return;
        }
        let handle = self
            .ecs
            .get::<&Renderable>(entity)
            .ok()
            .map(|r| RenderHandle {
                object: object_id(entity),
                model: r.model,
            });
        if let Some(handle) = handle {
            self.render.remove_renderable(handle);
        }

        let kind = self.kind(entity);
        self.on_destroy(entity, kind);
        self.active.retain(|&e| e != entity);

        match kind {
            Some(kind) if kind.is_poolable() => {
                self.dead_pools.entry(kind).or_default().push(entity);
                trace!(?kind, ?entity, "pooled object");
            }
            _ => {
                let _ = self.ecs.despawn(entity);
                trace!(?kind, ?entity, "despawned object");
            }
        }
    }

    /// Destroy every active object.
    pub fn clear(&mut self) {
        let active = self.active.clone();
        for entity in active {
            self.destroy(entity);
        }
        debug!("world cleared");
    }

    fn on_destroy(&mut self, entity: Entity, kind: Option<EntityKind>) {
        match kind {
            Some(EntityKind::Boss) => {
                let modules = self
                    .ecs
                    .get::<&Boss>(entity)
                    .map(|b| b.modules.clone())
                    .unwrap_or_default();
                for module in modules {
                    self.destroy(module);
                }
            }
            Some(EntityKind::Module) => {
                let weapons = self
                    .ecs
                    .get::<&Module>(entity)
                    .map(|m| m.weapons.clone())
                    .unwrap_or_default();
                for weapon in weapons {
                    self.destroy(weapon);
                }
            }
            Some(EntityKind::Gatling) => {
                let Some(module) = self.ecs.get::<&Gatling>(entity).ok().map(|g| g.module) else {
                    return;
                };
                let module_alive = self.is_active(module);
                if let Ok(mut module) = self.ecs.get::<&mut Module>(module) {
                    module.weapons.retain(|&w| w != entity);
                    if module_alive && module.is_alive() {
                        module.revive_timers.push(WEAPON_REVIVE_TIMEOUT);
                    }
                }
            }
            _ => {}
        }
    }

    fn activate(&mut self, entity: Entity) {
        if !self.active_set.insert(entity) {
            return;
        }
        self.active.push(entity);
        let handle = self
            .ecs
            .get::<&Renderable>(entity)
            .ok()
            .map(|r| RenderHandle {
                object: object_id(entity),
                model: r.model,
            });
        if let Some(handle) = handle {
            self.render.add_renderable(handle);
        }
    }

    fn model_name(&self, kind: EntityKind) -> &str {
        let models = &self.config.models;
        match kind {
            EntityKind::Ship => &models.ship,
            EntityKind::Vessel => &models.vessel,
            EntityKind::Boss => &models.boss,
            EntityKind::Module => &models.module,
            EntityKind::Gatling => &models.gatling,
            EntityKind::ShipBullet | EntityKind::GatlingBullet => &models.bullet,
        }
    }

    fn spawn_ship(&mut self, model: ModelId) -> Result<Entity> {
        let pattern = ship_pattern()?;
        let ship = &self.config.ship;
        let mut spatial = Spatial::new(ship.start_position)
            .with_forward(ship.start_forward)
            .with_body(CollisionBody::cuboid(
                ship.start_position,
                DVec3::from(SHIP_BOX_SIZE),
                DQuat::IDENTITY,
            ));
        spatial.look_at(DVec3::ZERO);
        let max_life = ship.max_life;

        let entity = self.ecs.spawn((
            EntityKind::Ship,
            spatial,
            Collider::new(CollisionGroup::Player, Some(CollisionGroup::BossShot)),
            Renderable::new(model),
            ShipControls::default(),
        ));
        let _ = self
            .ecs
            .insert_one(entity, Ship::new(object_id(entity), max_life, pattern));
        Ok(entity)
    }

    fn spawn_vessel(&mut self, model: ModelId, position: DVec3) -> Result<Entity> {
        let brain = VesselBrain::new(VesselProfile::default())?;
        let mut spatial = Spatial::new(position).with_body(CollisionBody::cuboid(
            position,
            DVec3::from(VESSEL_BOX_SIZE),
            DQuat::IDENTITY,
        ));
        if let Some(inward) = (-position).try_normalize() {
            spatial.set_forward(inward);
        }
        let life = self.config.vessels.life;

        let entity = self.ecs.spawn((
            EntityKind::Vessel,
            spatial,
            Collider::new(CollisionGroup::Boss, Some(CollisionGroup::PlayerShot)),
            Renderable::new(model),
        ));
        let _ = self
            .ecs
            .insert_one(entity, Vessel::new(object_id(entity), life, brain));
        Ok(entity)
    }

    fn spawn_boss(&mut self, model: ModelId) -> Entity {
        let radius = self.config.boss.radius;
        let spatial =
            Spatial::new(DVec3::ZERO).with_body(CollisionBody::sphere(DVec3::ZERO, radius));
        let entity = self.ecs.spawn((
            EntityKind::Boss,
            spatial,
            Collider::new(CollisionGroup::Boss, Some(CollisionGroup::PlayerShot)),
            Renderable::new(model),
        ));
        let _ = self.ecs.insert_one(entity, Boss::new(object_id(entity), radius));
        entity
    }

    fn spawn_module(&mut self, model: ModelId, boss: Entity, config: &ModuleConfig) -> Entity {
        let center = self.position(boss).unwrap_or_default();
        let life = self.config.boss.module_life;
        let entity = self.ecs.spawn((
            EntityKind::Module,
            Spatial::new(center),
            Collider::new(CollisionGroup::Boss, None),
            Renderable::new(model),
        ));
        let _ = self
            .ecs
            .insert_one(entity, Module::new(object_id(entity), boss, config, life));
        if let Ok(mut boss) = self.ecs.get::<&mut Boss>(boss) {
            boss.modules.push(entity);
        }
        entity
    }

    fn spawn_gatling(&mut self, model: ModelId, module: Entity, position: DVec3) -> Entity {
        let mut spatial = Spatial::new(position)
            .with_body(CollisionBody::sphere(position, GATLING_RADIUS));
        // Turrets stand on the boss surface: up is the outward normal.
        if let Some(outward) = position.try_normalize() {
            let forward = outward.any_orthonormal_vector();
            spatial.set_up(outward);
            spatial.set_forward(forward);
            spatial.set_right(forward.cross(outward));
        }
        let entity = self.ecs.spawn((
            EntityKind::Gatling,
            spatial,
            Collider::new(CollisionGroup::Boss, Some(CollisionGroup::PlayerShot)),
            Renderable::new(model),
        ));
        let _ = self
            .ecs
            .insert_one(entity, Gatling::new(object_id(entity), module));
        if let Ok(mut module) = self.ecs.get::<&mut Module>(module) {
            module.weapons.push(entity);
        }
        entity
    }

    // ---- Update ----

    /// Run the collision pass, then update every active object.
    pub fn update(&mut self, dt: f64) -> &mut Self {
        self.handle_collisions();

        let mut order = std::mem::take(&mut self.update_order);
        order.clear();
        order.extend_from_slice(&self.active);
        for &entity in &order {
            if !self.is_active(entity) {
                continue;
            }
            match self.kind(entity) {
                Some(EntityKind::Ship) => systems::ship::update(self, entity, dt),
                Some(EntityKind::Vessel) => systems::vessel::update(self, entity, dt),
                Some(EntityKind::Module) => systems::boss::update_module(self, entity, dt),
                Some(EntityKind::Gatling) => systems::boss::update_gatling(self, entity, dt),
                Some(EntityKind::ShipBullet | EntityKind::GatlingBullet) => {
                    systems::projectile::update(self, entity, dt)
                }
                Some(EntityKind::Boss) | None => {}
            }
        }
        self.update_order = order;
        self
    }

    /// Pairwise collision pass over the objects active when it starts.
    ///
    /// A pair is tested when either side accepts the other's group; a hit
    /// is dispatched to both sides. Objects destroyed earlier in the pass
    /// take part in no further pairs.
    fn handle_collisions(&mut self) {
        let mut candidates = std::mem::take(&mut self.candidates);
        candidates.clear();

        for &entity in &self.active {
            let Ok((kind, spatial, collider, projectile)) = self
                .ecs
                .query_one_mut::<(&EntityKind, &mut Spatial, &Collider, Option<&Projectile>)>(entity)
            else {
                continue;
            };
            let position = spatial.position();
            let Some(body) = spatial.refresh_body() else {
                continue;
            };
            candidates.push(Candidate {
                entity,
                kind: *kind,
                body: body.clone(),
                collider: *collider,
                position,
                power: projectile.map_or(0.0, |p| p.power),
            });
        }

        for i in 0..candidates.len() {
            for j in (i + 1)..candidates.len() {
                let (a, b) = (&candidates[i], &candidates[j]);
                if !self.is_active(a.entity) || !self.is_active(b.entity) {
                    continue;
                }
                if !(a.collider.can_collide_with(&b.collider) || b.collider.can_collide_with(&a.collider)) {
                    continue;
                }
                if !a.body.intersects(&b.body) {
                    continue;
                }
                trace!(a = ?a.kind, b = ?b.kind, "collision");
                self.on_collision_with(a, b);
                self.on_collision_with(b, a);
            }
        }

        self.candidates = candidates;
    }

    fn on_collision_with(&mut self, me: &Candidate, other: &Candidate) {
        if !self.is_active(me.entity) {
            return;
        }
        match me.kind {
            EntityKind::Ship => {
                if other.collider.group == CollisionGroup::BossShot {
                    self.damage(me.entity, other.power);
                }
            }
            EntityKind::Vessel | EntityKind::Gatling => {
                if other.collider.group == CollisionGroup::PlayerShot {
                    self.damage(me.entity, other.power);
                }
            }
            EntityKind::Boss => {
                if other.collider.group == CollisionGroup::PlayerShot {
                    self.hit_boss(me.entity, other.position, other.power);
                }
            }
            EntityKind::ShipBullet | EntityKind::GatlingBullet => {
                self.events.push(GameEvent::Explosion {
                    effect: EffectRequest::impact(me.position),
                });
                self.destroy(me.entity);
            }
            EntityKind::Module => {}
        }
    }

    // ---- Damage ----

    /// Hurt a damageable object and apply whatever its thresholds request.
    pub fn damage(&mut self, entity: Entity, amount: f64) {
        if !self.is_active(entity) {
            return;
        }
        let position = self.position(entity).unwrap_or_default();
        let result = match self.kind(entity) {
            Some(EntityKind::Ship) => self.hurt_part::<Ship>(entity, position, amount),
            Some(EntityKind::Vessel) => self.hurt_part::<Vessel>(entity, position, amount),
            Some(EntityKind::Module) => self.hurt_part::<Module>(entity, position, amount),
            Some(EntityKind::Gatling) => self.hurt_part::<Gatling>(entity, position, amount),
            _ => None,
        };
        let Some((life, outbox)) = result else {
            return;
        };
        if self.kind(entity) == Some(EntityKind::Ship) {
            self.events.push(GameEvent::LifeChanged { life });
        }
        self.apply_outbox(entity, outbox);
    }

    fn hurt_part<T: Part + hecs::Component>(
        &mut self,
        entity: Entity,
        position: DVec3,
        amount: f64,
    ) -> Option<(f64, Outbox)> {
        let mut part = self.ecs.get::<&mut T>(entity).ok()?;
        part.outbox_mut().position = position;
        part.hurt(amount);
        let life = part.life();
        Some((life, part.outbox_mut().take()))
    }

    fn apply_outbox(&mut self, entity: Entity, outbox: Outbox) {
        self.events.extend(outbox.events);
        if outbox.damaged {
            if let Ok(mut renderable) = self.ecs.get::<&mut Renderable>(entity) {
                renderable.damaged = true;
            }
        }
        if outbox.destroy {
            info!(kind = ?self.kind(entity), ?entity, "object destroyed");
            self.destroy(entity);
        }
    }

    /// A player shot hit the boss at `point`: score, then damage the first
    /// alive module whose angular range holds the point. The boss dies
    /// once no module is left alive.
    fn hit_boss(&mut self, boss: Entity, point: DVec3, damage: f64) {
        self.events.push(GameEvent::PointsAdded {
            points: BOSS_HIT_POINTS,
        });

        let center = self.position(boss).unwrap_or_default();
        let spherical = cartesian_to_spherical(from_gl(point - center));
        let theta = spherical.theta();
        let phi = (spherical.phi() + FRAC_PI_2).rem_euclid(TAU);

        let modules = self
            .ecs
            .get::<&Boss>(boss)
            .map(|b| b.modules.clone())
            .unwrap_or_default();
        let target = modules.iter().copied().find(|&module| {
            self.is_active(module)
                && self
                    .ecs
                    .get::<&Module>(module)
                    .is_ok_and(|m| m.is_alive() && m.contains(theta, phi))
        });
        if let Some(module) = target {
            self.damage(module, damage);
        }

        let any_alive = modules.iter().any(|&module| {
            self.is_active(module) && self.ecs.get::<&Module>(module).is_ok_and(|m| m.is_alive())
        });
        if !any_alive {
            let outbox = match self.ecs.get::<&mut Boss>(boss) {
                Ok(mut b) => b.die(center),
                Err(_) => return,
            };
            info!(?boss, "boss defeated");
            self.apply_outbox(boss, outbox);
        }
    }
}

/// Spatial and projectile state of a bullet leaving a muzzle.
fn bullet_parts(launch: &BulletLaunch) -> (Spatial, Projectile) {
    let mut spatial = Spatial::new(launch.position).with_body(CollisionBody::cuboid(
        launch.position,
        DVec3::from(BULLET_BOX_SIZE),
        DQuat::IDENTITY,
    ));
    spatial.look_at(launch.position + launch.velocity);
    let projectile = Projectile {
        velocity: launch.velocity,
        remaining: BULLET_LIFESPAN,
        power: BULLET_POWER,
    };
    (spatial, projectile)
}
