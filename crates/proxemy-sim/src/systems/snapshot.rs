//! Snapshot system: reads the world and builds a `GameStateSnapshot`.
//!
//! This system is read-only; it never modifies the world.

use proxemy_core::components::{Renderable, ShipControls};
use proxemy_core::enums::{EntityKind, GamePhase};
use proxemy_core::events::GameEvent;
use proxemy_core::life::Damageable;
use proxemy_core::spatial::Spatial;
use proxemy_core::state::{GameStateSnapshot, ObjectView, ShipView};
use proxemy_core::types::SimTime;

use crate::detector::object_id;
use crate::objects::{Gatling, Module, Ship, Vessel};
use crate::world::World;

pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    score: u32,
    events: Vec<GameEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: *time,
        phase,
        score,
        ship: build_ship(world),
        objects: build_objects(world),
        events,
    }
}

fn build_ship(world: &World) -> Option<ShipView> {
    let entity = world.get_object_of_type(EntityKind::Ship)?;
    let ecs = world.ecs();
    let spatial = ecs.get::<&Spatial>(entity).ok()?;
    let ship = ecs.get::<&Ship>(entity).ok()?;
    let is_shooting = ecs
        .get::<&ShipControls>(entity)
        .map(|c| c.is_shooting)
        .unwrap_or(false);
    Some(ShipView {
        id: object_id(entity),
        position: spatial.position(),
        forward: spatial.forward(),
        up: spatial.up(),
        life: ship.life(),
        max_life: ship.life.max_life().unwrap_or(0.0),
        is_shooting,
    })
}

/// One view per active object, in insertion order.
fn build_objects(world: &World) -> Vec<ObjectView> {
    let ecs = world.ecs();
    world
        .active()
        .iter()
        .filter_map(|&entity| {
            let kind = world.kind(entity)?;
            let spatial = ecs.get::<&Spatial>(entity).ok()?;
            let renderable = ecs.get::<&Renderable>(entity).ok().map(|r| *r);
            let life = match kind {
                EntityKind::Ship => ecs.get::<&Ship>(entity).ok().map(|p| p.life()),
                EntityKind::Vessel => ecs.get::<&Vessel>(entity).ok().map(|p| p.life()),
                EntityKind::Module => ecs.get::<&Module>(entity).ok().map(|p| p.life()),
                EntityKind::Gatling => ecs.get::<&Gatling>(entity).ok().map(|p| p.life()),
                _ => None,
            };
            Some(ObjectView {
                id: object_id(entity),
                kind,
                model: renderable.map(|r| r.model),
                position: spatial.position(),
                orientation: spatial.orientation(),
                life,
                damaged: renderable.is_some_and(|r| r.damaged),
            })
        })
        .collect()
}
