//! Escort vessels: gather what the brain needs, run it, spawn its bullets.

use hecs::Entity;
use tracing::warn;

use proxemy_ai::steering::{Obstacle, TargetFrame};
use proxemy_ai::vessel::VesselSenses;
use proxemy_core::enums::EntityKind;
use proxemy_core::spatial::Spatial;

use crate::detector::{object_id, BodyDetector};
use crate::objects::{Boss, Vessel};
use crate::world::{Spawn, World};

pub fn update(world: &mut World, entity: Entity, dt: f64) {
    // Nothing to escort without a player ship.
    let Some(target) = world
        .get_object_of_type(EntityKind::Ship)
        .and_then(|ship| world.ecs.get::<&Spatial>(ship).ok().map(|s| target_frame(&s)))
    else {
        return;
    };
    let boss = world.get_object_of_type(EntityKind::Boss).and_then(|boss| {
        let center = world.position(boss)?;
        let radius = world.ecs.get::<&Boss>(boss).ok()?.radius;
        Some((object_id(boss), Obstacle { center, radius }))
    });

    let mut neighbours = std::mem::take(&mut world.neighbours);
    neighbours.clear();
    neighbours.extend(
        world
            .active
            .iter()
            .filter(|&&other| other != entity && world.kind(other) == Some(EntityKind::Vessel))
            .filter_map(|&other| world.position(other)),
    );

    let Some(mut spatial) = world.ecs.get::<&Spatial>(entity).ok().map(|s| (*s).clone()) else {
        world.neighbours = neighbours;
        return;
    };

    let mut launches = std::mem::take(&mut world.launches);
    launches.clear();

    if let Ok(mut vessel) = world.ecs.get::<&mut Vessel>(entity) {
        let detector = BodyDetector::new(&world.ecs, &world.active, world.viewpoint);
        let senses = VesselSenses {
            id: object_id(entity),
            target,
            boss,
            neighbours: &neighbours,
            detector: &detector,
        };
        vessel
            .brain
            .update(&mut spatial, &senses, &mut world.rng, dt, &mut launches);
    }

    if let Ok(mut current) = world.ecs.get::<&mut Spatial>(entity) {
        *current = spatial;
    }

    for launch in launches.drain(..) {
        if let Err(err) = world.create(Spawn::GatlingBullet(launch)) {
            warn!(%err, "failed to spawn vessel bullet");
        }
    }
    world.launches = launches;
    world.neighbours = neighbours;
}

fn target_frame(spatial: &Spatial) -> TargetFrame {
    TargetFrame {
        position: spatial.position(),
        forward: spatial.forward(),
        up: spatial.up(),
        right: spatial.right(),
    }
}
