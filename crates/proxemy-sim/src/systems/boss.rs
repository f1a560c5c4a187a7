//! Boss parts: module turret revival and gatling turrets.

use hecs::Entity;
use rand::Rng;
use tracing::{debug, warn};

use proxemy_core::cannon::BulletLaunch;
use proxemy_core::constants::{GATLING_BULLET_SPEED, GATLING_SHOOT_PERIOD, GATLING_SPREAD};
use proxemy_core::enums::{EntityKind, GatlingMode};
use proxemy_core::spatial::Spatial;
use proxemy_core::types::{cartesian_to_spherical, spherical_to_cartesian};

use crate::objects::{Gatling, Module};
use crate::world::{Spawn, World};

/// Count down pending revive timers and spawn a turret at a random spot
/// of the module for each one that expires.
pub fn update_module(world: &mut World, entity: Entity, dt: f64) {
    let due = {
        let Ok(mut module) = world.ecs.get::<&mut Module>(entity) else {
            return;
        };
        let pending = module.revive_timers.len();
        for timer in &mut module.revive_timers {
            *timer -= dt;
        }
        module.revive_timers.retain(|&timer| timer > 0.0);
        pending - module.revive_timers.len()
    };

    for _ in 0..due {
        let theta_ratio: f64 = world.rng.gen();
        let phi_ratio: f64 = world.rng.gen();
        match world.add_weapon(entity, theta_ratio, phi_ratio) {
            Ok(_) => debug!(?entity, "turret revived"),
            Err(err) => warn!(%err, "failed to revive turret"),
        }
    }
}

/// Track the ship while it is over the turret's hemisphere, flip between
/// idle and shooting at random, and fire jittered bullets while shooting.
pub fn update_gatling(world: &mut World, entity: Entity, dt: f64) {
    let Some(ship) = world
        .get_object_of_type(EntityKind::Ship)
        .and_then(|ship| world.position(ship))
    else {
        return;
    };

    let mut launches = std::mem::take(&mut world.launches);
    launches.clear();

    {
        let Ok((spatial, gatling)) = world
            .ecs
            .query_one_mut::<(&mut Spatial, &mut Gatling)>(entity)
        else {
            world.launches = launches;
            return;
        };
        let position = spatial.position();
        if position.dot(ship - position) > 0.0 {
            spatial.look_at(ship);
            gatling.cannon.update_position(spatial);
            gatling.cannon.look_at(ship);

            gatling.switch_timer += dt;
            if gatling.switch_timer > gatling.switch_period() {
                gatling.switch_timer = 0.0;
                if world.rng.gen_bool(0.5) {
                    gatling.mode = match gatling.mode {
                        GatlingMode::Idle => GatlingMode::Shooting,
                        GatlingMode::Shooting => GatlingMode::Idle,
                    };
                }
            }

            if gatling.mode == GatlingMode::Shooting {
                gatling.shoot_timer += dt;
                while gatling.shoot_timer >= GATLING_SHOOT_PERIOD {
                    gatling.shoot_timer -= GATLING_SHOOT_PERIOD;
                    let mut direction = cartesian_to_spherical(gatling.cannon.forward());
                    direction
                        .add_theta(world.rng.gen_range(-GATLING_SPREAD..=GATLING_SPREAD))
                        .add_phi(world.rng.gen_range(-GATLING_SPREAD..=GATLING_SPREAD));
                    launches.push(BulletLaunch {
                        position: gatling.cannon.shoot_position(),
                        velocity: spherical_to_cartesian(&direction).normalize_or_zero()
                            * GATLING_BULLET_SPEED,
                    });
                }
            }
        }
    }

    for launch in launches.drain(..) {
        if let Err(err) = world.create(Spawn::GatlingBullet(launch)) {
            warn!(%err, "failed to spawn gatling bullet");
        }
    }
    world.launches = launches;
}
