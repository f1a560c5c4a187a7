//! Player ship: spherical flight driven by the control signals, cannon
//! aiming and pattern-driven fire.

use glam::DVec3;
use hecs::Entity;
use tracing::warn;

use proxemy_core::cannon::BulletLaunch;
use proxemy_core::components::ShipControls;
use proxemy_core::constants::SHIP_BULLET_SPEED;
use proxemy_core::spatial::{SphereMover, Spatial};

use crate::objects::Ship;
use crate::world::{Spawn, World};

pub fn update(world: &mut World, entity: Entity, dt: f64) {
    let angular_speed = world.config.ship.angular_speed;
    let mut launches = std::mem::take(&mut world.launches);
    launches.clear();

    {
        let Ok((spatial, controls, ship)) = world
            .ecs
            .query_one_mut::<(&mut Spatial, &ShipControls, &mut Ship)>(entity)
        else {
            world.launches = launches;
            return;
        };

        spatial.move_on_sphere(
            controls.horizontal_speed * dt * angular_speed,
            controls.vertical_speed * dt * angular_speed,
        );
        spatial.look_at(DVec3::ZERO);

        ship.cannon.update_position(spatial);
        ship.cannon.look_at(controls.aimed_point);

        if controls.is_shooting {
            let velocity = ship.cannon.forward() * SHIP_BULLET_SPEED;
            for offset in ship.pattern.update(dt) {
                launches.push(BulletLaunch {
                    position: ship.cannon.offset_shoot_position(*offset),
                    velocity,
                });
            }
        }
    }

    for launch in launches.drain(..) {
        if let Err(err) = world.create(Spawn::ShipBullet(launch)) {
            warn!(%err, "failed to spawn ship bullet");
        }
    }
    world.launches = launches;
}
