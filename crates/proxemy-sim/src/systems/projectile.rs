//! Straight bullets.

use hecs::Entity;

use proxemy_core::components::Projectile;
use proxemy_core::spatial::Spatial;

use crate::world::World;

/// Move along the velocity; expire once the life span runs out.
pub fn update(world: &mut World, entity: Entity, dt: f64) {
    let expired = {
        let Ok((spatial, projectile)) = world
            .ecs
            .query_one_mut::<(&mut Spatial, &mut Projectile)>(entity)
        else {
            return;
        };
        spatial.translate(projectile.velocity * dt);
        projectile.remaining -= dt;
        projectile.remaining < 0.0
    };
    if expired {
        world.destroy(entity);
    }
}
