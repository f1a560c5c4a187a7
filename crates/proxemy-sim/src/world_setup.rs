//! Scene factory: the player ship, the boss with its modules and turrets,
//! and the escort vessels.

use hecs::Entity;
use rand::Rng;
use tracing::info;

use proxemy_core::Result;

use crate::world::{Spawn, World};

/// Handles to the objects the engine watches.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub ship: Entity,
    pub boss: Entity,
    pub modules: Vec<Entity>,
    pub vessels: Vec<Entity>,
}

/// Populate the world from its configuration.
///
/// Fails on the first object whose model is unknown; objects created
/// before the failure are left in the world for the caller to clear.
pub fn setup_scene(world: &mut World) -> Result<Scene> {
    let ship = world.create(Spawn::Ship)?;
    let boss = world.create(Spawn::Boss)?;

    let boss_config = world.config().boss.clone();
    let mut modules = Vec::with_capacity(boss_config.modules.len());
    for config in boss_config.modules {
        let module = world.create(Spawn::Module { boss, config })?;
        for _ in 0..boss_config.weapons_per_module {
            let theta_ratio: f64 = world.rng.gen();
            let phi_ratio: f64 = world.rng.gen();
            world.add_weapon(module, theta_ratio, phi_ratio)?;
        }
        modules.push(module);
    }

    let spawn_positions = world.config().vessels.spawn_positions.clone();
    let vessels = spawn_positions
        .into_iter()
        .map(|position| world.create(Spawn::Vessel { position }))
        .collect::<Result<Vec<_>>>()?;

    info!(
        modules = modules.len(),
        vessels = vessels.len(),
        "scene ready"
    );
    Ok(Scene {
        ship,
        boss,
        modules,
        vessels,
    })
}
