//! Simulation engine.
//!
//! `SimulationEngine` owns the world, processes player commands, runs
//! fixed steps and produces `GameStateSnapshot`s. Completely headless:
//! rendering is reached only through the `RenderContext` it is given.

use std::collections::VecDeque;

use tracing::{error, info};

use proxemy_core::callbacks::CallbackCollection;
use proxemy_core::commands::PlayerCommand;
use proxemy_core::components::ShipControls;
use proxemy_core::config::GameConfig;
use proxemy_core::constants::LETHAL_DAMAGE;
use proxemy_core::enums::{EntityKind, GamePhase};
use proxemy_core::events::GameEvent;
use proxemy_core::interfaces::{ModelCatalog, RenderContext, SceneIndex};
use proxemy_core::state::GameStateSnapshot;
use proxemy_core::types::SimTime;
use proxemy_core::Result;

use crate::systems;
use crate::world::World;
use crate::world_setup::{self, Scene};

pub struct SimulationEngine {
    world: World,
    dt: f64,
    time: SimTime,
    phase: GamePhase,
    score: u32,
    accumulator: f64,
    command_queue: VecDeque<PlayerCommand>,
    scene: Option<Scene>,
    pending_events: Vec<GameEvent>,
    life_hooks: CallbackCollection<f64>,
    points_hooks: CallbackCollection<u32>,
}

impl SimulationEngine {
    /// Headless engine: every configured model is known and renderables are
    /// only tracked by a [`SceneIndex`].
    pub fn new(config: GameConfig) -> Self {
        let catalog = ModelCatalog::new(config.models.all());
        Self::with_collaborators(config, catalog, Box::new(SceneIndex::new()))
    }

    pub fn with_collaborators(
        config: GameConfig,
        catalog: ModelCatalog,
        render: Box<dyn RenderContext + Send>,
    ) -> Self {
        let dt = config.dt();
        Self {
            world: World::new(config, catalog, render),
            dt,
            time: SimTime::default(),
            phase: GamePhase::default(),
            score: 0,
            accumulator: 0.0,
            command_queue: VecDeque::new(),
            scene: None,
            pending_events: Vec::new(),
            life_hooks: CallbackCollection::new(),
            points_hooks: CallbackCollection::new(),
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// HUD hook fired with the ship's new life after every change.
    pub fn on_life_changed(&mut self) -> &mut CallbackCollection<f64> {
        &mut self.life_hooks
    }

    /// HUD hook fired with the points of every score gain.
    pub fn on_points_added(&mut self) -> &mut CallbackCollection<u32> {
        &mut self.points_hooks
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Seconds per fixed step.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Set up a fresh scene and enter `Active`. On failure the world is
    /// cleared and the phase is left unchanged.
    pub fn start_game(&mut self) -> Result<()> {
        self.world.clear();
        match world_setup::setup_scene(&mut self.world) {
            Ok(scene) => {
                self.scene = Some(scene);
                self.score = 0;
                self.time = SimTime::default();
                self.accumulator = 0.0;
                self.set_phase(GamePhase::Active);
                Ok(())
            }
            Err(err) => {
                self.world.clear();
                self.scene = None;
                Err(err)
            }
        }
    }

    /// Feed elapsed wall-clock time and run as many whole steps as it
    /// covers; the remainder carries over. Outside `Active` the
    /// accumulator is dropped and only pending commands are processed.
    pub fn advance(&mut self, elapsed: f64) -> Vec<GameStateSnapshot> {
        if self.phase != GamePhase::Active {
            self.accumulator = 0.0;
            if self.command_queue.is_empty() {
                return Vec::new();
            }
            return vec![self.tick()];
        }

        self.accumulator += elapsed.max(0.0);
        let mut snapshots = Vec::new();
        while self.accumulator >= self.dt {
            self.accumulator -= self.dt;
            snapshots.push(self.tick());
            if self.phase != GamePhase::Active {
                self.accumulator = 0.0;
                break;
            }
        }
        snapshots
    }

    /// Time banked toward the next step.
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Advance the simulation by one step and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            self.world.place_viewpoint();
            self.world.update(self.dt);
            self.time.advance(self.dt);
            self.check_outcome();
        }

        let events = self.drain_events();
        systems::snapshot::build_snapshot(&self.world, &self.time, self.phase, self.score, events)
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::SetDirection { dx, dy } => self.with_controls(|controls| {
                controls.horizontal_speed = dx.clamp(-1.0, 1.0);
                controls.vertical_speed = (-dy).clamp(-1.0, 1.0);
            }),
            PlayerCommand::FireStart => self.with_controls(|controls| controls.is_shooting = true),
            PlayerCommand::FireEnd => self.with_controls(|controls| controls.is_shooting = false),
            PlayerCommand::AimAt { point } => self.with_controls(|controls| controls.aimed_point = point),
            PlayerCommand::StartGame => {
                if self.phase == GamePhase::MainMenu {
                    if let Err(err) = self.start_game() {
                        error!(%err, "failed to start game");
                    }
                }
            }
            PlayerCommand::RestartGame => {
                if self.phase != GamePhase::MainMenu {
                    if let Err(err) = self.start_game() {
                        error!(%err, "failed to restart game");
                    }
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.set_phase(GamePhase::Paused);
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.set_phase(GamePhase::Active);
                }
            }
        }
    }

    fn with_controls(&mut self, f: impl FnOnce(&mut ShipControls)) {
        let Some(ship) = self.scene.as_ref().map(|s| s.ship) else {
            return;
        };
        if let Ok(mut controls) = self.world.ecs.get::<&mut ShipControls>(ship) {
            f(&mut controls);
        }
    }

    /// Ship loss ends the game first; otherwise a dead boss wins it and
    /// takes every surviving vessel with it.
    fn check_outcome(&mut self) {
        let Some(scene) = &self.scene else {
            return;
        };
        let (ship, boss) = (scene.ship, scene.boss);

        if !self.world.is_active(ship) {
            self.with_controls(|controls| controls.is_shooting = false);
            self.set_phase(GamePhase::Lost);
            return;
        }
        if !self.world.is_active(boss) {
            for vessel in self.world.get_objects_of_type(EntityKind::Vessel) {
                self.world.damage(vessel, LETHAL_DAMAGE);
            }
            self.set_phase(GamePhase::Won);
        }
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase == phase {
            return;
        }
        info!(from = ?self.phase, to = ?phase, "phase change");
        self.phase = phase;
        self.pending_events.push(GameEvent::PhaseChanged { phase });
    }

    /// Collect the tick's events, firing the HUD hooks in emission order.
    fn drain_events(&mut self) -> Vec<GameEvent> {
        let mut events = self.world.drain_events();
        events.append(&mut self.pending_events);
        for event in &events {
            match *event {
                GameEvent::LifeChanged { mut life } => self.life_hooks.fire(&mut life),
                GameEvent::PointsAdded { mut points } => {
                    self.score += points;
                    self.points_hooks.fire(&mut points);
                }
                _ => {}
            }
        }
        events
    }
}
