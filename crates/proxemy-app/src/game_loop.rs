//! Game loop thread: feeds wall-clock time to the engine, which runs as
//! many fixed steps as it covers, and publishes the latest snapshot.
//!
//! The engine is created inside the thread so it never crosses a thread
//! boundary. Messages arrive over an `mpsc` channel and are drained before
//! every frame; a `Shutdown` ends the loop before any further step runs.

use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::Context;
use tracing::{debug, info};

use proxemy_core::config::GameConfig;
use proxemy_core::enums::GamePhase;
use proxemy_core::events::GameEvent;
use proxemy_sim::SimulationEngine;

use crate::state::{LoopMessage, SnapshotSlot};

/// How the loop ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopExit {
    pub phase: GamePhase,
    pub score: u32,
    /// Steps run over the loop's lifetime.
    pub ticks: u64,
    /// Simulated time left over that did not make a whole step.
    pub carried: f64,
}

/// Spawn the game loop in a new thread.
///
/// Returns the loop's inbox and the thread handle.
pub fn spawn_game_loop(
    config: GameConfig,
    snapshots: SnapshotSlot,
) -> anyhow::Result<(mpsc::Sender<LoopMessage>, JoinHandle<()>)> {
    let (inbox, messages) = mpsc::channel::<LoopMessage>();

    let handle = std::thread::Builder::new()
        .name("proxemy-game-loop".into())
        .spawn(move || {
            run_game_loop(config, &messages, &snapshots);
        })
        .context("failed to spawn game loop thread")?;

    Ok((inbox, handle))
}

/// Nominal wall-clock duration of one step.
pub fn tick_duration(config: &GameConfig) -> Duration {
    Duration::from_secs_f64(config.dt())
}

/// Run until `Shutdown` arrives or every sender is dropped.
pub(crate) fn run_game_loop(
    config: GameConfig,
    messages: &mpsc::Receiver<LoopMessage>,
    snapshots: &SnapshotSlot,
) -> LoopExit {
    let step = tick_duration(&config);
    let mut engine = SimulationEngine::new(config);
    let mut last_frame = Instant::now();
    let mut next_frame = last_frame;
    info!(?step, "game loop started");

    loop {
        if !drain_messages(&mut engine, messages) {
            let exit = LoopExit {
                phase: engine.phase(),
                score: engine.score(),
                ticks: engine.time().tick,
                carried: engine.accumulator(),
            };
            info!(?exit, "game loop stopped");
            return exit;
        }

        let now = Instant::now();
        let elapsed = now.duration_since(last_frame).as_secs_f64();
        last_frame = now;
        for snapshot in engine.advance(elapsed) {
            log_events(&snapshot.events);
            snapshots.publish(snapshot);
        }

        next_frame += step;
        let now = Instant::now();
        if next_frame > now {
            std::thread::sleep(next_frame - now);
        } else if now - next_frame > step * 2 {
            // Too far behind: drop the backlog instead of spiralling.
            next_frame = now;
        }
    }
}

/// Queue pending player commands. Returns false once the loop must stop.
fn drain_messages(engine: &mut SimulationEngine, messages: &mpsc::Receiver<LoopMessage>) -> bool {
    loop {
        match messages.try_recv() {
            Ok(LoopMessage::Player(command)) => engine.queue_command(command),
            Ok(LoopMessage::Shutdown) => return false,
            Err(mpsc::TryRecvError::Disconnected) => {
                debug!("all senders dropped");
                return false;
            }
            Err(mpsc::TryRecvError::Empty) => return true,
        }
    }
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::PhaseChanged { phase } => info!(?phase, "phase changed"),
            GameEvent::BossDestroyed { .. } => info!("boss destroyed"),
            GameEvent::ShipDestroyed { .. } => info!("ship destroyed"),
            GameEvent::Explosion { .. } | GameEvent::PointsAdded { .. } => {}
            other => debug!(?other, "game event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxemy_core::commands::PlayerCommand;

    #[test]
    fn test_shutdown_stops_before_any_step() {
        let (inbox, messages) = mpsc::channel();
        inbox.send(LoopMessage::Player(PlayerCommand::StartGame)).unwrap();
        inbox.send(LoopMessage::Shutdown).unwrap();
        inbox.send(LoopMessage::Player(PlayerCommand::Pause)).unwrap();

        let snapshots = SnapshotSlot::new();
        let exit = run_game_loop(GameConfig::default(), &messages, &snapshots);

        assert_eq!(exit.ticks, 0, "Queued StartGame never reached a step");
        assert_eq!(exit.phase, GamePhase::MainMenu);
        assert!(snapshots.latest().is_none(), "Nothing published");
        assert!(
            matches!(messages.try_recv(), Ok(LoopMessage::Player(PlayerCommand::Pause))),
            "Messages after Shutdown stay unread"
        );
    }

    #[test]
    fn test_dropped_sender_stops_loop() {
        let (inbox, messages) = mpsc::channel::<LoopMessage>();
        drop(inbox);
        let exit = run_game_loop(GameConfig::default(), &messages, &SnapshotSlot::new());
        assert_eq!(exit.ticks, 0);
        assert_eq!(exit.carried, 0.0);
    }

    #[test]
    fn test_loop_publishes_snapshots() {
        let snapshots = SnapshotSlot::new();
        let (inbox, handle) = spawn_game_loop(GameConfig::default(), snapshots.clone()).unwrap();
        inbox.send(LoopMessage::Player(PlayerCommand::StartGame)).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline && snapshots.tick() < 10 {
            std::thread::sleep(Duration::from_millis(20));
        }
        inbox.send(LoopMessage::Shutdown).unwrap();
        handle.join().unwrap();

        let snap = snapshots.latest().expect("snapshot published");
        assert_eq!(snap.phase, GamePhase::Active);
        assert!(snap.time.tick >= 10, "Loop kept stepping");
    }

    #[test]
    fn test_carry_stays_below_one_step() {
        let config = GameConfig::default();
        let dt = config.dt();
        let (inbox, messages) = mpsc::channel();
        inbox.send(LoopMessage::Player(PlayerCommand::StartGame)).unwrap();

        let snapshots = SnapshotSlot::new();
        let reader = snapshots.clone();
        let stopper = std::thread::spawn(move || {
            let deadline = Instant::now() + Duration::from_secs(5);
            while Instant::now() < deadline && reader.tick() < 5 {
                std::thread::sleep(Duration::from_millis(5));
            }
            inbox.send(LoopMessage::Shutdown).unwrap();
        });
        let exit = run_game_loop(config, &messages, &snapshots);
        stopper.join().unwrap();

        assert!(exit.ticks >= 5);
        assert_eq!(exit.ticks, snapshots.tick(), "Every step was published");
        assert!(
            (0.0..dt).contains(&exit.carried),
            "Leftover {} is less than a step",
            exit.carried
        );
    }

    #[test]
    fn test_tick_duration_follows_rate() {
        let mut config = GameConfig::default();
        assert_eq!(tick_duration(&config), Duration::from_secs_f64(1.0 / 60.0));
        config.tick_rate = 30;
        assert_eq!(tick_duration(&config), Duration::from_secs_f64(1.0 / 30.0));
    }
}
