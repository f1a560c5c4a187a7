//! Control surface over a running game loop.
//!
//! These functions bridge a frontend (here, the CLI) to the game loop
//! thread through the session kept in [`AppState`].

use anyhow::{anyhow, bail, Context};

use proxemy_core::commands::PlayerCommand;
use proxemy_core::config::GameConfig;
use proxemy_core::state::GameStateSnapshot;

use crate::game_loop;
use crate::state::{AppState, LoopMessage, Session};

/// Start the simulation. Fails if a loop is already running.
pub fn start_simulation(state: &AppState, config: GameConfig) -> anyhow::Result<()> {
    let mut session = state.session.lock().map_err(|e| anyhow!("{e}"))?;
    if session.is_some() {
        bail!("simulation already running");
    }

    let (inbox, thread) = game_loop::spawn_game_loop(config, state.snapshots.clone())?;
    *session = Some(Session { inbox, thread });
    Ok(())
}

/// Send a player command to the simulation.
pub fn send_command(state: &AppState, command: PlayerCommand) -> anyhow::Result<()> {
    let session = state.session.lock().map_err(|e| anyhow!("{e}"))?;
    let session = session.as_ref().context("simulation not started")?;
    session
        .inbox
        .send(LoopMessage::Player(command))
        .context("game loop is gone")
}

/// Latest snapshot, if the loop has produced one.
pub fn get_snapshot(state: &AppState) -> Option<GameStateSnapshot> {
    state.snapshots.latest()
}

/// Ask the loop to shut down and wait for its thread. No-op when stopped.
pub fn stop_simulation(state: &AppState) -> anyhow::Result<()> {
    let Some(session) = state.session.lock().map_err(|e| anyhow!("{e}"))?.take() else {
        return Ok(());
    };
    // A closed channel means the loop already left.
    let _ = session.inbox.send(LoopMessage::Shutdown);
    session
        .thread
        .join()
        .map_err(|_| anyhow!("game loop thread panicked"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_before_start_fails() {
        let state = AppState::new();
        assert!(send_command(&state, PlayerCommand::StartGame).is_err());
        assert!(get_snapshot(&state).is_none());
    }

    #[test]
    fn test_start_twice_fails_and_stop_is_idempotent() {
        let state = AppState::new();
        start_simulation(&state, GameConfig::default()).unwrap();
        assert!(state.is_running());
        assert!(start_simulation(&state, GameConfig::default()).is_err());
        send_command(&state, PlayerCommand::StartGame).unwrap();

        stop_simulation(&state).unwrap();
        stop_simulation(&state).unwrap();
        assert!(!state.is_running());
        assert!(send_command(&state, PlayerCommand::Pause).is_err());
    }

    #[test]
    fn test_restart_after_stop() {
        let state = AppState::new();
        start_simulation(&state, GameConfig::default()).unwrap();
        stop_simulation(&state).unwrap();
        start_simulation(&state, GameConfig::default()).unwrap();
        assert!(state.is_running());
        stop_simulation(&state).unwrap();
    }
}
