//! State shared between the controlling thread and the game loop thread.
//!
//! The controlling side owns an [`AppState`]: a [`SnapshotSlot`] the loop
//! publishes into, and the [`Session`] of the loop currently running, if
//! any. A session exists exactly while a loop thread has been started and
//! not yet stopped.

use std::sync::mpsc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use proxemy_core::commands::PlayerCommand;
use proxemy_core::state::GameStateSnapshot;

/// Messages accepted by the game loop thread.
#[derive(Debug)]
pub enum LoopMessage {
    /// Queue a player command for the next step.
    Player(PlayerCommand),
    /// Leave the loop before running any further step.
    Shutdown,
}

/// Most recent snapshot published by the loop. Clones share the slot.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSlot {
    latest: Arc<Mutex<Option<GameStateSnapshot>>>,
}

impl SnapshotSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the published snapshot.
    pub fn publish(&self, snapshot: GameStateSnapshot) {
        *self.lock() = Some(snapshot);
    }

    pub fn latest(&self) -> Option<GameStateSnapshot> {
        self.lock().clone()
    }

    /// Tick of the published snapshot, 0 before the first one.
    pub fn tick(&self) -> u64 {
        self.lock().as_ref().map_or(0, |snapshot| snapshot.time.tick)
    }

    // A panic while publishing cannot leave a half-written snapshot behind,
    // so a poisoned slot is still readable.
    fn lock(&self) -> MutexGuard<'_, Option<GameStateSnapshot>> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A started game loop: where to send it messages and how to wait for it.
#[derive(Debug)]
pub struct Session {
    pub inbox: mpsc::Sender<LoopMessage>,
    pub thread: JoinHandle<()>,
}

#[derive(Debug, Default)]
pub struct AppState {
    pub snapshots: SnapshotSlot,
    pub session: Mutex<Option<Session>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.session
            .lock()
            .map(|session| session.is_some())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxemy_core::config::GameConfig;
    use proxemy_sim::SimulationEngine;

    #[test]
    fn test_new_state_has_no_session() {
        let state = AppState::new();
        assert!(!state.is_running());
        assert!(state.snapshots.latest().is_none());
        assert_eq!(state.snapshots.tick(), 0);
    }

    #[test]
    fn test_slot_clones_share_snapshots() {
        let slot = SnapshotSlot::new();
        let loop_side = slot.clone();

        let mut engine = SimulationEngine::new(GameConfig::default());
        engine.queue_command(PlayerCommand::StartGame);
        engine.tick();
        loop_side.publish(engine.tick());

        assert_eq!(slot.tick(), 2);
        assert_eq!(slot.latest().map(|s| s.time.tick), Some(2));
    }
}
