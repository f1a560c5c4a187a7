//! Scripted pilot for headless runs: starts the game, holds the trigger
//! on the boss and circle-strafes, reversing direction periodically.

use glam::DVec3;

use proxemy_core::commands::PlayerCommand;

#[derive(Debug, Clone)]
pub struct ScriptedPilot {
    /// Steps between two direction reversals.
    strafe_period: u64,
    climb: f64,
}

impl ScriptedPilot {
    pub fn new(strafe_period: u64, climb: f64) -> Self {
        Self {
            strafe_period: strafe_period.max(1),
            climb: climb.clamp(-1.0, 1.0),
        }
    }

    /// Commands to queue before step `step`.
    pub fn commands(&self, step: u64) -> Vec<PlayerCommand> {
        let mut commands = Vec::new();
        if step == 0 {
            commands.push(PlayerCommand::StartGame);
            commands.push(PlayerCommand::AimAt { point: DVec3::ZERO });
            commands.push(PlayerCommand::FireStart);
        }
        if step % self.strafe_period == 0 {
            let dx = if (step / self.strafe_period) % 2 == 0 { 1.0 } else { -1.0 };
            commands.push(PlayerCommand::SetDirection { dx, dy: self.climb });
        }
        commands
    }
}

impl Default for ScriptedPilot {
    fn default() -> Self {
        Self::new(120, 0.25)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pilot_opens_with_start_and_fire() {
        let commands = ScriptedPilot::default().commands(0);
        assert!(matches!(commands[0], PlayerCommand::StartGame));
        assert!(commands.iter().any(|c| matches!(c, PlayerCommand::FireStart)));
    }

    #[test]
    fn test_pilot_reverses_strafe() {
        let pilot = ScriptedPilot::new(10, 0.0);
        assert!(pilot.commands(5).is_empty());
        let direction = |step| match pilot.commands(step).last() {
            Some(PlayerCommand::SetDirection { dx, .. }) => *dx,
            other => panic!("expected a direction, got {other:?}"),
        };
        assert_eq!(direction(10), -1.0);
        assert_eq!(direction(20), 1.0);
    }
}
