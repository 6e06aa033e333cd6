use serde::Serialize;
use strum::Display;

/// Coarse state of the game client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display)]
pub enum GameState {
    #[default]
    Unknown,
    /// Menus, loading screens or character select
    OutOfGame,
    InGame,
    Paused,
}

impl GameState {
    pub fn from_flags(in_game: bool, paused: bool) -> Self {
        match (in_game, paused) {
            (false, _) => Self::OutOfGame,
            (true, true) => Self::Paused,
            (true, false) => Self::InGame,
        }
    }

    /// Whether kill scans are meaningful in this state
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::InGame | Self::Paused)
    }
}

/// Reports state changes between polls
#[derive(Debug, Default)]
pub struct GameStateDetector {
    last_state: GameState,
}

impl GameStateDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one poll; returns the new state if it differs from the last one
    pub fn update(&mut self, in_game: bool, paused: bool) -> Option<GameState> {
        let state = GameState::from_flags(in_game, paused);
        if state == self.last_state {
            return None;
        }
        self.last_state = state;
        Some(state)
    }

    /// Forget the last state (e.g. after reattaching to the process)
    pub fn reset(&mut self) {
        self.last_state = GameState::Unknown;
    }

    pub fn last_state(&self) -> GameState {
        self.last_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(GameState::from_flags(false, true), GameState::OutOfGame);
        assert_eq!(GameState::from_flags(true, true), GameState::Paused);
        assert!(GameState::from_flags(true, false).is_playing());
    }

    #[test]
    fn test_detector_reports_changes_only() {
        let mut detector = GameStateDetector::new();
        assert_eq!(detector.update(false, false), Some(GameState::OutOfGame));
        assert_eq!(detector.update(false, false), None);
        assert_eq!(detector.update(true, false), Some(GameState::InGame));
        assert_eq!(detector.update(true, true), Some(GameState::Paused));

        detector.reset();
        assert_eq!(detector.last_state(), GameState::Unknown);
        assert_eq!(detector.update(true, true), Some(GameState::Paused));
    }
}
