// Game flow state shared with the input layer

use std::cell::Cell;

use crate::engine::input::GameFlowGate;

/// Tracks whether the match is over
///
/// Shared through `Rc`; state changes go through `Cell` since everything
/// runs on the main thread.
#[derive(Debug, Default)]
pub struct GameFlowManager {
    game_is_ending: Cell<bool>,
}

impl GameFlowManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the ending sequence; player input is disabled from now on
    pub fn end_game(&self) {
        if !self.game_is_ending.replace(true) {
            log::info!("Game ending, player input disabled");
        }
    }

    pub fn game_is_ending(&self) -> bool {
        self.game_is_ending.get()
    }
}

impl GameFlowGate for GameFlowManager {
    fn is_game_ending(&self) -> bool {
        self.game_is_ending()
    }
}
