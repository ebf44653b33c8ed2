// Input handling system
//
// Turns raw keyboard/mouse input into phase-tagged actions and aggregates them
// into the per-frame values the player controller reads.
//
// ## Architecture
//
// - `action`: Actions, phases, events and default bindings
// - `config`: Tunable settings and remappable bindings
// - `dispatcher`: Raw device input -> `ActionEvent`s
// - `handler`: Gated input state read by the player controller
//
// ## Usage Example
//
// ```rust
// use engine::input::{ActionDispatcher, PlayerInputHandler};
//
// let mut dispatcher = ActionDispatcher::default();
// let mut handler = PlayerInputHandler::new(settings, Some(game_flow));
//
// // In your event loop, feed raw events
// dispatcher.process_keyboard_event(&key_event);
//
// // Once per frame, before reading
// dispatcher.begin_frame();
// handler.set_delta_time(dt);
// dispatcher.dispatch(&mut handler);
//
// if handler.take_jump_input_down() {
//     // Jump exactly once per press
// }
// ```

pub mod action;
pub mod config;
pub mod dispatcher;
pub mod handler;

// Re-export commonly used types
pub use config::{InputConfig, InputSettings};
pub use dispatcher::ActionDispatcher;
pub use handler::PlayerInputHandler;

/// Game-flow state the input handler is gated on
pub trait GameFlowGate {
    /// True once the game has entered its ending sequence
    fn is_game_ending(&self) -> bool;
}

/// Input configuration errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Expected to find a {requested} for {requester}, but none was provided")]
    MissingDependency {
        requested: &'static str,
        requester: &'static str,
    },
}
