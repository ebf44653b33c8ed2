// Gameplay side of the input layer
//
// - Game flow state the input handler is gated on
// - The first-person controller that consumes input each frame

pub mod controller;
pub mod flow;

// Re-export commonly used types
pub use controller::{ControllerStats, PlayerController};
pub use flow::GameFlowManager;
