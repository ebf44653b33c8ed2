// Player action definitions and default bindings

use glam::Vec2;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Every action a first-person player can perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Continuous
    Move,
    Look,

    // Buttons
    Jump,
    Fire,
    Aim,
    Sprint,
    Crouch,
    Reload,

    // Weapon switching
    SwitchWeaponAxis,
    SwitchWeaponNext,
    SwitchWeaponPrevious,
}

/// Lifecycle phase of an action, as reported by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputPhase {
    /// The control was just actuated
    Started,
    /// The control is held past the frame it started in
    Performed,
    /// The control was released
    Canceled,
}

/// Payload carried by an action event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionValue {
    Button,
    Axis2(Vec2),
}

impl ActionValue {
    /// Read the value as a 2D vector (buttons read as zero)
    pub fn as_vec2(&self) -> Vec2 {
        match self {
            Self::Button => Vec2::ZERO,
            Self::Axis2(v) => *v,
        }
    }
}

/// A single phase-tagged action event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionEvent {
    pub action: Action,
    pub phase: InputPhase,
    pub value: ActionValue,
}

impl ActionEvent {
    /// Create a button event
    pub fn button(action: Action, phase: InputPhase) -> Self {
        Self {
            action,
            phase,
            value: ActionValue::Button,
        }
    }

    /// Create a vector-valued event
    pub fn axis(action: Action, phase: InputPhase, value: Vec2) -> Self {
        Self {
            action,
            phase,
            value: ActionValue::Axis2(value),
        }
    }
}

/// Direction contributed by a movement key to the move composite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    Forward,
    Back,
    Left,
    Right,
}

impl MoveDirection {
    /// Unit vector of this direction (x = strafe, y = forward)
    pub fn vector(&self) -> Vec2 {
        match self {
            Self::Forward => Vec2::Y,
            Self::Back => Vec2::NEG_Y,
            Self::Left => Vec2::NEG_X,
            Self::Right => Vec2::X,
        }
    }
}

/// What an input source drives when bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    /// A button-like action (jump, fire, ...)
    Button(Action),
    /// One part of the movement composite
    Move(MoveDirection),
}

/// Represents an input source (keyboard key or mouse button)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard(KeyCode),
    Mouse(MouseButton),
}

impl InputSource {
    /// Create a keyboard input source
    pub fn key(code: KeyCode) -> Self {
        Self::Keyboard(code)
    }

    /// Create a mouse button input source
    pub fn mouse(button: MouseButton) -> Self {
        Self::Mouse(button)
    }
}

/// Default keyboard/mouse bindings
///
/// Look and the weapon-switch axis come from mouse motion and the wheel,
/// which are not bindable sources.
pub fn default_bindings() -> Vec<(InputSource, Binding)> {
    vec![
        // Movement (WASD)
        (InputSource::key(KeyCode::KeyW), Binding::Move(MoveDirection::Forward)),
        (InputSource::key(KeyCode::KeyS), Binding::Move(MoveDirection::Back)),
        (InputSource::key(KeyCode::KeyA), Binding::Move(MoveDirection::Left)),
        (InputSource::key(KeyCode::KeyD), Binding::Move(MoveDirection::Right)),
        // Movement modifiers
        (InputSource::key(KeyCode::Space), Binding::Button(Action::Jump)),
        (InputSource::key(KeyCode::ShiftLeft), Binding::Button(Action::Sprint)),
        (InputSource::key(KeyCode::ControlLeft), Binding::Button(Action::Crouch)),
        (InputSource::key(KeyCode::KeyC), Binding::Button(Action::Crouch)),
        // Weapon
        (InputSource::mouse(MouseButton::Left), Binding::Button(Action::Fire)),
        (InputSource::mouse(MouseButton::Right), Binding::Button(Action::Aim)),
        (InputSource::key(KeyCode::KeyR), Binding::Button(Action::Reload)),
        (InputSource::key(KeyCode::KeyE), Binding::Button(Action::SwitchWeaponNext)),
        (InputSource::key(KeyCode::KeyQ), Binding::Button(Action::SwitchWeaponPrevious)),
    ]
}
