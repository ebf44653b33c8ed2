// Action dispatcher - turns raw device input into phase-tagged action events

use std::collections::{HashMap, HashSet, VecDeque};

use glam::Vec2;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::action::{Action, ActionEvent, Binding, InputPhase, InputSource, MoveDirection};
use super::config::{InputConfig, InputSettings};
use super::handler::PlayerInputHandler;

/// Pixels of touchpad scrolling that count as one wheel line
const PIXELS_PER_LINE: f64 = 40.0;

/// Collects raw input and emits `ActionEvent`s in arrival order
///
/// Button lifecycle: press queues `Started`; if the button is still held at the
/// first `begin_frame` after that event was drained, `Performed` is queued;
/// release queues `Canceled`. A button released before its `Started` was
/// drained gets its `Canceled` held back until the next `begin_frame`, so a tap
/// inside one frame is still visible for one frame.
///
/// Mouse motion and wheel are accumulated between frames and emitted once per
/// `begin_frame`, followed by a zero `Canceled` event on the first frame
/// without movement.
pub struct ActionDispatcher {
    config: InputConfig,

    /// Physical sources currently down (filters duplicate press/release)
    held_sources: HashSet<InputSource>,
    /// Number of held sources per button action
    button_holds: HashMap<Action, u32>,
    /// Number of held sources per move direction
    move_holds: HashMap<MoveDirection, u32>,
    /// Analog controls currently past the trigger threshold
    analog_pressed: HashSet<Action>,

    /// Started but not yet drained
    started_pending: Vec<Action>,
    /// Started, drained, and waiting to be promoted to performed
    started_delivered: Vec<Action>,
    /// Released before their `Started` was drained
    cancel_pending: Vec<Action>,
    /// Released taps whose `Started` has been drained
    cancel_ready: Vec<Action>,

    last_move: Vec2,
    look_accum: Vec2,
    look_active: bool,
    wheel_accum: f32,
    wheel_active: bool,
    /// Touchpad pixels not yet worth a whole line
    pixel_scroll_remainder: f64,

    queue: VecDeque<ActionEvent>,
}

impl ActionDispatcher {
    /// Create a dispatcher with the given bindings
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            held_sources: HashSet::new(),
            button_holds: HashMap::new(),
            move_holds: HashMap::new(),
            analog_pressed: HashSet::new(),
            started_pending: Vec::new(),
            started_delivered: Vec::new(),
            cancel_pending: Vec::new(),
            cancel_ready: Vec::new(),
            last_move: Vec2::ZERO,
            look_accum: Vec2::ZERO,
            look_active: false,
            wheel_accum: 0.0,
            wheel_active: false,
            pixel_scroll_remainder: 0.0,
            queue: VecDeque::new(),
        }
    }

    #[allow(dead_code)]
    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    #[allow(dead_code)]
    pub fn config_mut(&mut self) -> &mut InputConfig {
        &mut self.config
    }

    //--- Raw input ----------------------------------------------------------

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(key_code) = event.physical_key {
            self.process_key(key_code, event.state, event.repeat);
        }
    }

    /// Process a key transition
    pub fn process_key(&mut self, key_code: KeyCode, state: ElementState, repeat: bool) {
        if repeat && state == ElementState::Pressed {
            return;
        }
        self.process_source(InputSource::key(key_code), state);
    }

    /// Process a mouse button transition
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        self.process_source(InputSource::mouse(button), state);
    }

    /// Accumulate raw mouse motion (winit y grows downward)
    pub fn process_mouse_motion(&mut self, dx: f64, dy: f64) {
        self.look_accum += Vec2::new(dx as f32, -dy as f32);
    }

    /// Accumulate mouse wheel scrolling
    /// Touchpad pixels carry over between frames until they add up to a line
    pub fn process_mouse_wheel(&mut self, delta: MouseScrollDelta) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(position) => {
                self.pixel_scroll_remainder += position.y;
                let whole = (self.pixel_scroll_remainder / PIXELS_PER_LINE).trunc();
                self.pixel_scroll_remainder -= whole * PIXELS_PER_LINE;
                whole as f32
            }
        };
        self.wheel_accum += lines;
    }

    /// Process an analog trigger value in [0, 1] driving a button action
    ///
    /// The threshold is read from `settings` on every call, so pass the
    /// handler's live settings.
    // Gamepad triggers; winit does not report gamepads
    #[allow(dead_code)]
    pub fn process_trigger(&mut self, action: Action, value: f32, settings: &InputSettings) {
        let actuated = value >= settings.trigger_axis_threshold;
        let was_actuated = self.analog_pressed.contains(&action);

        if actuated && !was_actuated {
            self.analog_pressed.insert(action);
            self.press_button(action);
        } else if !actuated && was_actuated {
            self.analog_pressed.remove(&action);
            self.release_button(action);
        }
    }

    fn process_source(&mut self, source: InputSource, state: ElementState) {
        let Some(binding) = self.config.get_binding(source) else {
            return;
        };

        match state {
            ElementState::Pressed => {
                if !self.held_sources.insert(source) {
                    return;
                }
                match binding {
                    Binding::Button(action) => self.press_button(action),
                    Binding::Move(direction) => {
                        *self.move_holds.entry(direction).or_insert(0) += 1;
                        self.update_move();
                    }
                }
            }
            ElementState::Released => {
                if !self.held_sources.remove(&source) {
                    return;
                }
                match binding {
                    Binding::Button(action) => self.release_button(action),
                    Binding::Move(direction) => {
                        if let Some(count) = self.move_holds.get_mut(&direction) {
                            *count = count.saturating_sub(1);
                        }
                        self.update_move();
                    }
                }
            }
        }
    }

    fn press_button(&mut self, action: Action) {
        let holds = self.button_holds.entry(action).or_insert(0);
        *holds += 1;
        if *holds == 1 {
            // A new press supersedes a tap still waiting to be canceled
            self.cancel_pending.retain(|a| *a != action);
            self.cancel_ready.retain(|a| *a != action);
            self.started_pending.retain(|a| *a != action);
            self.started_pending.push(action);
            self.push(ActionEvent::button(action, InputPhase::Started));
        }
    }

    fn release_button(&mut self, action: Action) {
        let Some(holds) = self.button_holds.get_mut(&action) else {
            return;
        };
        *holds = holds.saturating_sub(1);
        if *holds == 0 {
            self.button_holds.remove(&action);
            self.started_delivered.retain(|a| *a != action);

            if let Some(pos) = self.started_pending.iter().position(|a| *a == action) {
                self.started_pending.remove(pos);
                self.cancel_pending.push(action);
            } else {
                self.push(ActionEvent::button(action, InputPhase::Canceled));
            }
        }
    }

    fn update_move(&mut self) {
        let composite = self
            .move_holds
            .iter()
            .filter(|(_, count)| **count > 0)
            .fold(Vec2::ZERO, |acc, (direction, _)| acc + direction.vector());

        if composite == self.last_move {
            return;
        }
        self.last_move = composite;

        let phase = if composite == Vec2::ZERO {
            InputPhase::Canceled
        } else {
            InputPhase::Performed
        };
        self.push(ActionEvent::axis(Action::Move, phase, composite));
    }

    //--- Frame boundary -----------------------------------------------------

    /// Start a new frame: promote held buttons and flush accumulated motion
    /// Call this once per frame before `drain`/`dispatch`
    pub fn begin_frame(&mut self) {
        for action in std::mem::take(&mut self.cancel_ready) {
            self.push(ActionEvent::button(action, InputPhase::Canceled));
        }

        for action in std::mem::take(&mut self.started_delivered) {
            self.push(ActionEvent::button(action, InputPhase::Performed));
        }

        let look = std::mem::take(&mut self.look_accum);
        if look != Vec2::ZERO {
            self.look_active = true;
            self.push(ActionEvent::axis(Action::Look, InputPhase::Performed, look));
        } else if self.look_active {
            self.look_active = false;
            self.push(ActionEvent::axis(Action::Look, InputPhase::Canceled, Vec2::ZERO));
        }

        let wheel = std::mem::take(&mut self.wheel_accum);
        if wheel != 0.0 {
            self.wheel_active = true;
            self.push(ActionEvent::axis(
                Action::SwitchWeaponAxis,
                InputPhase::Performed,
                Vec2::new(0.0, wheel),
            ));
        } else if self.wheel_active {
            self.wheel_active = false;
            self.push(ActionEvent::axis(
                Action::SwitchWeaponAxis,
                InputPhase::Canceled,
                Vec2::ZERO,
            ));
        }
    }

    /// Take all queued events in arrival order
    pub fn drain(&mut self) -> Vec<ActionEvent> {
        self.started_delivered.append(&mut self.started_pending);
        self.cancel_ready.append(&mut self.cancel_pending);
        self.queue.drain(..).collect()
    }

    /// Drain queued events into the handler
    pub fn dispatch(&mut self, handler: &mut PlayerInputHandler) {
        for event in self.drain() {
            handler.handle_event(&event);
        }
    }

    /// Number of events waiting to be drained
    #[allow(dead_code)]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Release everything currently held, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        let held: Vec<Action> = self.button_holds.keys().copied().collect();
        for action in held {
            self.button_holds.insert(action, 1);
            self.release_button(action);
        }
        self.held_sources.clear();
        self.analog_pressed.clear();
        self.move_holds.clear();
        self.update_move();
        log::debug!("Released all held input");
    }

    fn push(&mut self, event: ActionEvent) {
        log::trace!("{:?} {:?}", event.action, event.phase);
        self.queue.push_back(event);
    }
}

impl Default for ActionDispatcher {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}
