// Player input handler - gated, per-frame view of dispatched actions

use std::rc::Rc;

use glam::{Vec2, Vec3};

use super::action::{Action, ActionEvent, InputPhase};
use super::config::InputSettings;
use super::{GameFlowGate, InputError};
use crate::core::math::{sign_step, to_ground_plane};

/// Raw state written by the event handlers
#[derive(Debug, Default)]
struct InputSnapshot {
    move_axis: Vec3,
    look_delta: Vec2,

    jump_down: bool,
    jump_held: bool,
    fire_start: bool,
    fire_end: bool,
    fire_process: bool,
    aim_held: bool,
    sprint_held: bool,
    crouch_start: bool,
    crouch_end: bool,
    reload_start: bool,

    weapon_switch_direct: i32,
    weapon_switch_axis: i32,
}

/// Aggregates action events into the values a player controller reads
///
/// Event handlers (`on_*`) only write state. Accessors return neutral values
/// whenever [`can_process_input`](Self::can_process_input) is false.
///
/// Most edge flags stay set until the next event for the same action
/// overwrites them. Jump is the exception: [`take_jump_input_down`](Self::take_jump_input_down)
/// clears it on the first successful read.
pub struct PlayerInputHandler {
    settings: InputSettings,
    game_flow: Option<Rc<dyn GameFlowGate>>,
    delta_time: f32,
    state: InputSnapshot,
}

impl PlayerInputHandler {
    /// Create a handler gated by `game_flow`
    ///
    /// A missing game flow is a configuration error: it is logged and the
    /// handler reports no processable input.
    pub fn new(settings: InputSettings, game_flow: Option<Rc<dyn GameFlowGate>>) -> Self {
        if game_flow.is_none() {
            let err = InputError::MissingDependency {
                requested: "GameFlowManager",
                requester: "PlayerInputHandler",
            };
            log::error!("{}", err);
        }

        Self {
            settings,
            game_flow,
            delta_time: 0.0,
            state: InputSnapshot::default(),
        }
    }

    pub fn settings(&self) -> &InputSettings {
        &self.settings
    }

    #[allow(dead_code)]
    pub fn settings_mut(&mut self) -> &mut InputSettings {
        &mut self.settings
    }

    /// Set the frame time used to scale look input
    /// Call this at the start of each frame, before dispatching events
    pub fn set_delta_time(&mut self, delta_time: f32) {
        self.delta_time = delta_time;
    }

    /// Whether accessors currently report input
    pub fn can_process_input(&self) -> bool {
        match &self.game_flow {
            Some(flow) => !flow.is_game_ending(),
            None => false,
        }
    }

    /// Route a dispatched event to its handler
    pub fn handle_event(&mut self, event: &ActionEvent) {
        let phase = event.phase;
        match event.action {
            Action::Move => self.on_move(event.value.as_vec2()),
            Action::Look => self.on_look(event.value.as_vec2()),
            Action::Jump => self.on_jump(phase),
            Action::Fire => self.on_fire(phase),
            Action::Aim => self.on_aim(phase),
            Action::Sprint => self.on_sprint(phase),
            Action::Crouch => self.on_crouch(phase),
            Action::Reload => self.on_reload(phase),
            Action::SwitchWeaponAxis => self.on_switch_weapon_axis(event.value.as_vec2()),
            Action::SwitchWeaponNext => self.on_switch_weapon_next(phase),
            Action::SwitchWeaponPrevious => self.on_switch_weapon_previous(phase),
        }
    }

    //--- Event handlers ---------------------------------------------------

    pub fn on_move(&mut self, value: Vec2) {
        self.state.move_axis = to_ground_plane(value);
    }

    /// Each call overwrites the previous look delta
    pub fn on_look(&mut self, value: Vec2) {
        let mut look = value;
        if self.settings.invert_y_axis {
            look.y = -look.y;
        }
        if self.settings.invert_x_axis {
            look.x = -look.x;
        }
        look *= self.settings.effective_look_sensitivity();
        look *= self.delta_time;
        self.state.look_delta = look;
    }

    pub fn on_jump(&mut self, phase: InputPhase) {
        if phase == InputPhase::Started {
            self.state.jump_down = true;
        }
        self.state.jump_held = phase == InputPhase::Performed;
    }

    pub fn on_fire(&mut self, phase: InputPhase) {
        self.state.fire_start = phase == InputPhase::Started;
        self.state.fire_end = phase == InputPhase::Canceled;
        self.state.fire_process = phase == InputPhase::Performed;
    }

    pub fn on_aim(&mut self, phase: InputPhase) {
        self.state.aim_held = phase == InputPhase::Performed;
    }

    pub fn on_sprint(&mut self, phase: InputPhase) {
        self.state.sprint_held = phase == InputPhase::Performed;
    }

    pub fn on_crouch(&mut self, phase: InputPhase) {
        self.state.crouch_start = phase == InputPhase::Started;
        self.state.crouch_end = phase == InputPhase::Canceled;
    }

    pub fn on_reload(&mut self, phase: InputPhase) {
        self.state.reload_start = phase == InputPhase::Started;
    }

    pub fn on_switch_weapon_axis(&mut self, value: Vec2) {
        self.state.weapon_switch_axis = sign_step(value.y);
    }

    pub fn on_switch_weapon_next(&mut self, phase: InputPhase) {
        self.set_direct_switch(phase, 1);
    }

    pub fn on_switch_weapon_previous(&mut self, phase: InputPhase) {
        self.set_direct_switch(phase, -1);
    }

    // Next and previous share one slot; the latest call wins
    fn set_direct_switch(&mut self, phase: InputPhase, step: i32) {
        self.state.weapon_switch_direct = if phase == InputPhase::Started { step } else { 0 };
    }

    //--- Accessors --------------------------------------------------------

    /// Movement on the ground plane (x = strafe, z = forward)
    pub fn move_input(&self) -> Vec3 {
        if self.can_process_input() {
            self.state.move_axis
        } else {
            Vec3::ZERO
        }
    }

    pub fn look_input_horizontal(&self) -> f32 {
        if self.can_process_input() {
            self.state.look_delta.x
        } else {
            0.0
        }
    }

    pub fn look_input_vertical(&self) -> f32 {
        if self.can_process_input() {
            self.state.look_delta.y
        } else {
            0.0
        }
    }

    /// Returns true once per jump press, clearing the flag
    ///
    /// While input is gated off the flag is left untouched.
    pub fn take_jump_input_down(&mut self) -> bool {
        if !self.can_process_input() {
            return false;
        }
        std::mem::take(&mut self.state.jump_down)
    }

    pub fn jump_input_held(&self) -> bool {
        self.can_process_input() && self.state.jump_held
    }

    pub fn fire_input_down(&self) -> bool {
        self.can_process_input() && self.state.fire_start
    }

    pub fn fire_input_released(&self) -> bool {
        self.can_process_input() && self.state.fire_end
    }

    pub fn fire_input_held(&self) -> bool {
        self.can_process_input() && self.state.fire_process
    }

    pub fn aim_input_held(&self) -> bool {
        self.can_process_input() && self.state.aim_held
    }

    pub fn sprint_input_held(&self) -> bool {
        self.can_process_input() && self.state.sprint_held
    }

    pub fn crouch_input_down(&self) -> bool {
        self.can_process_input() && self.state.crouch_start
    }

    pub fn crouch_input_released(&self) -> bool {
        self.can_process_input() && self.state.crouch_end
    }

    pub fn reload_button_down(&self) -> bool {
        self.can_process_input() && self.state.reload_start
    }

    /// Weapon switch step (-1, 0, +1)
    /// Next/previous buttons take priority over the scroll axis
    pub fn switch_weapon_input(&self) -> i32 {
        if !self.can_process_input() {
            return 0;
        }

        if self.state.weapon_switch_direct != 0 {
            self.state.weapon_switch_direct
        } else {
            self.state.weapon_switch_axis
        }
    }

    /// Direct weapon slot selection
    ///
    /// Slot keys are not mapped, so there is never a selection.
    pub fn select_weapon_input(&self) -> Option<usize> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::Cell;

    struct TestFlow {
        ending: Cell<bool>,
    }

    impl GameFlowGate for TestFlow {
        fn is_game_ending(&self) -> bool {
            self.ending.get()
        }
    }

    fn open_handler() -> (PlayerInputHandler, Rc<TestFlow>) {
        let flow = Rc::new(TestFlow {
            ending: Cell::new(false),
        });
        let gate: Rc<dyn GameFlowGate> = flow.clone();
        let mut handler = PlayerInputHandler::new(InputSettings::default(), Some(gate));
        handler.set_delta_time(1.0);
        (handler, flow)
    }

    #[test]
    fn test_gate_open() {
        let (handler, _flow) = open_handler();
        assert!(handler.can_process_input());
    }

    #[test]
    fn test_gate_closed_without_game_flow() {
        let mut handler = PlayerInputHandler::new(InputSettings::default(), None);
        handler.on_move(Vec2::new(1.0, 0.0));
        handler.on_fire(InputPhase::Started);

        assert!(!handler.can_process_input());
        assert_eq!(handler.move_input(), Vec3::ZERO);
        assert!(!handler.fire_input_down());
    }

    #[test]
    fn test_move_remapped_to_ground_plane() {
        let (mut handler, _flow) = open_handler();
        handler.on_move(Vec2::new(1.0, 0.0));
        assert_eq!(handler.move_input(), Vec3::new(1.0, 0.0, 0.0));

        handler.on_move(Vec2::new(0.0, 1.0));
        assert_eq!(handler.move_input(), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_look_invert_y() {
        let (mut handler, _flow) = open_handler();
        handler.settings_mut().invert_y_axis = true;
        handler.on_look(Vec2::new(0.0, 1.0));

        assert_relative_eq!(handler.look_input_vertical(), -1.0);
        assert_relative_eq!(handler.look_input_horizontal(), 0.0);
    }

    #[test]
    fn test_look_invert_x() {
        let (mut handler, _flow) = open_handler();
        handler.settings_mut().invert_x_axis = true;
        handler.on_look(Vec2::new(2.0, 1.0));

        assert_relative_eq!(handler.look_input_horizontal(), -2.0);
        assert_relative_eq!(handler.look_input_vertical(), 1.0);
    }

    #[test]
    #[cfg(not(target_arch = "wasm32"))]
    fn test_look_scaled_by_sensitivity_and_delta_time() {
        let (mut handler, _flow) = open_handler();
        handler.settings_mut().look_sensitivity = 2.0;
        handler.set_delta_time(0.5);
        handler.on_look(Vec2::new(3.0, -4.0));

        assert_relative_eq!(handler.look_input_horizontal(), 3.0);
        assert_relative_eq!(handler.look_input_vertical(), -4.0);
    }

    #[test]
    fn test_look_overwrites_previous_delta() {
        let (mut handler, _flow) = open_handler();
        handler.on_look(Vec2::new(5.0, 5.0));
        handler.on_look(Vec2::new(1.0, 0.0));

        assert_relative_eq!(handler.look_input_horizontal(), 1.0);
        assert_relative_eq!(handler.look_input_vertical(), 0.0);
    }

    #[test]
    fn test_jump_down_consumed_on_first_read() {
        let (mut handler, _flow) = open_handler();
        handler.on_jump(InputPhase::Started);

        assert!(handler.take_jump_input_down());
        for _ in 0..5 {
            assert!(!handler.take_jump_input_down());
        }

        handler.on_jump(InputPhase::Started);
        assert!(handler.take_jump_input_down());
    }

    #[test]
    fn test_jump_down_survives_other_phases() {
        let (mut handler, _flow) = open_handler();
        handler.on_jump(InputPhase::Started);
        handler.on_jump(InputPhase::Performed);

        assert!(handler.jump_input_held());
        assert!(handler.take_jump_input_down());

        handler.on_jump(InputPhase::Canceled);
        assert!(!handler.jump_input_held());
        assert!(!handler.take_jump_input_down());
    }

    #[test]
    fn test_jump_down_not_consumed_while_gated() {
        let (mut handler, flow) = open_handler();
        handler.on_jump(InputPhase::Started);

        flow.ending.set(true);
        assert!(!handler.take_jump_input_down());

        flow.ending.set(false);
        assert!(handler.take_jump_input_down());
    }

    #[test]
    fn test_fire_flags_mutually_exclusive() {
        let (mut handler, _flow) = open_handler();
        for phase in [InputPhase::Started, InputPhase::Performed, InputPhase::Canceled] {
            handler.on_fire(phase);
            let flags = [
                handler.fire_input_down(),
                handler.fire_input_held(),
                handler.fire_input_released(),
            ];
            assert_eq!(flags.iter().filter(|f| **f).count(), 1, "{:?}", phase);
        }
    }

    #[test]
    fn test_fire_flags_level_for_frame() {
        let (mut handler, _flow) = open_handler();
        handler.on_fire(InputPhase::Started);

        // Repeated reads do not clear the flag
        assert!(handler.fire_input_down());
        assert!(handler.fire_input_down());

        handler.on_fire(InputPhase::Performed);
        assert!(!handler.fire_input_down());
        assert!(handler.fire_input_held());
    }

    #[test]
    fn test_held_flags() {
        let (mut handler, _flow) = open_handler();
        handler.on_aim(InputPhase::Performed);
        handler.on_sprint(InputPhase::Performed);
        assert!(handler.aim_input_held());
        assert!(handler.sprint_input_held());

        handler.on_aim(InputPhase::Started);
        handler.on_sprint(InputPhase::Canceled);
        assert!(!handler.aim_input_held());
        assert!(!handler.sprint_input_held());
    }

    #[test]
    fn test_crouch_and_reload() {
        let (mut handler, _flow) = open_handler();
        handler.on_crouch(InputPhase::Started);
        handler.on_reload(InputPhase::Started);
        assert!(handler.crouch_input_down());
        assert!(!handler.crouch_input_released());
        assert!(handler.reload_button_down());

        handler.on_crouch(InputPhase::Canceled);
        handler.on_reload(InputPhase::Canceled);
        assert!(!handler.crouch_input_down());
        assert!(handler.crouch_input_released());
        assert!(!handler.reload_button_down());
    }

    #[test]
    fn test_switch_weapon_axis_sign() {
        let (mut handler, _flow) = open_handler();
        handler.on_switch_weapon_axis(Vec2::new(0.0, 120.0));
        assert_eq!(handler.switch_weapon_input(), 1);

        handler.on_switch_weapon_axis(Vec2::new(0.0, -2.0));
        assert_eq!(handler.switch_weapon_input(), -1);

        handler.on_switch_weapon_axis(Vec2::new(5.0, 0.3));
        assert_eq!(handler.switch_weapon_input(), 0);
    }

    #[test]
    fn test_switch_weapon_direct_priority() {
        let (mut handler, _flow) = open_handler();
        handler.on_switch_weapon_next(InputPhase::Started);
        handler.on_switch_weapon_axis(Vec2::new(0.0, -1.0));

        assert_eq!(handler.switch_weapon_input(), 1);

        handler.on_switch_weapon_next(InputPhase::Canceled);
        assert_eq!(handler.switch_weapon_input(), -1);
    }

    #[test]
    fn test_switch_weapon_next_previous_share_slot() {
        let (mut handler, _flow) = open_handler();
        handler.on_switch_weapon_next(InputPhase::Started);
        handler.on_switch_weapon_previous(InputPhase::Started);
        assert_eq!(handler.switch_weapon_input(), -1);

        // Releasing "next" clears the slot even though "previous" set it
        handler.on_switch_weapon_next(InputPhase::Canceled);
        assert_eq!(handler.switch_weapon_input(), 0);
    }

    #[test]
    fn test_select_weapon_never_selects() {
        let (handler, _flow) = open_handler();
        assert_eq!(handler.select_weapon_input(), None);
    }

    #[test]
    fn test_game_ending_neutralizes_everything() {
        let (mut handler, flow) = open_handler();
        handler.on_move(Vec2::new(1.0, 1.0));
        handler.on_look(Vec2::new(1.0, 1.0));
        handler.on_jump(InputPhase::Performed);
        handler.on_fire(InputPhase::Started);
        handler.on_aim(InputPhase::Performed);
        handler.on_sprint(InputPhase::Performed);
        handler.on_crouch(InputPhase::Started);
        handler.on_reload(InputPhase::Started);
        handler.on_switch_weapon_previous(InputPhase::Started);

        flow.ending.set(true);
        assert!(!handler.can_process_input());
        assert_eq!(handler.move_input(), Vec3::ZERO);
        assert_eq!(handler.look_input_horizontal(), 0.0);
        assert_eq!(handler.look_input_vertical(), 0.0);
        assert!(!handler.jump_input_held());
        assert!(!handler.fire_input_down());
        assert!(!handler.fire_input_released());
        assert!(!handler.fire_input_held());
        assert!(!handler.aim_input_held());
        assert!(!handler.sprint_input_held());
        assert!(!handler.crouch_input_down());
        assert!(!handler.crouch_input_released());
        assert!(!handler.reload_button_down());
        assert_eq!(handler.switch_weapon_input(), 0);
        assert!(!handler.take_jump_input_down());
    }

    #[test]
    fn test_handle_event_routing() {
        let (mut handler, _flow) = open_handler();
        handler.handle_event(&ActionEvent::axis(
            Action::Move,
            InputPhase::Performed,
            Vec2::new(0.0, -1.0),
        ));
        handler.handle_event(&ActionEvent::button(Action::Jump, InputPhase::Started));
        handler.handle_event(&ActionEvent::button(
            Action::SwitchWeaponPrevious,
            InputPhase::Started,
        ));

        assert_eq!(handler.move_input(), Vec3::new(0.0, 0.0, -1.0));
        assert!(handler.take_jump_input_down());
        assert_eq!(handler.switch_weapon_input(), -1);
    }
}
