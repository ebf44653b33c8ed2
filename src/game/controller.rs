// First-person player controller driven by the input handler

use glam::{Quat, Vec3};

use crate::core::math::approx_equal;
use crate::engine::input::PlayerInputHandler;

/// Tunable movement properties
#[derive(Debug, Clone)]
pub struct ControllerStats {
    /// Ground movement speed (units/second)
    pub move_speed: f32,
    /// Speed multiplier while sprinting
    pub sprint_multiplier: f32,
    /// Speed multiplier while crouched
    pub crouch_multiplier: f32,
    /// Initial upward velocity of a jump
    pub jump_force: f32,
    /// Factor applied to upward velocity when jump is let go early
    pub jump_release_damping: f32,
    /// Downward acceleration (units/second^2)
    pub gravity: f32,
    /// Degrees of rotation per unit of look input
    pub rotation_speed: f32,
    /// Number of weapons the player carries
    pub weapon_count: usize,
}

pub const BASE_STATS: ControllerStats = ControllerStats {
    move_speed: 10.0,
    sprint_multiplier: 2.0,
    crouch_multiplier: 0.5,
    jump_force: 9.0,
    jump_release_damping: 0.5,
    gravity: 20.0,
    rotation_speed: 200.0,
    weapon_count: 3,
};

impl Default for ControllerStats {
    fn default() -> Self {
        BASE_STATS
    }
}

/// Pitch limit in degrees
const MAX_PITCH: f32 = 89.0;

const GROUND_EPSILON: f32 = 1e-4;

/// Kinematic first-person character
#[derive(Debug)]
pub struct PlayerController {
    pub stats: ControllerStats,

    /// World position, y = 0 is the ground
    pub position: Vec3,
    /// Vertical velocity
    pub vertical_velocity: f32,
    /// Heading in degrees
    pub yaw: f32,
    /// Camera pitch in degrees, positive looks up
    pub pitch: f32,

    pub is_crouching: bool,
    pub is_aiming: bool,
    pub is_sprinting: bool,
    pub is_firing: bool,

    /// Index of the active weapon
    pub active_weapon: usize,
    /// Shots started since spawn
    pub shots_fired: u32,
    /// Reloads requested since spawn
    pub reloads: u32,
    /// Jumps performed since spawn
    pub jumps: u32,

    /// Whether jump was reported held on the previous update
    jump_was_held: bool,
}

impl PlayerController {
    pub fn new(stats: ControllerStats) -> Self {
        Self {
            stats,
            position: Vec3::ZERO,
            vertical_velocity: 0.0,
            yaw: 0.0,
            pitch: 0.0,
            is_crouching: false,
            is_aiming: false,
            is_sprinting: false,
            is_firing: false,
            active_weapon: 0,
            shots_fired: 0,
            reloads: 0,
            jumps: 0,
            jump_was_held: false,
        }
    }

    pub fn is_grounded(&self) -> bool {
        approx_equal(self.position.y, 0.0, GROUND_EPSILON) && self.vertical_velocity <= 0.0
    }

    /// Read this frame's input and advance the character
    pub fn update(&mut self, input: &mut PlayerInputHandler, dt: f32) {
        self.update_look(input);
        self.update_stance(input);
        self.update_weapon(input);
        self.update_movement(input, dt);
    }

    fn update_look(&mut self, input: &PlayerInputHandler) {
        self.yaw += input.look_input_horizontal() * self.stats.rotation_speed;
        self.yaw = self.yaw.rem_euclid(360.0);
        self.pitch += input.look_input_vertical() * self.stats.rotation_speed;
        self.pitch = self.pitch.clamp(-MAX_PITCH, MAX_PITCH);
    }

    fn update_stance(&mut self, input: &PlayerInputHandler) {
        if input.crouch_input_down() {
            self.is_crouching = true;
        } else if input.crouch_input_released() {
            self.is_crouching = false;
        }
        self.is_aiming = input.aim_input_held();
        self.is_sprinting = input.sprint_input_held() && !self.is_crouching;
    }

    fn update_weapon(&mut self, input: &PlayerInputHandler) {
        if let Some(slot) = input.select_weapon_input() {
            if slot < self.stats.weapon_count {
                self.active_weapon = slot;
            }
        }

        let step = input.switch_weapon_input();
        if step != 0 && self.stats.weapon_count > 0 {
            let count = self.stats.weapon_count as i64;
            let next = (self.active_weapon as i64 + step as i64).rem_euclid(count);
            self.active_weapon = next as usize;
            log::debug!("Switched to weapon {}", self.active_weapon);
        }

        if input.fire_input_down() {
            self.shots_fired += 1;
        }
        if input.fire_input_down() || input.fire_input_held() {
            self.is_firing = true;
        }
        if input.fire_input_released() {
            self.is_firing = false;
        }

        if input.reload_button_down() {
            self.reloads += 1;
        }
    }

    fn update_movement(&mut self, input: &mut PlayerInputHandler, dt: f32) {
        let mut speed = self.stats.move_speed;
        if self.is_sprinting {
            speed *= self.stats.sprint_multiplier;
        } else if self.is_crouching {
            speed *= self.stats.crouch_multiplier;
        }

        // Local input: x = strafe right, z = forward; rotate into world by heading
        let heading = Quat::from_rotation_y(-self.yaw.to_radians());
        let world_move = heading * input.move_input();
        self.position.x += world_move.x * speed * dt;
        self.position.z += world_move.z * speed * dt;

        // Consumed even when airborne so a mid-air press does not fire on landing
        let jump_requested = input.take_jump_input_down();
        if jump_requested && self.is_grounded() && !self.is_crouching {
            self.vertical_velocity = self.stats.jump_force;
            self.jumps += 1;
        }

        // Letting go of a held jump while rising shortens the jump
        let jump_held = input.jump_input_held();
        if self.jump_was_held && !jump_held && self.vertical_velocity > 0.0 {
            self.vertical_velocity *= self.stats.jump_release_damping;
        }
        self.jump_was_held = jump_held;

        self.vertical_velocity -= self.stats.gravity * dt;
        self.position.y += self.vertical_velocity * dt;
        if self.position.y <= 0.0 {
            self.position.y = 0.0;
            self.vertical_velocity = 0.0;
        }
    }
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new(BASE_STATS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::action::InputPhase;
    use crate::engine::input::{GameFlowGate, InputSettings};
    use crate::game::flow::GameFlowManager;
    use approx::assert_relative_eq;
    use glam::Vec2;
    use std::rc::Rc;

    fn setup() -> (PlayerController, PlayerInputHandler, Rc<GameFlowManager>) {
        let flow = Rc::new(GameFlowManager::new());
        let gate: Rc<dyn GameFlowGate> = flow.clone();
        let mut input = PlayerInputHandler::new(InputSettings::default(), Some(gate));
        input.set_delta_time(1.0);
        (PlayerController::default(), input, flow)
    }

    #[test]
    fn test_moves_forward() {
        let (mut player, mut input, _flow) = setup();
        input.on_move(Vec2::new(0.0, 1.0));
        player.update(&mut input, 0.1);

        assert_relative_eq!(player.position.z, 1.0, epsilon = 1e-5);
        assert_relative_eq!(player.position.x, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_jump_applied_once_per_press() {
        let (mut player, mut input, _flow) = setup();
        input.on_jump(InputPhase::Started);

        player.update(&mut input, 0.01);
        assert_eq!(player.jumps, 1);
        assert!(player.vertical_velocity > 0.0);

        // Land, then the stale flag must not trigger another jump
        for _ in 0..200 {
            player.update(&mut input, 0.01);
        }
        assert!(player.is_grounded());
        assert_eq!(player.jumps, 1);
    }

    #[test]
    fn test_released_jump_is_shorter() {
        let (mut held_player, mut held_input, _f1) = setup();
        let (mut tapped_player, mut tapped_input, _f2) = setup();

        for (player, input) in [
            (&mut held_player, &mut held_input),
            (&mut tapped_player, &mut tapped_input),
        ] {
            input.on_jump(InputPhase::Started);
            player.update(input, 0.01);
            input.on_jump(InputPhase::Performed);
            player.update(input, 0.01);
        }

        // One keeps holding, the other lets go while still rising
        tapped_input.on_jump(InputPhase::Canceled);
        held_player.update(&mut held_input, 0.01);
        tapped_player.update(&mut tapped_input, 0.01);

        assert!(held_input.jump_input_held());
        assert!(!tapped_input.jump_input_held());
        assert!(tapped_player.vertical_velocity < held_player.vertical_velocity);
        assert!(tapped_player.vertical_velocity > 0.0);
    }

    #[test]
    fn test_pitch_clamped() {
        let (mut player, mut input, _flow) = setup();
        input.on_look(Vec2::new(0.0, 10.0));
        player.update(&mut input, 0.01);
        assert_eq!(player.pitch, MAX_PITCH);
    }

    #[test]
    fn test_weapon_switch_wraps() {
        let (mut player, mut input, _flow) = setup();
        input.on_switch_weapon_previous(InputPhase::Started);
        player.update(&mut input, 0.01);
        assert_eq!(player.active_weapon, BASE_STATS.weapon_count - 1);

        input.on_switch_weapon_previous(InputPhase::Canceled);
        input.on_switch_weapon_axis(Vec2::new(0.0, 1.0));
        player.update(&mut input, 0.01);
        assert_eq!(player.active_weapon, 0);
    }

    #[test]
    fn test_crouch_blocks_sprint() {
        let (mut player, mut input, _flow) = setup();
        input.on_sprint(InputPhase::Performed);
        input.on_crouch(InputPhase::Started);
        player.update(&mut input, 0.01);

        assert!(player.is_crouching);
        assert!(!player.is_sprinting);

        input.on_crouch(InputPhase::Canceled);
        player.update(&mut input, 0.01);
        assert!(!player.is_crouching);
        assert!(player.is_sprinting);
    }

    #[test]
    fn test_fire_and_reload() {
        let (mut player, mut input, _flow) = setup();
        input.on_fire(InputPhase::Started);
        input.on_reload(InputPhase::Started);
        player.update(&mut input, 0.01);
        assert_eq!(player.shots_fired, 1);
        assert_eq!(player.reloads, 1);
        assert!(player.is_firing);

        input.on_fire(InputPhase::Canceled);
        player.update(&mut input, 0.01);
        assert!(!player.is_firing);
    }

    #[test]
    fn test_frozen_when_game_ends() {
        let (mut player, mut input, flow) = setup();
        input.on_move(Vec2::new(1.0, 0.0));
        flow.end_game();
        player.update(&mut input, 0.1);

        assert_eq!(player.position, Vec3::ZERO);
    }
}
