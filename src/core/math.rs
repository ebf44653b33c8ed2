// Math utilities and helper functions

use glam::{Vec2, Vec3};

/// Remap a 2D stick/composite vector onto the ground plane
/// x stays x, y becomes z, height is always zero
pub fn to_ground_plane(v: Vec2) -> Vec3 {
    Vec3::new(v.x, 0.0, v.y)
}

/// Round to the nearest integer (ties to even) and reduce to a step of -1, 0 or +1
pub fn sign_step(value: f32) -> i32 {
    let rounded = value.round_ties_even() as i32;
    rounded.signum()
}

/// Check if two f32 values are approximately equal
pub fn approx_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}
