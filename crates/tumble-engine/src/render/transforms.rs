//! Camera and model transforms.
//!
//! All matrices are right-handed and column-major. The projection maps depth
//! to the 0..1 clip range used by wgpu.

use std::f64::consts::TAU;
use std::time::Duration;

use glam::{Mat4, Vec3};

use crate::coords::ViewportConfig;

/// Vertical field of view in radians (about 45 degrees).
pub const FOV_Y: f32 = 0.785;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 10.0;

pub const EYE: Vec3 = Vec3::new(3.0, 3.0, 3.0);
pub const TARGET: Vec3 = Vec3::ZERO;
pub const UP: Vec3 = Vec3::Y;

/// Light color/intensity.
pub const LIGHT_INTENSITIES: [f32; 3] = [0.0, 1.0, 0.0];
pub const LIGHT_POSITION: [f32; 3] = [0.0, 0.0, 0.0];

/// Opaque black.
pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

pub fn projection(viewport: ViewportConfig) -> Mat4 {
    Mat4::perspective_rh(FOV_Y, viewport.aspect(), Z_NEAR, Z_FAR)
}

pub fn view() -> Mat4 {
    Mat4::look_at_rh(EYE, TARGET, UP)
}

/// Rotation angle for the given time since start: one radian per second,
/// wrapped into `[0, 2π)`.
///
/// Wrapping happens in `f64` so precision does not degrade in long sessions.
pub fn model_angle(elapsed: Duration) -> f32 {
    (elapsed.as_secs_f64() % TAU) as f32
}

pub fn model(elapsed: Duration) -> Mat4 {
    Mat4::from_rotation_y(model_angle(elapsed))
}
