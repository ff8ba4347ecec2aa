use bevy::prelude::*;

/// Tracing filter handed to Bevy's `LogPlugin`.
pub const LOG_FILTER: &str = "info,wgpu=error,naga=warn";

pub const CLEAR_COLOUR: Color = Color::srgb(0.55, 0.7, 0.85);

/// Orbit controller tuning.
pub const ORBIT_SENSITIVITY: f32 = 0.005;
pub const PAN_SENSITIVITY: f32 = 0.0015;
pub const ZOOM_STEP: f32 = 0.1;
pub const MIN_ORBIT_DISTANCE: f32 = 1.0;
pub const MAX_ORBIT_DISTANCE: f32 = 500.0;
pub const PITCH_LIMIT: f32 = 1.55;
pub const CAMERA_SMOOTHING: f32 = 12.0;

/// Unit cube at the origin, for judging water depth by eye.
pub const REFERENCE_CUBE_SIZE: f32 = 1.0;
pub const REFERENCE_CUBE_POSITION: Vec3 = Vec3::ZERO;
pub const REFERENCE_CUBE_COLOUR: Color = Color::srgb(1.0, 0.0, 1.0);

pub const SUN_COLOUR: Color = Color::srgb(1.0, 0.933, 0.933);
pub const SUN_POSITION: Vec3 = Vec3::new(10.0, 20.0, 30.0);
pub const AMBIENT_BRIGHTNESS: f32 = 80.0;
