//! Default water parameters, as sRGB colours and plain scalars.

pub const DEFAULT_FOAM_COLOR: [f32; 3] = [0.9, 0.9, 1.0];
pub const DEFAULT_SURFACE_COLOR: [f32; 3] = [0.0, 0.5, 0.8];
pub const DEFAULT_DEEP_COLOR: [f32; 3] = [0.0, 0.3, 0.4];
pub const DEFAULT_HIGHLIGHT_COLOR: [f32; 3] = [0.1, 0.8, 0.9];
pub const DEFAULT_SHADOW_COLOR: [f32; 3] = [0.0, 0.3, 0.6];

pub const DEFAULT_DEPTH_FALLOFF: f32 = 0.6;
pub const DEFAULT_FOAM_VELOCITY: [f32; 2] = [0.1, 0.1];
pub const DEFAULT_SHALLOW_TRANSMIT_ALPHA: f32 = 0.2;
pub const DEFAULT_DEEP_TRANSMIT_ALPHA: f32 = 0.1;

/// Editable ranges exposed to the parameter panel (inclusive).
pub const DEPTH_FALLOFF_RANGE: (f32, f32) = (0.0, 2.0);
pub const FOAM_VELOCITY_RANGE: (f32, f32) = (-1.0, 1.0);
pub const TRANSMIT_ALPHA_RANGE: (f32, f32) = (0.0, 1.0);
pub const COLOR_CHANNEL_RANGE: (f32, f32) = (0.0, 1.0);

/// World-space span covered by one repeat of the water pattern textures.
pub const PATTERN_TILE_SIZE: f32 = 20.0;

pub const WATER_SURFACE_SIZE: f32 = 20.0;
pub const WATER_SUBDIVISIONS: u32 = 5;
