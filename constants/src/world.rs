/// Side length of the square terrain in world units.
pub const TERRAIN_SIZE: f32 = 20.0;

/// Remap applied to decoded elevation before the mesh is deformed: `h * scale + offset`.
pub const ELEVATION_SCALE: f32 = 3.0;
pub const ELEVATION_OFFSET: f32 = 1.0;

/// Ground colours blended by the terrain type map (sRGB).
pub const LOWLAND_COLOR: [f32; 3] = [0.6, 0.4, 0.3];
pub const UPLAND_COLOR: [f32; 3] = [0.3, 0.6, 0.4];

/// Resolution of the sine test terrain when the manifest does not name one.
pub const TEST_PATTERN_RESOLUTION: usize = 64;

pub const CAMERA_EYE: [f32; 3] = [10.0, 20.0, 10.0];
pub const CAMERA_FOCUS: [f32; 3] = [0.0, 0.0, 0.0];
pub const CAMERA_FOV_DEGREES: f32 = 45.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 2000.0;

/// File names produced by the pre-processing tool, relative to the asset root.
pub const TERRAIN_TEXTURE_PATH: &str = "textures/heightmap.terrain.png";
pub const NOISE_TEXTURE_PATH: &str = "textures/noise.png";
pub const WATER_PATTERN_TEXTURE_PATH: &str = "textures/tiling_water.png";
pub const FOAM_TEXTURE_PATH: &str = "textures/foam.png";
pub const SCENE_MANIFEST_PATH: &str = "scene/manifest.json";
