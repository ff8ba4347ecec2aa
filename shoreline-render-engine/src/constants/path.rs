pub const WATER_SHADER_PATH: &str = "shaders/water.wgsl";
pub const COPY_PASS_SHADER_PATH: &str = "shaders/copy_pass.wgsl";
pub const TERRAIN_SHADER_PATH: &str = "shaders/terrain.wgsl";

pub use constants::world::SCENE_MANIFEST_PATH;
