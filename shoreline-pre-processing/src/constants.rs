/// Shared configuration for texture baking

/// Side length of every baked texture when none is given on the command line
pub const DEFAULT_RESOLUTION: u32 = 256;

/// Smallest resolution the tiling patterns still read as patterns at
pub const MIN_RESOLUTION: u32 = 16;

/// Value-noise lattice cells across one tile
pub const NOISE_LATTICE_CELLS: u32 = 8;

/// Octaves summed into the noise texture, each at double the frequency
pub const NOISE_OCTAVES: u32 = 4;

/// Worley feature cells across one tile of the water pattern
pub const WATER_PATTERN_CELLS: u32 = 6;

/// Worley feature cells across one tile of the foam texture
pub const FOAM_CELLS: u32 = 12;

/// Seeds keep every bake bit-identical
pub const NOISE_SEED: u32 = 0x5EA5_1DE5;
pub const WATER_PATTERN_SEED: u32 = 0x0CEA_4A11;
pub const FOAM_SEED: u32 = 0xF0A4_F0A4;

/// Directory layout under the output root, matching the engine's asset root
pub const TEXTURE_DIR: &str = "textures";
pub const SCENE_DIR: &str = "scene";
