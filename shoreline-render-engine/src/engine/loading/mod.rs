//! Startup loading: manifest first, then the water textures and terrain in parallel.
//!
//! Water and terrain are independent. The app starts running once the water
//! is ready; the terrain appears whenever its decode finishes, or never if it
//! fails.

/// Scene manifest request and fallback.
pub mod manifest_loader;

/// Loading milestones for the `Loading` to `Running` transition.
pub mod progress;

/// Camera, lighting, reference cube and water surface spawning.
pub mod scene_creator;

/// Terrain load state machine and terrain spawning.
pub mod terrain_load;

/// Packed terrain PNG decoding as a Bevy asset loader.
pub mod terrain_loader;

/// Water texture load monitoring.
pub mod texture_loader;
