//! Scene description and the textures it points at.

/// JSON scene manifest: terrain source, water defaults, texture paths and camera.
pub mod scene_manifest;

/// Water pattern texture handles, loaded as linear data.
pub mod water_textures;
