//! Opaque scene content drawn by Bevy's main passes, underneath the water.
//!
//! Terrain comes from decoded height and type maps; the light and reference
//! cube are fixed.

/// Scalar grid with clamped bilinear sampling.
pub mod height_field;

/// Directional light, ambient level and the magenta reference cube.
pub mod reference_objects;

/// Unlit two-colour terrain material.
pub mod terrain_material;

/// Terrain mesh and type texture construction.
pub mod terrain_surface;
