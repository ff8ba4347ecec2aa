//! Mesh construction shared by the terrain and the water surface.

/// One-shot height field displacement with normal recomputation.
pub mod deformer;

/// Indexed XZ grid with lattice-aligned UVs.
pub mod plane_grid;
