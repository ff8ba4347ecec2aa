//! Orbit camera for inspecting the shoreline.
//!
//! The compositor never touches this module: it only reads the matrices Bevy
//! extracts from whatever transform the controller leaves behind.

/// Viewport camera resource, spawn helper and controller system.
pub mod viewport_camera;
