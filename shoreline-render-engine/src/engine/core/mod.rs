//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration and plugin
//! initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with the water and compositor render plugins,
/// asset loading systems and platform-specific configuration.
pub mod app_setup;

/// Application state machine and the loading-to-running transition.
pub mod app_state;

/// Platform-specific window configuration for native and WASM builds.
pub mod window_config;
