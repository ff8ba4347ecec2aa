//! Runtime systems for water control and diagnostics.

/// FPS tracking: RPC notifications for the panel and a native text overlay.
pub mod fps_tracking;

/// Water debug view state and switching.
///
/// Handles keyboard input (native) or RPC requests (WASM) for the water debug views.
pub mod render_mode;

/// Scene clock driving the water pattern scroll.
pub mod water_clock;
