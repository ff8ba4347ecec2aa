//! JSON-RPC 2.0 bridge to the water parameter panel.
//!
//! The engine runs in an iframe; the panel lives in the parent window and
//! talks to it over `postMessage`.
//!
//! ```text
//! Panel (parent window)  <──postMessage──>  Bevy (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Apply to WaterParams
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <────────── Notification (no ID) ─────┤
//! ```
//!
//! ## Methods
//!
//! - `get_water_params`: current parameters as JSON
//! - `set_water_params`: partial update, e.g. `{ "depth_falloff": 0.6 }`.
//!   The merged set is range-checked and rejected whole if any field is out of range.
//! - `reset_water_params`: restore the manifest's parameters
//! - `set_debug_view`: `{ "view": "shaded" | "water_depth" | "shallowness" | "foam_mask" }`
//! - `get_terrain_status`: `{ "state": "idle" | "loading" | "ready" | "failed", "error"? }`
//!
//! ## Notifications
//!
//! - `terrain_status`: sent whenever the terrain load changes state
//! - `fps_update`: smoothed frame rate, twice a second
//!
//! ## Error codes
//!
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error (e.g. the water surface does not exist yet)

pub mod web_rpc;
