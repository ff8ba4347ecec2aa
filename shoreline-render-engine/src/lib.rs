//! Ocean surface composited over heightmap terrain.
//!
//! The opaque scene (terrain, reference cube) renders into the main view
//! target. The frame compositor then copies it, depth included, to a second
//! target, draws the water over that copy while sampling the original colour
//! and depth, and presents the result.

pub mod constants;
pub mod engine;
pub mod rpc;
