//! Values shared between the render engine and the pre-processing tool.
//!
//! Anything both sides must agree on bit-for-bit lives here: the channel
//! encoding of packed terrain images, the sine test terrain, world sizes and
//! the default look of the water.

pub mod terrain_encoding;
pub mod test_pattern;
pub mod water;
pub mod world;
