/// Pass list, off-screen targets and the copy pass that moves pixels between them.
pub mod compositing;

/// Water surface extraction, uniforms and pipeline.
pub mod water;
