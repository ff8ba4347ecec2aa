use std::f32::consts::TAU;

/// Largest absolute value [`sine_elevation`] can produce.
pub const SINE_PATTERN_AMPLITUDE: f32 = 4.0;

/// Trivial rolling terrain: two sine waves, one along each axis.
///
/// `i`/`j` are lattice coordinates in a `width` x `height` grid. The wave along
/// `j` runs at one and a half periods across the grid so the pattern is not
/// symmetric.
pub fn sine_elevation(i: usize, j: usize, width: usize, height: usize) -> f32 {
    let x = TAU * i as f32 / width as f32;
    let z = TAU * 1.5 * j as f32 / height as f32;
    2.0 * (x.sin() + z.sin())
}
