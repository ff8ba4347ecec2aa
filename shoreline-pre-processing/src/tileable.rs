/// Seamlessly tiling procedural patterns: value noise and Worley cells.
///
/// Every pattern is periodic over the unit square, so `sample(u, v)` and
/// `sample(u + 1, v)` agree and the engine can repeat the textures across
/// the water without visible seams.
use rayon::prelude::*;

/// Integer hash of a lattice point, well mixed in all 32 bits.
fn hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = x.wrapping_mul(0x8da6_b343) ^ y.wrapping_mul(0xd816_3841) ^ seed.wrapping_mul(0xcb1a_b31f);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846c_a68b);
    h ^= h >> 16;
    h
}

/// Top 24 bits of a hash as a float in [0, 1).
fn unit(h: u32) -> f32 {
    (h >> 8) as f32 / (1u32 << 24) as f32
}

fn wrap(cell: i64, period: u32) -> u32 {
    cell.rem_euclid(period as i64) as u32
}

fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Single octave of value noise with `cells` lattice cells per unit, in [0, 1).
pub fn value_noise(u: f32, v: f32, cells: u32, seed: u32) -> f32 {
    let x = u * cells as f32;
    let y = v * cells as f32;
    let (x0, y0) = (x.floor(), y.floor());
    let (fx, fy) = (smoothstep(x - x0), smoothstep(y - y0));
    let (cx, cy) = (x0 as i64, y0 as i64);

    let corner = |dx: i64, dy: i64| unit(hash(wrap(cx + dx, cells), wrap(cy + dy, cells), seed));
    let top = corner(0, 0) + (corner(1, 0) - corner(0, 0)) * fx;
    let bottom = corner(0, 1) + (corner(1, 1) - corner(0, 1)) * fx;
    top + (bottom - top) * fy
}

/// Octave sum of [`value_noise`], each octave at double the frequency and
/// half the weight, normalised back to [0, 1).
pub fn fractal_noise(u: f32, v: f32, cells: u32, octaves: u32, seed: u32) -> f32 {
    let mut total = 0.0;
    let mut weight = 1.0;
    let mut weight_sum = 0.0;
    for octave in 0..octaves {
        total += value_noise(u, v, cells << octave, seed.wrapping_add(octave)) * weight;
        weight_sum += weight;
        weight *= 0.5;
    }
    total / weight_sum
}

/// Distances to the nearest and second-nearest feature points, in cell units.
pub fn worley(u: f32, v: f32, cells: u32, seed: u32) -> (f32, f32) {
    let x = u * cells as f32;
    let y = v * cells as f32;
    let (cx, cy) = (x.floor() as i64, y.floor() as i64);

    let mut nearest = f32::MAX;
    let mut second = f32::MAX;
    for dy in -1..=1 {
        for dx in -1..=1 {
            let (nx, ny) = (cx + dx, cy + dy);
            let (wx, wy) = (wrap(nx, cells), wrap(ny, cells));
            let feature_x = nx as f32 + unit(hash(wx, wy, seed));
            let feature_y = ny as f32 + unit(hash(wx, wy, seed ^ 0x9e37_79b9));
            let distance = ((feature_x - x).powi(2) + (feature_y - y).powi(2)).sqrt();
            if distance < nearest {
                second = nearest;
                nearest = distance;
            } else if distance < second {
                second = distance;
            }
        }
    }
    (nearest, second)
}

/// Evaluate `sample` at every texel centre of a square tile, rows in parallel.
pub fn render_tile<F>(resolution: u32, sample: F) -> Vec<f32>
where
    F: Fn(f32, f32) -> f32 + Sync,
{
    let size = resolution as usize;
    let mut values = vec![0.0f32; size * size];
    values
        .par_chunks_mut(size)
        .enumerate()
        .for_each(|(row_index, row)| {
            let v = (row_index as f32 + 0.5) / resolution as f32;
            for (column, value) in row.iter_mut().enumerate() {
                let u = (column as f32 + 0.5) / resolution as f32;
                *value = sample(u, v);
            }
        });
    values
}

/// Quantise a [0, 1] value to a byte.
pub fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
