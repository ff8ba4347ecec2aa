/// Packed terrain heightmap generation: elevation in red, terrain type in green.
use constants::terrain_encoding::{
    BYTES_PER_PIXEL, ELEVATION_BIAS, ELEVATION_CHANNEL, TERRAIN_TYPE_CHANNEL, encode_elevation,
    encode_terrain_type,
};
use constants::test_pattern::{SINE_PATTERN_AMPLITUDE, sine_elevation};
use rayon::prelude::*;

/// RGBA8 pixels of the sine test terrain, row-major.
///
/// The pattern's full swing is squeezed into the encodable elevation range,
/// and the terrain type rises with elevation, so hill tops take the upland colour.
pub fn sine_terrain_rgba(resolution: u32) -> Vec<u8> {
    let size = resolution as usize;
    let mut pixels = vec![0u8; size * size * BYTES_PER_PIXEL];

    pixels
        .par_chunks_mut(size * BYTES_PER_PIXEL)
        .enumerate()
        .for_each(|(j, row)| {
            for (i, pixel) in row.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
                let normalised = sine_elevation(i, j, size, size) / SINE_PATTERN_AMPLITUDE;
                let elevation = normalised * ELEVATION_BIAS;
                pixel[ELEVATION_CHANNEL] = encode_elevation(elevation);
                pixel[TERRAIN_TYPE_CHANNEL] = encode_terrain_type(elevation + ELEVATION_BIAS);
                pixel[BYTES_PER_PIXEL - 1] = u8::MAX;
            }
        });

    pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use constants::terrain_encoding::{decode_elevation, decode_terrain_type};

    #[test]
    fn origin_pixel_is_sea_level() {
        let pixels = sine_terrain_rgba(16);
        assert_eq!(pixels.len(), 16 * 16 * 4);
        assert_eq!(decode_elevation(pixels[ELEVATION_CHANNEL]), 0.0);
        assert_eq!(decode_terrain_type(pixels[TERRAIN_TYPE_CHANNEL]), 0.5);
        assert_eq!(pixels[3], 255);
    }

    #[test]
    fn elevation_stays_within_the_encoding() {
        let pixels = sine_terrain_rgba(32);
        for pixel in pixels.chunks_exact(BYTES_PER_PIXEL) {
            let elevation = decode_elevation(pixel[ELEVATION_CHANNEL]);
            assert!((-ELEVATION_BIAS..ELEVATION_BIAS).contains(&elevation));
        }
    }

    #[test]
    fn terrain_type_follows_elevation() {
        let pixels = sine_terrain_rgba(32);
        for pixel in pixels.chunks_exact(BYTES_PER_PIXEL) {
            assert_eq!(pixel[ELEVATION_CHANNEL], pixel[TERRAIN_TYPE_CHANNEL]);
        }
    }
}
