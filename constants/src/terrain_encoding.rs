/// Packed terrain images store one byte per channel; a byte `b` decodes to `b / 256`.
pub const CHANNEL_SCALE: f32 = 256.0;

/// Elevation is biased so the red channel covers [-0.5, 0.5).
pub const ELEVATION_BIAS: f32 = 0.5;

/// Bytes per packed terrain pixel (RGBA).
pub const BYTES_PER_PIXEL: usize = 4;

/// Red channel byte offset within a pixel.
pub const ELEVATION_CHANNEL: usize = 0;

/// Green channel byte offset within a pixel.
pub const TERRAIN_TYPE_CHANNEL: usize = 1;

pub fn decode_elevation(byte: u8) -> f32 {
    byte as f32 / CHANNEL_SCALE - ELEVATION_BIAS
}

pub fn decode_terrain_type(byte: u8) -> f32 {
    byte as f32 / CHANNEL_SCALE
}

/// Inverse of [`decode_elevation`], saturating outside the representable range.
pub fn encode_elevation(elevation: f32) -> u8 {
    ((elevation + ELEVATION_BIAS) * CHANNEL_SCALE)
        .floor()
        .clamp(0.0, 255.0) as u8
}

/// Inverse of [`decode_terrain_type`], saturating outside [0, 1).
pub fn encode_terrain_type(terrain_type: f32) -> u8 {
    (terrain_type * CHANNEL_SCALE).floor().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_byte_survives_encode_after_decode() {
        for byte in 0..=255u8 {
            assert_eq!(encode_elevation(decode_elevation(byte)), byte);
            assert_eq!(encode_terrain_type(decode_terrain_type(byte)), byte);
        }
    }

    #[test]
    fn out_of_range_values_saturate() {
        assert_eq!(encode_elevation(-3.0), 0);
        assert_eq!(encode_elevation(0.75), 255);
        assert_eq!(encode_terrain_type(1.0), 255);
        assert_eq!(encode_terrain_type(-0.1), 0);
    }
}
