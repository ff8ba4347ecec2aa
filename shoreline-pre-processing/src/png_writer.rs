use image::{ExtendedColorType, ImageFormat};
use std::path::Path;

pub fn write_rgba8_png(path: &Path, size: u32, pixels: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
    image::save_buffer_with_format(path, pixels, size, size, ExtendedColorType::Rgba8, ImageFormat::Png)?;
    Ok(())
}

/// Grey texture from [0, 1] values, replicated into RGB so the engine can read
/// any channel. Alpha is opaque.
pub fn write_grey_png(path: &Path, size: u32, values: &[f32]) -> Result<(), Box<dyn std::error::Error>> {
    let pixels: Vec<u8> = values
        .iter()
        .flat_map(|&value| {
            let byte = crate::tileable::to_byte(value);
            [byte, byte, byte, u8::MAX]
        })
        .collect();
    write_rgba8_png(path, size, &pixels)
}

/// Two independent [0, 1] fields packed into red and green.
pub fn write_rg_png(
    path: &Path,
    size: u32,
    red: &[f32],
    green: &[f32],
) -> Result<(), Box<dyn std::error::Error>> {
    let pixels: Vec<u8> = red
        .iter()
        .zip(green)
        .flat_map(|(&r, &g)| {
            [
                crate::tileable::to_byte(r),
                crate::tileable::to_byte(g),
                0,
                u8::MAX,
            ]
        })
        .collect();
    write_rgba8_png(path, size, &pixels)
}
