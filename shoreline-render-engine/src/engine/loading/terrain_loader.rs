//! Packed terrain image decoding.
//!
//! A terrain image carries elevation in its red channel and terrain type in
//! its green channel (see `constants::terrain_encoding`). Decoding runs on the
//! asset server's task pool; callers poll the handle's load state for the
//! outcome.

use bevy::asset::io::Reader;
use bevy::asset::{AssetLoader, LoadContext};
use bevy::prelude::*;
use constants::terrain_encoding::{
    BYTES_PER_PIXEL, ELEVATION_CHANNEL, TERRAIN_TYPE_CHANNEL, decode_elevation,
    decode_terrain_type,
};
use thiserror::Error;

use crate::engine::scene::height_field::{HeightField, HeightFieldError};

/// Compound extension claimed by [`TerrainMapsLoader`], so plain `.png` files
/// keep going through Bevy's image loader.
pub const TERRAIN_IMAGE_EXTENSION: &str = "terrain.png";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("could not read terrain image: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not decode terrain image: {0}")]
    Image(#[from] image::ImageError),
    #[error("terrain image has degenerate dimensions {width}x{height}")]
    EmptyImage { width: u32, height: u32 },
    #[error("terrain image {width}x{height} needs {expected} RGBA bytes, got {actual}")]
    TruncatedPixels {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Elevation and terrain-type fields decoded from one image, same dimensions.
#[derive(Asset, TypePath, Debug, Clone)]
pub struct TerrainMaps {
    pub elevation: HeightField,
    pub terrain_type: HeightField,
}

impl TerrainMaps {
    /// Split a row-major RGBA8 buffer into the two fields.
    pub fn from_rgba8(width: u32, height: u32, rgba: &[u8]) -> Result<Self, DecodeError> {
        if width == 0 || height == 0 {
            return Err(DecodeError::EmptyImage { width, height });
        }
        let pixel_count = width as usize * height as usize;
        let expected = pixel_count * BYTES_PER_PIXEL;
        if rgba.len() < expected {
            return Err(DecodeError::TruncatedPixels {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }

        let mut elevation = Vec::with_capacity(pixel_count);
        let mut terrain_type = Vec::with_capacity(pixel_count);
        for pixel in rgba[..expected].chunks_exact(BYTES_PER_PIXEL) {
            elevation.push(decode_elevation(pixel[ELEVATION_CHANNEL]));
            terrain_type.push(decode_terrain_type(pixel[TERRAIN_TYPE_CHANNEL]));
        }

        let (width, height) = (width as usize, height as usize);
        Ok(Self {
            elevation: field(width, height, elevation),
            terrain_type: field(width, height, terrain_type),
        })
    }

    /// Sine test terrain with a type map that follows elevation.
    pub fn sine_test_pattern(width: usize, height: usize) -> Result<Self, HeightFieldError> {
        let elevation = HeightField::sine_test_pattern(width, height)?;
        let (low, high) = elevation.min_max();
        let span = (high - low).max(f32::EPSILON);
        let mut terrain_type = elevation.clone();
        terrain_type.apply(|value, _, _| (value - low) / span);
        Ok(Self {
            elevation,
            terrain_type,
        })
    }

    pub fn width(&self) -> usize {
        self.elevation.width()
    }

    pub fn height(&self) -> usize {
        self.elevation.height()
    }
}

fn field(width: usize, height: usize, samples: Vec<f32>) -> HeightField {
    HeightField::from_samples(width, height, samples)
        .unwrap_or_else(|err| unreachable!("decoded buffer is sized from the image: {err}"))
}

/// Decode any image format `image` understands into [`TerrainMaps`].
pub fn decode_terrain_image(bytes: &[u8]) -> Result<TerrainMaps, DecodeError> {
    let rgba = image::load_from_memory(bytes)?.into_rgba8();
    let (width, height) = rgba.dimensions();
    TerrainMaps::from_rgba8(width, height, rgba.as_raw())
}

#[derive(Default)]
pub struct TerrainMapsLoader;

impl AssetLoader for TerrainMapsLoader {
    type Asset = TerrainMaps;
    type Settings = ();
    type Error = DecodeError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &(),
        load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let maps = decode_terrain_image(&bytes)?;
        debug!(
            "Decoded terrain maps {}x{} from {}",
            maps.width(),
            maps.height(),
            load_context.path().display()
        );
        Ok(maps)
    }

    fn extensions(&self) -> &[&str] {
        &[TERRAIN_IMAGE_EXTENSION]
    }
}
