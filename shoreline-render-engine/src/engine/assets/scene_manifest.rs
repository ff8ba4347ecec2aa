use bevy::prelude::*;
use bevy::render::extract_resource::ExtractResource;
use constants::water::{WATER_SUBDIVISIONS, WATER_SURFACE_SIZE};
use constants::world::{
    CAMERA_EYE, CAMERA_FAR, CAMERA_FOCUS, CAMERA_FOV_DEGREES, CAMERA_NEAR, ELEVATION_OFFSET,
    ELEVATION_SCALE, FOAM_TEXTURE_PATH, NOISE_TEXTURE_PATH, TERRAIN_SIZE,
    TERRAIN_TEXTURE_PATH, TEST_PATTERN_RESOLUTION, WATER_PATTERN_TEXTURE_PATH,
};
use serde::{Deserialize, Serialize};

use crate::engine::render::water::params::WaterParams;

/// Where the terrain height and type maps come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TerrainSource {
    /// Packed PNG: elevation in red, terrain type in green.
    Image { path: String },
    /// Procedural sine terrain, generated in-process.
    TestPattern { width: usize, height: usize },
}

impl Default for TerrainSource {
    fn default() -> Self {
        TerrainSource::Image {
            path: TERRAIN_TEXTURE_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    pub source: TerrainSource,
    /// Side length of the square terrain in world units.
    pub size: f32,
    pub elevation_scale: f32,
    pub elevation_offset: f32,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            source: TerrainSource::default(),
            size: TERRAIN_SIZE,
            elevation_scale: ELEVATION_SCALE,
            elevation_offset: ELEVATION_OFFSET,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterSettings {
    pub size: f32,
    pub subdivisions: u32,
    pub params: WaterParams,
}

impl Default for WaterSettings {
    fn default() -> Self {
        Self {
            size: WATER_SURFACE_SIZE,
            subdivisions: WATER_SUBDIVISIONS,
            params: WaterParams::default(),
        }
    }
}

/// Pattern textures sampled by the water shader, relative to the asset root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterTextureFiles {
    pub noise: String,
    pub water_pattern: String,
    pub foam: String,
}

impl Default for WaterTextureFiles {
    fn default() -> Self {
        Self {
            noise: NOISE_TEXTURE_PATH.to_string(),
            water_pattern: WATER_PATTERN_TEXTURE_PATH.to_string(),
            foam: FOAM_TEXTURE_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub eye: [f32; 3],
    pub focus: [f32; 3],
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            eye: CAMERA_EYE,
            focus: CAMERA_FOCUS,
            fov_degrees: CAMERA_FOV_DEGREES,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }
    }
}

/// Scene description as a Bevy asset. Every field is optional in the JSON.
#[derive(
    Asset, Debug, Clone, Default, PartialEq, Serialize, Deserialize, TypePath, Resource,
    ExtractResource,
)]
#[serde(default)]
pub struct SceneManifest {
    pub terrain: TerrainSettings,
    pub water: WaterSettings,
    pub textures: WaterTextureFiles,
    pub camera: CameraSettings,
}

impl SceneManifest {
    /// Manifest used when the JSON is missing or unreadable: procedural terrain,
    /// so the scene still shows something without pre-processed assets.
    pub fn fallback() -> Self {
        Self {
            terrain: TerrainSettings {
                source: TerrainSource::TestPattern {
                    width: TEST_PATTERN_RESOLUTION,
                    height: TEST_PATTERN_RESOLUTION,
                },
                ..default()
            },
            ..default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let manifest: SceneManifest = serde_json::from_str("{}").unwrap();
        assert_eq!(manifest, SceneManifest::default());
        assert_eq!(manifest.camera.fov_degrees, 45.0);
        assert_eq!(manifest.terrain.elevation_scale, 3.0);
    }

    #[test]
    fn terrain_source_is_tagged() {
        let manifest: SceneManifest = serde_json::from_str(
            r#"{ "terrain": { "source": { "kind": "test_pattern", "width": 32, "height": 16 } } }"#,
        )
        .unwrap();
        assert_eq!(
            manifest.terrain.source,
            TerrainSource::TestPattern {
                width: 32,
                height: 16
            }
        );

        let manifest: SceneManifest = serde_json::from_str(
            r#"{ "terrain": { "source": { "kind": "image", "path": "textures/bay.terrain.png" } } }"#,
        )
        .unwrap();
        assert_eq!(
            manifest.terrain.source,
            TerrainSource::Image {
                path: "textures/bay.terrain.png".into()
            }
        );
    }

    #[test]
    fn partial_water_params_keep_defaults() {
        let manifest: SceneManifest =
            serde_json::from_str(r#"{ "water": { "params": { "depth_falloff": 1.5 } } }"#).unwrap();
        assert_eq!(manifest.water.params.depth_falloff, 1.5);
        assert_eq!(
            manifest.water.params.foam_color,
            WaterParams::default().foam_color
        );
        assert_eq!(manifest.water.subdivisions, WATER_SUBDIVISIONS);
    }

    #[test]
    fn fallback_uses_the_test_pattern() {
        assert!(matches!(
            SceneManifest::fallback().terrain.source,
            TerrainSource::TestPattern { .. }
        ));
    }
}
