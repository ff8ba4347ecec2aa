/// Scene manifest generation pointing the engine at the baked textures.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Subset of the engine's manifest the baker owns. Everything omitted
/// (terrain size, water look, camera) falls back to the engine's defaults.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct SceneManifest {
    pub terrain: TerrainInfo,
    pub textures: WaterTextureFiles,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct TerrainInfo {
    pub source: TerrainSource,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TerrainSource {
    Image { path: String },
}

/// Pattern texture paths, relative to the asset root.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct WaterTextureFiles {
    pub noise: String,
    pub water_pattern: String,
    pub foam: String,
}

impl SceneManifest {
    pub fn write(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn terrain_source_uses_the_engine_tag() {
        let manifest = SceneManifest {
            terrain: TerrainInfo {
                source: TerrainSource::Image {
                    path: "textures/heightmap.terrain.png".into(),
                },
            },
            textures: WaterTextureFiles {
                noise: "textures/noise.png".into(),
                water_pattern: "textures/tiling_water.png".into(),
                foam: "textures/foam.png".into(),
            },
        };

        assert_eq!(
            serde_json::to_value(&manifest).unwrap()["terrain"],
            json!({ "source": { "kind": "image", "path": "textures/heightmap.terrain.png" } })
        );
    }
}
