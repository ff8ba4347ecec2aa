use bevy::image::ImageLoaderSettings;
use bevy::prelude::*;
use bevy::render::extract_resource::ExtractResource;

use super::scene_manifest::WaterTextureFiles;

/// Pattern textures for the water pass. Their red channels are data, not colour.
#[derive(Resource, Clone, ExtractResource)]
pub struct WaterTextures {
    pub noise: Handle<Image>,
    pub water_map: Handle<Image>,
    pub foam: Handle<Image>,
}

impl WaterTextures {
    pub fn load(asset_server: &AssetServer, files: &WaterTextureFiles) -> Self {
        println!("Loading water textures:");
        println!("  Noise: {}", files.noise);
        println!("  Water pattern: {}", files.water_pattern);
        println!("  Foam: {}", files.foam);

        Self {
            noise: load_linear(asset_server, &files.noise),
            water_map: load_linear(asset_server, &files.water_pattern),
            foam: load_linear(asset_server, &files.foam),
        }
    }

    pub fn handles(&self) -> [(&'static str, &Handle<Image>); 3] {
        [
            ("noise", &self.noise),
            ("water pattern", &self.water_map),
            ("foam", &self.foam),
        ]
    }
}

fn load_linear(asset_server: &AssetServer, path: &str) -> Handle<Image> {
    asset_server.load_with_settings(path.to_string(), |settings: &mut ImageLoaderSettings| {
        settings.is_srgb = false;
    })
}
