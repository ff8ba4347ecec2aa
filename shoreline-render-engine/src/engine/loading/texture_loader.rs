use bevy::asset::LoadState;
use bevy::prelude::*;

use super::progress::LoadingProgress;
use crate::engine::assets::water_textures::WaterTextures;

/// Mark the water textures settled once each has loaded or failed.
/// A failed texture leaves the water pass idle; the scene still runs.
pub fn check_water_textures(
    mut loading_progress: ResMut<LoadingProgress>,
    textures: Option<Res<WaterTextures>>,
    asset_server: Res<AssetServer>,
) {
    if loading_progress.water_textures_loaded {
        return;
    }
    let Some(textures) = textures else {
        return;
    };

    let mut settled = true;
    let mut failed = Vec::new();
    for (name, handle) in textures.handles() {
        match asset_server.get_load_state(handle.id()) {
            Some(LoadState::Loaded) => {}
            Some(LoadState::Failed(error)) => failed.push(format!("{name}: {error}")),
            _ => settled = false,
        }
    }
    if !settled {
        return;
    }

    if failed.is_empty() {
        println!("✓ Water textures loaded");
    } else {
        error!("✗ Water disabled, textures failed to load: {}", failed.join("; "));
    }
    loading_progress.water_textures_loaded = true;
}
