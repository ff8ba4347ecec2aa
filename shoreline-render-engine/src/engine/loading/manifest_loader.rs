use bevy::asset::LoadState;
use bevy::prelude::*;

use super::progress::LoadingProgress;
use super::terrain_load::TerrainLoad;
use super::terrain_loader::TerrainMaps;
use crate::constants::path::SCENE_MANIFEST_PATH;
use crate::engine::assets::scene_manifest::SceneManifest;
use crate::engine::assets::water_textures::WaterTextures;

#[derive(Resource, Default)]
pub struct ManifestLoader {
    handle: Option<Handle<SceneManifest>>,
}

pub fn start_loading(mut manifest_loader: ResMut<ManifestLoader>, asset_server: Res<AssetServer>) {
    println!("Loading scene manifest: {SCENE_MANIFEST_PATH}");
    manifest_loader.handle = Some(asset_server.load(SCENE_MANIFEST_PATH));
}

/// Once the manifest resolves, publish it and start the texture and terrain loads.
/// An unreadable manifest falls back to the built-in scene.
pub fn load_manifest_system(
    mut loading_progress: ResMut<LoadingProgress>,
    manifest_loader: Res<ManifestLoader>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    manifests: Res<Assets<SceneManifest>>,
    mut terrain_maps: ResMut<Assets<TerrainMaps>>,
    mut terrain_load: ResMut<TerrainLoad>,
) {
    if loading_progress.manifest_loaded {
        return;
    }
    let Some(handle) = &manifest_loader.handle else {
        return;
    };

    let manifest = if let Some(manifest) = manifests.get(handle) {
        println!("✓ Scene manifest loaded");
        manifest.clone()
    } else if let Some(LoadState::Failed(error)) = asset_server.get_load_state(handle.id()) {
        warn!("Scene manifest unavailable ({error}), using built-in scene");
        SceneManifest::fallback()
    } else {
        return;
    };

    commands.insert_resource(WaterTextures::load(&asset_server, &manifest.textures));
    *terrain_load = TerrainLoad::begin(&manifest.terrain.source, &asset_server, &mut terrain_maps);
    commands.insert_resource(manifest);
    loading_progress.manifest_loaded = true;
}
