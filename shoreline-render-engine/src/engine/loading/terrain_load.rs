use bevy::asset::LoadState;
use bevy::prelude::*;
use serde::Serialize;

use super::terrain_loader::TerrainMaps;
use crate::engine::assets::scene_manifest::{SceneManifest, TerrainSource};
use crate::engine::scene::terrain_material::TerrainMaterial;
use crate::engine::scene::terrain_surface::spawn_terrain;

/// Where the terrain is in its load. Failure is final: the scene runs without terrain.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub enum TerrainLoad {
    #[default]
    Idle,
    Pending(Handle<TerrainMaps>),
    Ready(Handle<TerrainMaps>),
    Spawned,
    Failed(String),
}

/// Terrain load state as reported to the web frontend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerrainStatus {
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TerrainLoad {
    /// Start loading whatever the manifest names. A test pattern is ready
    /// immediately, or failed if its dimensions are empty.
    pub fn begin(
        source: &TerrainSource,
        asset_server: &AssetServer,
        terrain_maps: &mut Assets<TerrainMaps>,
    ) -> Self {
        match source {
            TerrainSource::Image { path } => {
                println!("Loading terrain: {path}");
                TerrainLoad::Pending(asset_server.load(path.clone()))
            }
            TerrainSource::TestPattern { width, height } => {
                println!("Generating {width}x{height} sine test terrain");
                match TerrainMaps::sine_test_pattern(*width, *height) {
                    Ok(maps) => TerrainLoad::Ready(terrain_maps.add(maps)),
                    Err(error) => {
                        error!("✗ Test terrain could not be generated: {error}");
                        TerrainLoad::Failed(error.to_string())
                    }
                }
            }
        }
    }

    /// Next state for a pending load given the asset server's view of it, or
    /// `None` while nothing has changed.
    pub fn polled(&self, load_state: Option<LoadState>) -> Option<TerrainLoad> {
        let TerrainLoad::Pending(handle) = self else {
            return None;
        };
        match load_state? {
            LoadState::Loaded => Some(TerrainLoad::Ready(handle.clone())),
            LoadState::Failed(error) => Some(TerrainLoad::Failed(error.to_string())),
            LoadState::NotLoaded | LoadState::Loading => None,
        }
    }

    pub fn status(&self) -> TerrainStatus {
        let (state, error) = match self {
            TerrainLoad::Idle => ("idle", None),
            TerrainLoad::Pending(_) | TerrainLoad::Ready(_) => ("loading", None),
            TerrainLoad::Spawned => ("ready", None),
            TerrainLoad::Failed(error) => ("failed", Some(error.clone())),
        };
        TerrainStatus { state, error }
    }
}

/// Drive the terrain from pending to spawned. Runs in every state so a slow
/// terrain never holds up the water.
pub fn poll_terrain_load(
    mut commands: Commands,
    mut terrain_load: ResMut<TerrainLoad>,
    asset_server: Res<AssetServer>,
    terrain_maps: Res<Assets<TerrainMaps>>,
    manifest: Option<Res<SceneManifest>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<TerrainMaterial>>,
    mut images: ResMut<Assets<Image>>,
) {
    match terrain_load.clone() {
        TerrainLoad::Pending(handle) => {
            let load_state = asset_server.get_load_state(handle.id());
            if let Some(next) = terrain_load.polled(load_state) {
                if let TerrainLoad::Failed(error) = &next {
                    error!("✗ Terrain failed to load: {error}");
                }
                *terrain_load = next;
            }
        }
        TerrainLoad::Ready(handle) => {
            let (Some(maps), Some(manifest)) = (terrain_maps.get(&handle), manifest) else {
                return;
            };
            let next = match spawn_terrain(
                &mut commands,
                &mut meshes,
                &mut materials,
                &mut images,
                maps,
                &manifest.terrain,
            ) {
                Ok(_) => {
                    println!("✓ Terrain created ({}x{} samples)", maps.width(), maps.height());
                    TerrainLoad::Spawned
                }
                Err(error) => {
                    error!("✗ Terrain could not be built: {error}");
                    TerrainLoad::Failed(error.to_string())
                }
            };
            *terrain_load = next;
        }
        TerrainLoad::Idle | TerrainLoad::Spawned | TerrainLoad::Failed(_) => {}
    }
}
